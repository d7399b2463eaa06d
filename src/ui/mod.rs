pub mod layout;
mod composer;
mod home;
mod play;
mod summary;

pub use composer::draw_composer;
pub use home::draw_home;
pub use layout::{
    calculate_composer_chunks, calculate_home_chunks, calculate_play_chunks,
    calculate_summary_chunks,
};
pub use play::draw_play;
pub use summary::draw_summary;

use crate::app::App;
use crate::models::AppState;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use std::time::Instant;

/// Key hints rendered as `key action` pairs.
pub fn help_line<'a>(keys: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (i, (key, action)) in keys.iter().enumerate() {
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        let separator = if i + 1 < keys.len() { "  " } else { "" };
        spans.push(Span::from(format!(" {}{}", action, separator)));
    }
    Line::from(spans)
}

pub fn draw(f: &mut Frame, app: &App, now: Instant) {
    match app.screen() {
        AppState::Home => draw_home(f, &app.home),
        AppState::CreateQuiz => {
            if let Some(composer) = &app.composer {
                draw_composer(f, composer, now);
            }
        }
        AppState::Play => {
            if let Some(session) = &app.play {
                draw_play(f, session);
            }
        }
        AppState::Summary => {
            if let Some(session) = &app.play {
                draw_summary(f, session);
            }
        }
    }
}
