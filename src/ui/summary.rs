use crate::play::PlaySession;
use crate::ui::help_line;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_summary(f: &mut Frame, session: &PlaySession) {
    let layout = calculate_summary_chunks(f.area());

    let title_text = format!("Quiz Summary - {}", session.title);
    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let mut summary_text = Text::default();
    summary_text.push_line(Line::from(format!(
        "Score: {} / {}",
        session.score(),
        session.total()
    )));
    summary_text.push_line(Line::from(format!(
        "Category: {}  Created by: {}",
        session.category_name, session.creator_name
    )));
    summary_text.push_line(Line::from(""));

    for (i, entry) in session.questions.iter().enumerate() {
        let mark = if entry.is_correct() { "[✓]" } else { "[✗]" };
        summary_text.push_line(Line::from(format!(
            "{} {}. {}",
            mark,
            i + 1,
            truncate_string(&entry.question.statement, 60)
        )));
        let chosen = entry
            .chosen
            .and_then(|c| entry.question.options().get(c).map(|o| o.to_string()))
            .unwrap_or_else(|| "(no answer)".to_string());
        summary_text.push_line(Line::from(format!(
            "   Your Answer: {}",
            truncate_string(&chosen, 56)
        )));
        if !entry.is_correct() {
            summary_text.push_line(Line::from(format!(
                "   Correct Answer: {}",
                truncate_string(&entry.question.answer, 53)
            )));
        }
        summary_text.push_line(Line::from(""));
    }

    let summary = Paragraph::new(summary_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, layout.content_area);

    let help = Paragraph::new(help_line(&[("r", "Retry (shuffled)"), ("m", "Main Menu")]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
