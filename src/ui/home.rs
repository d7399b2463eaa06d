use crate::composer::LoadStatus;
use crate::home::{HomePanel, HomeState};
use crate::ui::help_line;
use crate::ui::layout::calculate_home_chunks;
use crate::utils::{format_timestamp, truncate_string};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn placeholder(text: &str) -> ListItem<'_> {
    ListItem::new(text).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn draw_categories(f: &mut Frame, home: &HomeState, area: Rect) {
    let focused = home.focus == HomePanel::Categories;
    let items: Vec<ListItem> = match &home.category_status {
        LoadStatus::Failed(message) => vec![
            ListItem::new(message.as_str()).style(Style::default().fg(Color::Red)),
            placeholder("Press r to retry"),
        ],
        _ if home.categories.is_empty() => vec![placeholder("Loading categories...")],
        _ => home
            .categories
            .iter()
            .enumerate()
            .map(|(i, category)| {
                ListItem::new(category.name.as_str())
                    .style(selected_style(i == home.selected_category && focused))
            })
            .collect(),
    };

    f.render_widget(
        List::new(items).block(panel_block("[1] Categories", focused)),
        area,
    );
}

fn draw_quizzes(f: &mut Frame, home: &HomeState, area: Rect) {
    let focused = home.focus == HomePanel::Quizzes;
    let title_width = area.width.saturating_sub(30) as usize;

    let items: Vec<ListItem> = match &home.quiz_status {
        LoadStatus::Failed(message) => {
            vec![ListItem::new(message.as_str()).style(Style::default().fg(Color::Red))]
        }
        LoadStatus::Loading if home.quizzes.is_empty() => vec![placeholder("Loading quizzes...")],
        _ if home.quizzes.is_empty() => vec![placeholder("No quizzes yet, press n to create one")],
        _ => home
            .quizzes
            .iter()
            .enumerate()
            .map(|(i, quiz)| {
                let text = format!(
                    "{} - {} ({} q, by {})",
                    format_timestamp(quiz.created_at),
                    truncate_string(&quiz.title, title_width.max(10)),
                    quiz.total_questions,
                    quiz.creator_name
                );
                ListItem::new(text).style(selected_style(i == home.selected_quiz && focused))
            })
            .collect(),
    };

    let title = match home.current_category() {
        Some(category) => format!("[2] Quizzes in {}", category.name),
        None => "[2] Quizzes".to_string(),
    };
    f.render_widget(List::new(items).block(panel_block(&title, focused)), area);
}

pub fn draw_home(f: &mut Frame, home: &HomeState) {
    let layout = calculate_home_chunks(f.area());

    let title = Paragraph::new("Quiz Composer v0.1.0")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    draw_categories(f, home, layout.categories_area);
    draw_quizzes(f, home, layout.quizzes_area);

    let footer = if home.opening {
        Paragraph::new("Opening quiz...").style(Style::default().fg(Color::Yellow))
    } else if let Some(error) = &home.open_error {
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(help_line(&[
            ("Tab", "Switch Panel"),
            ("↑/↓", "Navigate"),
            ("Enter", "Play"),
            ("n", "New Quiz"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ]))
    };
    f.render_widget(
        footer
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.help_area,
    );
}
