use crate::play::PlaySession;
use crate::ui::help_line;
use crate::ui::layout::calculate_play_chunks;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw_play(f: &mut Frame, session: &PlaySession) {
    let layout = calculate_play_chunks(f.area());

    let progress = format!(
        "Question {} / {} - {}",
        (session.current_index + 1).min(session.total()),
        session.total(),
        session.title
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let Some(entry) = session.current() else {
        let empty = Paragraph::new("This quiz has no questions.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, layout.question_area);
        return;
    };

    let question = Paragraph::new(Text::from(entry.question.statement.as_str()))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let correct = entry.question.answer_position();
    let mut lines = Vec::new();
    for (i, option) in entry.question.options().iter().enumerate() {
        let marker = if i == session.highlighted { "▶" } else { " " };
        let style = if session.showing_answer && Some(i) == correct {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else if session.showing_answer && entry.chosen == Some(i) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if i == session.highlighted {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}. {}", marker, i + 1, option),
            style,
        )));
    }
    if session.showing_answer {
        lines.push(Line::from(""));
        lines.push(if entry.is_correct() {
            Line::from(Span::styled("Correct!", Style::default().fg(Color::Green)))
        } else {
            Line::from(Span::styled(
                format!("Incorrect, the answer is {}", entry.question.answer),
                Style::default().fg(Color::Red),
            ))
        });
    }
    let title = if session.showing_answer {
        "Answer"
    } else {
        "Options"
    };
    let options = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(options, layout.options_area);

    let help = if session.showing_answer {
        help_line(&[
            ("Enter", if session.is_last() { "Finish" } else { "Next" }),
            ("Esc", "Quit to Menu"),
        ])
    } else {
        help_line(&[
            ("1-4/↑/↓", "Choose"),
            ("Enter", "Confirm"),
            ("Esc", "Quit to Menu"),
        ])
    };
    f.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.help_area,
    );
}
