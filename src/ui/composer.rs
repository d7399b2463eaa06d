use crate::composer::{
    ComposerFocus, DIALOG_LABELS, LoadStatus, QuestionDialog, QuizComposer, UploadPhase,
};
use crate::error::FormField;
use crate::presenter::QuestionListPresenter;
use crate::text_field::TextField;
use crate::ui::help_line;
use crate::ui::layout::{calculate_composer_chunks, centered_rect};
use crate::utils::display_column;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};
use std::time::Instant;

fn field_block(title: &str, focused: bool, error: Option<String>) -> Block<'_> {
    let mut block = Block::default().borders(Borders::ALL).title(title);
    if let Some(error) = error {
        block = block
            .title_bottom(Line::from(Span::styled(error, Style::default().fg(Color::Red))))
            .border_style(Style::default().fg(Color::Red));
    } else if focused {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    block
}

fn draw_text_input(
    f: &mut Frame,
    field: &TextField,
    block: Block,
    area: Rect,
    placeholder: &str,
    show_cursor: bool,
) {
    let content = if field.is_empty() {
        Paragraph::new(placeholder).style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(field.text())
    };
    f.render_widget(content.block(block), area);

    if show_cursor {
        let column = display_column(field.text(), field.cursor()) as u16;
        let max_x = area.right().saturating_sub(2);
        f.set_cursor_position(((area.x + 1 + column).min(max_x), area.y + 1));
    }
}

fn form_error_for(composer: &QuizComposer, field: FormField) -> Option<String> {
    composer
        .form_error()
        .filter(|e| e.field() == field)
        .map(|e| e.to_string())
}

fn draw_category_picker(f: &mut Frame, composer: &QuizComposer, area: Rect) {
    let focused = composer.focus() == ComposerFocus::Category;
    let block = field_block(
        "Category",
        focused,
        form_error_for(composer, FormField::Category),
    );

    let line = match composer.category_status() {
        LoadStatus::Failed(message) => Line::from(vec![
            Span::styled(message.as_str(), Style::default().fg(Color::Red)),
            Span::from("  (press r to retry)"),
        ]),
        LoadStatus::Loading | LoadStatus::Idle if composer.categories().is_empty() => {
            Line::from(Span::styled(
                "Loading categories...",
                Style::default().fg(Color::DarkGray),
            ))
        }
        _ => match composer.selected_category() {
            Some(category) => Line::from(vec![
                Span::from("◀ "),
                Span::styled(
                    category.name.as_str(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::from(" ▶"),
            ]),
            None => Line::from(Span::styled(
                "Select A Category (←/→)",
                Style::default().fg(Color::DarkGray),
            )),
        },
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_question_list(f: &mut Frame, composer: &QuizComposer, area: Rect) {
    let focused = composer.focus() == ComposerFocus::Questions;
    let title = format!(
        "Questions ({}/{} required)",
        composer.question_count(),
        composer.min_questions()
    );
    let block = field_block(
        &title,
        focused,
        form_error_for(composer, FormField::QuestionList),
    );

    let label_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = if composer.questions().is_empty() {
        vec![ListItem::new("No questions yet, press a to add one").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        composer
            .questions()
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let style = if focused && position == composer.selected_row() {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(QuestionListPresenter::row_label(
                    position,
                    record,
                    label_width,
                ))
                .style(style)
            })
            .collect()
    };

    f.render_widget(List::new(items).block(block), area);
}

fn draw_status(f: &mut Frame, composer: &QuizComposer, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    match composer.upload_phase() {
        UploadPhase::Editing => {
            let text = if composer.creator().username.is_empty() {
                "Creator: (loading)".to_string()
            } else {
                format!("Creator: {}", composer.creator().username)
            };
            f.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
        }
        UploadPhase::Busy => {
            f.render_widget(
                Paragraph::new("Uploading quiz... (Esc to leave)")
                    .style(
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
        }
        UploadPhase::Finished { .. } => {}
        UploadPhase::Failed(message) => {
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("Upload failed: {}", message),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::from("  (Enter to continue)"),
                ]))
                .block(block),
                area,
            );
        }
    }
}

/// Replaces the form once the quiz is stored; fills up until the screen closes.
fn draw_completion(f: &mut Frame, composer: &QuizComposer, now: Instant) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .label("Quiz Created")
        .ratio(composer.completion_progress(now));
    f.render_widget(gauge, area);
}

fn draw_dialog(f: &mut Frame, dialog: &QuestionDialog) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Add Question")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut constraints = vec![Constraint::Length(3); DIALOG_LABELS.len()];
    constraints.push(Constraint::Min(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (position, label) in DIALOG_LABELS.iter().enumerate() {
        let focused = position == dialog.focus;
        let error = dialog.error_for(position).map(|e| e.to_string());
        draw_text_input(
            f,
            &dialog.fields[position],
            field_block(label, focused, error),
            rows[position],
            "",
            focused,
        );
    }

    let help = Paragraph::new(help_line(&[
        ("Tab/↓", "Next"),
        ("Shift+Tab/↑", "Previous"),
        ("Enter", "Add"),
        ("Esc", "Cancel"),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(help, rows[DIALOG_LABELS.len()]);
}

pub fn draw_composer(f: &mut Frame, composer: &QuizComposer, now: Instant) {
    if matches!(composer.upload_phase(), UploadPhase::Finished { .. }) {
        draw_completion(f, composer, now);
        return;
    }

    let layout = calculate_composer_chunks(f.area());

    let header = Paragraph::new("Create Quiz")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let title_focused = composer.focus() == ComposerFocus::Title;
    draw_text_input(
        f,
        &composer.title,
        field_block(
            "Quiz Title",
            title_focused,
            form_error_for(composer, FormField::Title),
        ),
        layout.title_area,
        "Enter a title",
        title_focused && composer.dialog().is_none() && composer.is_editable(),
    );

    draw_category_picker(f, composer, layout.category_area);
    draw_question_list(f, composer, layout.questions_area);
    draw_status(f, composer, layout.status_area);

    let help = Paragraph::new(help_line(&[
        ("Tab", "Next Field"),
        ("a", "Add Question"),
        ("d", "Delete"),
        ("Ctrl+S", "Submit"),
        ("Esc", "Back"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);

    if let Some(dialog) = composer.dialog() {
        draw_dialog(f, dialog);
    }
}
