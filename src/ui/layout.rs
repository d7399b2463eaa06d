use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct HomeLayout {
    pub header_area: Rect,
    pub categories_area: Rect,
    pub quizzes_area: Rect,
    pub help_area: Rect,
}

pub struct ComposerLayout {
    pub header_area: Rect,
    pub title_area: Rect,
    pub category_area: Rect,
    pub questions_area: Rect,
    pub status_area: Rect,
    pub help_area: Rect,
}

pub struct PlayLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub options_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub content_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_home_chunks(area: Rect) -> HomeLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    HomeLayout {
        header_area: chunks[0],
        categories_area: panels[0],
        quizzes_area: panels[1],
        help_area: chunks[2],
    }
}

pub fn calculate_composer_chunks(area: Rect) -> ComposerLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    ComposerLayout {
        header_area: chunks[0],
        title_area: chunks[1],
        category_area: chunks[2],
        questions_area: chunks[3],
        status_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_play_chunks(area: Rect) -> PlayLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(area);

    PlayLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        options_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    SummaryLayout {
        header_area: chunks[0],
        content_area: chunks[1],
        footer_area: chunks[2],
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
