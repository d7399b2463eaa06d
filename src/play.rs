use crate::models::{AppState, QuestionRecord, QuizPayload};
use crate::navigation::NavigationHost;
use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question: QuestionRecord,
    pub chosen: Option<usize>,
}

impl AnsweredQuestion {
    pub fn is_correct(&self) -> bool {
        self.chosen.is_some() && self.chosen == self.question.answer_position()
    }
}

/// One run through a stored quiz.
#[derive(Debug)]
pub struct PlaySession {
    pub title: String,
    pub category_name: String,
    pub creator_name: String,
    pub questions: Vec<AnsweredQuestion>,
    pub current_index: usize,
    pub highlighted: usize,
    pub showing_answer: bool,
}

impl PlaySession {
    pub fn new(quiz: QuizPayload) -> Self {
        Self {
            title: quiz.title,
            category_name: quiz.category_name,
            creator_name: quiz.creator_name,
            questions: quiz
                .questions
                .into_iter()
                .map(|question| AnsweredQuestion {
                    question,
                    chosen: None,
                })
                .collect(),
            current_index: 0,
            highlighted: 0,
            showing_answer: false,
        }
    }

    pub fn current(&self) -> Option<&AnsweredQuestion> {
        self.questions.get(self.current_index)
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn highlight(&mut self, option: usize) {
        if !self.showing_answer && option < 4 {
            self.highlighted = option;
        }
    }

    /// Locks in the highlighted option and reveals the answer.
    pub fn reveal(&mut self) {
        if self.showing_answer {
            return;
        }
        let highlighted = self.highlighted;
        if let Some(entry) = self.questions.get_mut(self.current_index) {
            entry.chosen = Some(highlighted);
            self.showing_answer = true;
        }
    }

    /// Moves to the next question. Returns false when there is none.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_index += 1;
        self.highlighted = 0;
        self.showing_answer = false;
        true
    }

    pub fn score(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Clears every answer and shuffles the question order for another go.
    pub fn restart(&mut self) {
        for entry in &mut self.questions {
            entry.chosen = None;
        }
        self.questions.shuffle(&mut rand::thread_rng());
        self.current_index = 0;
        self.highlighted = 0;
        self.showing_answer = false;
    }
}

pub fn handle_play_input(session: &mut PlaySession, key: KeyEvent, nav: &mut dyn NavigationHost) {
    if !session.showing_answer {
        match key.code {
            KeyCode::Esc => nav.navigate_to(AppState::Home),
            KeyCode::Char(c @ '1'..='4') => {
                session.highlight(c as usize - '1' as usize);
            }
            KeyCode::Up => session.highlight(session.highlighted.saturating_sub(1)),
            KeyCode::Down => session.highlight((session.highlighted + 1).min(3)),
            KeyCode::Enter => session.reveal(),
            _ => {}
        }
    } else {
        match key.code {
            KeyCode::Esc => nav.navigate_to(AppState::Home),
            KeyCode::Enter => {
                if !session.advance() {
                    nav.navigate_to(AppState::Summary);
                }
            }
            _ => {}
        }
    }
}

pub fn handle_summary_input(
    session: &mut PlaySession,
    key: KeyEvent,
    nav: &mut dyn NavigationHost,
) {
    match key.code {
        KeyCode::Char('r') => {
            session.restart();
            nav.navigate_back();
        }
        KeyCode::Char('m') | KeyCode::Esc => nav.navigate_to(AppState::Home),
        _ => {}
    }
}
