use crate::composer::{QuizComposer, handle_composer_input};
use crate::config::Config;
use crate::home::{HomeAction, HomeState, handle_home_input};
use crate::logger;
use crate::models::AppState;
use crate::navigation::{NavigationHost, ScreenStack};
use crate::play::{PlaySession, handle_play_input, handle_summary_input};
use crate::worker::BackendHandle;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

pub struct App {
    config: Config,
    backend: Box<dyn BackendHandle>,
    pub screens: ScreenStack,
    pub home: HomeState,
    pub composer: Option<QuizComposer>,
    pub play: Option<PlaySession>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, backend: Box<dyn BackendHandle>) -> Self {
        let mut home = HomeState::new();
        home.load_categories(backend.as_ref());
        Self {
            config,
            backend,
            screens: ScreenStack::new(AppState::Home),
            home,
            composer: None,
            play: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> AppState {
        self.screens.current()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screens.current() {
            AppState::Home => {
                let action =
                    handle_home_input(&mut self.home, key, self.backend.as_ref(), &mut self.screens);
                if action == HomeAction::Quit {
                    self.should_quit = true;
                }
            }
            AppState::CreateQuiz => {
                if let Some(composer) = self.composer.as_mut() {
                    handle_composer_input(composer, key, self.backend.as_ref(), &mut self.screens);
                }
            }
            AppState::Play => {
                if let Some(session) = self.play.as_mut() {
                    handle_play_input(session, key, &mut self.screens);
                }
            }
            AppState::Summary => {
                if let Some(session) = self.play.as_mut() {
                    handle_summary_input(session, key, &mut self.screens);
                }
            }
        }
        self.sync_screen();
    }

    /// Polls outstanding requests and runs time-based transitions.
    pub fn tick(&mut self, now: Instant) {
        if let Some(quiz) = self.home.poll(self.backend.as_ref()) {
            logger::log(&format!(
                "Starting quiz {:?} with {} question(s)",
                quiz.title,
                quiz.questions.len()
            ));
            self.play = Some(PlaySession::new(quiz));
            self.screens.navigate_to(AppState::Play);
        }

        if let Some(composer) = self.composer.as_mut() {
            composer.poll(now);
            if composer.navigation_due(now) {
                self.screens.navigate_to(AppState::Home);
            }
        }
        self.sync_screen();
    }

    /// Creates or discards per-screen state after a transition.
    fn sync_screen(&mut self) {
        let current = self.screens.current();
        if current == AppState::CreateQuiz && self.composer.is_none() {
            let mut composer =
                QuizComposer::new(self.config.min_questions, self.config.success_delay);
            composer.start(self.backend.as_ref());
            self.composer = Some(composer);
        } else if current != AppState::CreateQuiz
            && let Some(mut composer) = self.composer.take()
        {
            composer.detach();
            // A stored quiz may belong to the listed category.
            self.home.reload_quizzes(self.backend.as_ref());
        }

        if matches!(current, AppState::Home | AppState::CreateQuiz) {
            self.play = None;
        }
    }
}
