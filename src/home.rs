use crate::composer::LoadStatus;
use crate::logger;
use crate::models::{AppState, Category, QuizPayload, QuizSummary};
use crate::navigation::NavigationHost;
use crate::subscription::{NetworkResponse, Subscription};
use crate::worker::BackendHandle;
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomePanel {
    Categories,
    Quizzes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Continue,
    Quit,
}

/// Applies every pending notification of `slot` and drops the subscription
/// once it has finished.
fn drain_into<T>(
    slot: &mut Option<Subscription<T>>,
    mut apply: impl FnMut(NetworkResponse<T>),
) {
    if let Some(sub) = slot.take() {
        for response in sub.drain() {
            apply(response);
        }
        if !sub.is_finished() {
            *slot = Some(sub);
        }
    }
}

#[derive(Debug)]
pub struct HomeState {
    pub categories: Vec<Category>,
    pub category_status: LoadStatus,
    pub selected_category: usize,
    pub quizzes: Vec<QuizSummary>,
    pub quiz_status: LoadStatus,
    pub selected_quiz: usize,
    pub focus: HomePanel,
    pub opening: bool,
    pub open_error: Option<String>,
    category_sub: Option<Subscription<Vec<Category>>>,
    quiz_sub: Option<Subscription<Vec<QuizSummary>>>,
    load_sub: Option<Subscription<QuizPayload>>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            category_status: LoadStatus::Idle,
            selected_category: 0,
            quizzes: Vec::new(),
            quiz_status: LoadStatus::Idle,
            selected_quiz: 0,
            focus: HomePanel::Categories,
            opening: false,
            open_error: None,
            category_sub: None,
            quiz_sub: None,
            load_sub: None,
        }
    }

    pub fn load_categories(&mut self, handle: &dyn BackendHandle) {
        self.category_status = LoadStatus::Loading;
        self.category_sub = Some(handle.fetch_categories());
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.categories.get(self.selected_category)
    }

    /// Refetches the quiz list of the highlighted category.
    pub fn reload_quizzes(&mut self, handle: &dyn BackendHandle) {
        let Some(category) = self.current_category() else {
            return;
        };
        let sub = handle.fetch_quizzes(&category.id);
        self.quiz_status = LoadStatus::Loading;
        self.quiz_sub = Some(sub);
    }

    pub fn open_selected(&mut self, handle: &dyn BackendHandle) {
        let Some(quiz) = self.quizzes.get(self.selected_quiz) else {
            return;
        };
        logger::log(&format!("Opening quiz {} ({:?})", quiz.id, quiz.title));
        self.load_sub = Some(handle.load_quiz(quiz.id));
        self.opening = true;
        self.open_error = None;
    }

    /// Applies pending notifications. Returns a quiz once it finished loading.
    pub fn poll(&mut self, handle: &dyn BackendHandle) -> Option<QuizPayload> {
        let mut categories = None;
        let mut category_status = None;
        drain_into(&mut self.category_sub, |response| match response {
            NetworkResponse::Loading => category_status = Some(LoadStatus::Loading),
            NetworkResponse::Success(list) => {
                categories = Some(list);
                category_status = Some(LoadStatus::Loaded);
            }
            NetworkResponse::Failure(message) => category_status = Some(LoadStatus::Failed(message)),
        });
        if let Some(status) = category_status {
            self.category_status = status;
        }
        if let Some(list) = categories {
            self.categories = list;
            self.selected_category = self
                .selected_category
                .min(self.categories.len().saturating_sub(1));
            self.reload_quizzes(handle);
        }

        let mut quizzes = None;
        let mut quiz_status = None;
        drain_into(&mut self.quiz_sub, |response| match response {
            NetworkResponse::Loading => quiz_status = Some(LoadStatus::Loading),
            NetworkResponse::Success(list) => {
                quizzes = Some(list);
                quiz_status = Some(LoadStatus::Loaded);
            }
            NetworkResponse::Failure(message) => quiz_status = Some(LoadStatus::Failed(message)),
        });
        if let Some(status) = quiz_status {
            self.quiz_status = status;
        }
        if let Some(list) = quizzes {
            self.quizzes = list;
            self.selected_quiz = self.selected_quiz.min(self.quizzes.len().saturating_sub(1));
        }

        let mut loaded = None;
        let mut open_error = None;
        drain_into(&mut self.load_sub, |response| match response {
            NetworkResponse::Loading => {}
            NetworkResponse::Success(quiz) => loaded = Some(quiz),
            NetworkResponse::Failure(message) => open_error = Some(message),
        });
        if loaded.is_some() || open_error.is_some() {
            self.opening = false;
            self.load_sub = None;
        }
        if open_error.is_some() {
            self.open_error = open_error;
        }
        loaded
    }

    fn move_category(&mut self, handle: &dyn BackendHandle, forward: bool) {
        let before = self.selected_category;
        if forward {
            if self.selected_category + 1 < self.categories.len() {
                self.selected_category += 1;
            }
        } else {
            self.selected_category = self.selected_category.saturating_sub(1);
        }
        if before != self.selected_category {
            self.quizzes.clear();
            self.selected_quiz = 0;
            self.reload_quizzes(handle);
        }
    }
}

pub fn handle_home_input(
    home: &mut HomeState,
    key: KeyEvent,
    handle: &dyn BackendHandle,
    nav: &mut dyn NavigationHost,
) -> HomeAction {
    if home.opening {
        return HomeAction::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return HomeAction::Quit,
        KeyCode::Char('n') => nav.navigate_to(AppState::CreateQuiz),
        KeyCode::Char('r') => {
            if matches!(home.category_status, LoadStatus::Failed(_)) {
                home.load_categories(handle);
            } else {
                home.reload_quizzes(handle);
            }
        }
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
            home.focus = match home.focus {
                HomePanel::Categories => HomePanel::Quizzes,
                HomePanel::Quizzes => HomePanel::Categories,
            };
        }
        KeyCode::Up => match home.focus {
            HomePanel::Categories => home.move_category(handle, false),
            HomePanel::Quizzes => home.selected_quiz = home.selected_quiz.saturating_sub(1),
        },
        KeyCode::Down => match home.focus {
            HomePanel::Categories => home.move_category(handle, true),
            HomePanel::Quizzes => {
                if home.selected_quiz + 1 < home.quizzes.len() {
                    home.selected_quiz += 1;
                }
            }
        },
        KeyCode::Enter => match home.focus {
            HomePanel::Categories => home.focus = HomePanel::Quizzes,
            HomePanel::Quizzes => home.open_selected(handle),
        },
        _ => {}
    }
    HomeAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use crate::navigation::ScreenStack;
    use crate::subscription::{self, Responder};
    use crossterm::event::KeyModifiers;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeHandle {
        categories: RefCell<Vec<Responder<Vec<Category>>>>,
        quiz_requests: RefCell<Vec<(String, Responder<Vec<QuizSummary>>)>>,
        loads: RefCell<Vec<(i64, Responder<QuizPayload>)>>,
    }

    impl BackendHandle for FakeHandle {
        fn fetch_categories(&self) -> Subscription<Vec<Category>> {
            let (reply, sub) = subscription::channel();
            self.categories.borrow_mut().push(reply);
            sub
        }

        fn current_user(&self) -> Subscription<UserProfile> {
            subscription::failed("not used")
        }

        fn upload(&self, _payload: QuizPayload) -> Subscription<()> {
            subscription::failed("not used")
        }

        fn fetch_quizzes(&self, category_id: &str) -> Subscription<Vec<QuizSummary>> {
            let (reply, sub) = subscription::channel();
            self.quiz_requests
                .borrow_mut()
                .push((category_id.to_string(), reply));
            sub
        }

        fn load_quiz(&self, quiz_id: i64) -> Subscription<QuizPayload> {
            let (reply, sub) = subscription::channel();
            self.loads.borrow_mut().push((quiz_id, reply));
            sub
        }
    }

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn summary(id: i64) -> QuizSummary {
        QuizSummary {
            id,
            title: format!("Quiz {}", id),
            category_name: "GENERAL".to_string(),
            creator_name: "ana".to_string(),
            total_questions: 3,
            created_at: 0,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn loaded_home(handle: &FakeHandle) -> HomeState {
        let mut home = HomeState::new();
        home.load_categories(handle);
        handle.categories.borrow()[0]
            .send(NetworkResponse::Success(vec![category("general"), category("science")]));
        home.poll(handle);
        home
    }

    #[test]
    fn test_categories_then_quizzes_of_first() {
        let handle = FakeHandle::default();
        let mut home = loaded_home(&handle);
        assert_eq!(home.category_status, LoadStatus::Loaded);

        {
            let requests = handle.quiz_requests.borrow();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].0, "general");
            requests[0]
                .1
                .send(NetworkResponse::Success(vec![summary(1), summary(2)]));
        }
        home.poll(&handle);
        assert_eq!(home.quizzes.len(), 2);
        assert_eq!(home.quiz_status, LoadStatus::Loaded);
    }

    #[test]
    fn test_moving_category_fetches_its_quizzes() {
        let handle = FakeHandle::default();
        let mut home = loaded_home(&handle);
        let mut nav = ScreenStack::new(AppState::Home);

        handle_home_input(&mut home, key(KeyCode::Down), &handle, &mut nav);
        assert_eq!(home.current_category().unwrap().id, "science");
        assert_eq!(handle.quiz_requests.borrow()[1].0, "science");

        // Already at the end.
        handle_home_input(&mut home, key(KeyCode::Down), &handle, &mut nav);
        assert_eq!(handle.quiz_requests.borrow().len(), 2);
    }

    #[test]
    fn test_open_quiz() {
        let handle = FakeHandle::default();
        let mut home = loaded_home(&handle);
        handle.quiz_requests.borrow()[0]
            .1
            .send(NetworkResponse::Success(vec![summary(7)]));
        home.poll(&handle);

        let mut nav = ScreenStack::new(AppState::Home);
        handle_home_input(&mut home, key(KeyCode::Enter), &handle, &mut nav);
        handle_home_input(&mut home, key(KeyCode::Enter), &handle, &mut nav);
        assert!(home.opening);
        assert_eq!(handle.loads.borrow()[0].0, 7);

        let payload = QuizPayload::new(
            "Quiz 7".to_string(),
            &category("general"),
            &UserProfile::default(),
            vec![],
        );
        handle.loads.borrow()[0]
            .1
            .send(NetworkResponse::Success(payload.clone()));
        assert_eq!(home.poll(&handle), Some(payload));
        assert!(!home.opening);
    }

    #[test]
    fn test_open_failure_is_reported() {
        let handle = FakeHandle::default();
        let mut home = loaded_home(&handle);
        handle.quiz_requests.borrow()[0]
            .1
            .send(NetworkResponse::Success(vec![summary(7)]));
        home.poll(&handle);

        home.focus = HomePanel::Quizzes;
        home.open_selected(&handle);
        handle.loads.borrow()[0]
            .1
            .send(NetworkResponse::Failure("Quiz 7 no longer exists".to_string()));
        assert_eq!(home.poll(&handle), None);
        assert_eq!(home.open_error.as_deref(), Some("Quiz 7 no longer exists"));
        assert!(!home.opening);
    }

    #[test]
    fn test_category_failure_retry() {
        let handle = FakeHandle::default();
        let mut home = HomeState::new();
        home.load_categories(&handle);
        handle.categories.borrow()[0].send(NetworkResponse::Failure("offline".to_string()));
        home.poll(&handle);
        assert_eq!(home.category_status, LoadStatus::Failed("offline".to_string()));

        let mut nav = ScreenStack::new(AppState::Home);
        handle_home_input(&mut home, key(KeyCode::Char('r')), &handle, &mut nav);
        assert_eq!(handle.categories.borrow().len(), 2);
        assert_eq!(home.category_status, LoadStatus::Loading);
    }

    #[test]
    fn test_new_quiz_and_quit_keys() {
        let handle = FakeHandle::default();
        let mut home = HomeState::new();
        let mut nav = ScreenStack::new(AppState::Home);

        handle_home_input(&mut home, key(KeyCode::Char('n')), &handle, &mut nav);
        assert_eq!(nav.current(), AppState::CreateQuiz);

        assert_eq!(
            handle_home_input(&mut home, key(KeyCode::Char('q')), &handle, &mut nav),
            HomeAction::Quit
        );
    }
}
