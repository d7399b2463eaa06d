use crate::logger;
use crate::models::AppState;

/// Screen transitions requested by screen-level input handlers.
pub trait NavigationHost {
    fn navigate_to(&mut self, screen: AppState);
    fn navigate_back(&mut self);
}

/// Back stack of visited screens. The bottom entry is never popped.
#[derive(Debug)]
pub struct ScreenStack {
    stack: Vec<AppState>,
}

impl ScreenStack {
    pub fn new(root: AppState) -> Self {
        Self { stack: vec![root] }
    }

    pub fn current(&self) -> AppState {
        self.stack.last().copied().unwrap_or(AppState::Home)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl NavigationHost for ScreenStack {
    fn navigate_to(&mut self, screen: AppState) {
        if screen == self.stack[0] {
            // Going to the root clears the history.
            self.stack.truncate(1);
        } else if self.current() != screen {
            self.stack.push(screen);
        }
        logger::log(&format!("Navigated to {:?}", self.current()));
    }

    fn navigate_back(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_and_back() {
        let mut screens = ScreenStack::new(AppState::Home);
        screens.navigate_to(AppState::CreateQuiz);
        assert_eq!(screens.current(), AppState::CreateQuiz);

        screens.navigate_back();
        assert_eq!(screens.current(), AppState::Home);

        screens.navigate_back();
        assert_eq!(screens.current(), AppState::Home);
        assert_eq!(screens.depth(), 1);
    }

    #[test]
    fn test_navigate_to_root_clears_history() {
        let mut screens = ScreenStack::new(AppState::Home);
        screens.navigate_to(AppState::Play);
        screens.navigate_to(AppState::Summary);
        screens.navigate_to(AppState::Home);
        assert_eq!(screens.depth(), 1);
    }

    #[test]
    fn test_same_screen_is_not_pushed_twice() {
        let mut screens = ScreenStack::new(AppState::Home);
        screens.navigate_to(AppState::Play);
        screens.navigate_to(AppState::Play);
        assert_eq!(screens.depth(), 2);
    }
}
