use crate::error::{FormField, OutOfRangeError, ValidationError};
use crate::logger;
use crate::models::{Category, QuestionRecord, QuizPayload, UserProfile};
use crate::navigation::NavigationHost;
use crate::presenter::{ListOp, QuestionListPresenter};
use crate::store::QuestionListStore;
use crate::subscription::{NetworkResponse, Subscription};
use crate::text_field::TextField;
use crate::worker::BackendHandle;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Raw input of the add-question dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub statement: String,
    pub options: [String; 4],
    pub answer: String,
}

/// A draft that passed validation, with every field trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidQuestion {
    statement: String,
    options: [String; 4],
    answer: String,
}

impl ValidQuestion {
    pub fn into_record(self, index: usize) -> QuestionRecord {
        let [option1, option2, option3, option4] = self.options;
        QuestionRecord {
            index,
            statement: self.statement,
            option1,
            option2,
            option3,
            option4,
            answer: self.answer,
        }
    }
}

/// Checks a draft field by field and reports only the first problem found.
/// The answer has to match one of the options exactly, case included.
pub fn validate_question(draft: &QuestionDraft) -> Result<ValidQuestion, ValidationError> {
    let statement = draft.statement.trim();
    if statement.is_empty() {
        return Err(ValidationError::EmptyStatement);
    }

    let options = [
        draft.options[0].trim(),
        draft.options[1].trim(),
        draft.options[2].trim(),
        draft.options[3].trim(),
    ];
    for (i, option) in options.iter().enumerate() {
        if option.is_empty() {
            return Err(ValidationError::EmptyOption(i as u8 + 1));
        }
    }

    let answer = draft.answer.trim();
    if answer.is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }
    if !options.contains(&answer) {
        return Err(ValidationError::AnswerMismatch);
    }

    Ok(ValidQuestion {
        statement: statement.to_string(),
        options: options.map(str::to_string),
        answer: answer.to_string(),
    })
}

pub const DIALOG_LABELS: [&str; 6] = [
    "Question Statement",
    "Option 1",
    "Option 2",
    "Option 3",
    "Option 4",
    "Answer",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Validating,
    Rejected(ValidationError),
    Admitted,
}

#[derive(Debug, Clone)]
pub struct QuestionDialog {
    pub fields: [TextField; 6],
    pub focus: usize,
    pub state: DialogState,
}

impl Default for QuestionDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionDialog {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            focus: 0,
            state: DialogState::Open,
        }
    }

    pub fn draft(&self) -> QuestionDraft {
        QuestionDraft {
            statement: self.fields[0].text().to_string(),
            options: [
                self.fields[1].text().to_string(),
                self.fields[2].text().to_string(),
                self.fields[3].text().to_string(),
                self.fields[4].text().to_string(),
            ],
            answer: self.fields[5].text().to_string(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn focused_field_mut(&mut self) -> &mut TextField {
        &mut self.fields[self.focus]
    }

    /// Error to show under dialog field `position`, if the last attempt failed there.
    pub fn error_for(&self, position: usize) -> Option<&ValidationError> {
        match &self.state {
            DialogState::Rejected(err) if dialog_position(err.field()) == Some(position) => {
                Some(err)
            }
            _ => None,
        }
    }
}

fn dialog_position(field: FormField) -> Option<usize> {
    match field {
        FormField::Statement => Some(0),
        FormField::Option(n) if (1..=4).contains(&n) => Some(n as usize),
        FormField::Answer => Some(5),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Editing,
    Busy,
    Finished { at: Instant },
    Failed(String),
}

/// What [`QuizComposer::submit`] did with a form that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// An upload is already running or has finished; nothing was sent.
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerFocus {
    Title,
    Category,
    Questions,
}

/// State of the create-quiz screen for one composition session.
#[derive(Debug)]
pub struct QuizComposer {
    store: QuestionListStore,
    presenter: QuestionListPresenter,
    last_patch: Vec<ListOp>,
    pub title: TextField,
    categories: Vec<Category>,
    selected_category: Option<usize>,
    category_status: LoadStatus,
    creator: UserProfile,
    dialog: Option<QuestionDialog>,
    focus: ComposerFocus,
    selected_row: usize,
    form_error: Option<ValidationError>,
    upload: UploadPhase,
    min_questions: usize,
    success_delay: Duration,
    category_sub: Option<Subscription<Vec<Category>>>,
    identity_sub: Option<Subscription<UserProfile>>,
    upload_sub: Option<Subscription<()>>,
}

impl QuizComposer {
    pub fn new(min_questions: usize, success_delay: Duration) -> Self {
        Self {
            store: QuestionListStore::new(),
            presenter: QuestionListPresenter::new(),
            last_patch: Vec::new(),
            title: TextField::new(),
            categories: Vec::new(),
            selected_category: None,
            category_status: LoadStatus::Idle,
            creator: UserProfile::default(),
            dialog: None,
            focus: ComposerFocus::Title,
            selected_row: 0,
            form_error: None,
            upload: UploadPhase::Editing,
            min_questions: min_questions.max(1),
            success_delay,
            category_sub: None,
            identity_sub: None,
            upload_sub: None,
        }
    }

    /// Requests the category list and creator identity.
    pub fn start(&mut self, handle: &dyn BackendHandle) {
        self.load_categories(handle);
        self.load_identity(handle);
    }

    pub fn load_categories(&mut self, handle: &dyn BackendHandle) {
        self.category_status = LoadStatus::Loading;
        self.category_sub = Some(handle.fetch_categories());
    }

    pub fn load_identity(&mut self, handle: &dyn BackendHandle) {
        self.identity_sub = Some(handle.current_user());
    }

    /// Applies every notification that arrived since the last poll.
    pub fn poll(&mut self, now: Instant) {
        if let Some(sub) = self.category_sub.take() {
            for response in sub.drain() {
                match response {
                    NetworkResponse::Loading => self.category_status = LoadStatus::Loading,
                    NetworkResponse::Success(categories) => {
                        self.set_categories(categories);
                        self.category_status = LoadStatus::Loaded;
                    }
                    NetworkResponse::Failure(message) => {
                        self.category_status = LoadStatus::Failed(message);
                    }
                }
            }
            if !sub.is_finished() {
                self.category_sub = Some(sub);
            }
        }

        if let Some(sub) = self.identity_sub.take() {
            for response in sub.drain() {
                match response {
                    NetworkResponse::Success(user) => self.creator = user,
                    NetworkResponse::Failure(message) => {
                        logger::log(&format!("Could not load user profile: {}", message));
                    }
                    NetworkResponse::Loading => {}
                }
            }
            if !sub.is_finished() {
                self.identity_sub = Some(sub);
            }
        }

        if let Some(sub) = self.upload_sub.take() {
            for response in sub.drain() {
                self.apply_upload_response(response, now);
            }
            if !sub.is_finished() && self.upload == UploadPhase::Busy {
                self.upload_sub = Some(sub);
            }
        }
    }

    fn apply_upload_response(&mut self, response: NetworkResponse<()>, now: Instant) {
        match response {
            NetworkResponse::Loading => self.upload = UploadPhase::Busy,
            NetworkResponse::Success(()) => {
                logger::log("Quiz upload finished");
                self.upload = UploadPhase::Finished { at: now };
            }
            NetworkResponse::Failure(message) => {
                logger::log(&format!("Quiz upload failed: {}", message));
                self.upload = UploadPhase::Failed(message);
            }
        }
    }

    fn set_categories(&mut self, categories: Vec<Category>) {
        let selected_id = self.selected_category().map(|c| c.id.clone());
        self.categories = categories;
        self.selected_category =
            selected_id.and_then(|id| self.categories.iter().position(|c| c.id == id));
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_status(&self) -> &LoadStatus {
        &self.category_status
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.and_then(|i| self.categories.get(i))
    }

    pub fn select_category(&mut self, position: usize) -> Result<&Category, OutOfRangeError> {
        if position >= self.categories.len() {
            return Err(OutOfRangeError {
                position,
                len: self.categories.len(),
            });
        }
        self.selected_category = Some(position);
        if self.form_error == Some(ValidationError::NoCategorySelected) {
            self.form_error = None;
        }
        Ok(&self.categories[position])
    }

    pub fn select_next_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let next = match self.selected_category {
            Some(i) => (i + 1) % self.categories.len(),
            None => 0,
        };
        let _ = self.select_category(next);
    }

    pub fn select_previous_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        let len = self.categories.len();
        let previous = match self.selected_category {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        let _ = self.select_category(previous);
    }

    pub fn creator(&self) -> &UserProfile {
        &self.creator
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        self.presenter.rows()
    }

    pub fn question_count(&self) -> usize {
        self.store.count()
    }

    /// Patch produced by the most recent change to the question list.
    pub fn last_patch(&self) -> &[ListOp] {
        &self.last_patch
    }

    pub fn focus(&self) -> ComposerFocus {
        self.focus
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn form_error(&self) -> Option<&ValidationError> {
        self.form_error.as_ref()
    }

    pub fn upload_phase(&self) -> &UploadPhase {
        &self.upload
    }

    pub fn min_questions(&self) -> usize {
        self.min_questions
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.upload, UploadPhase::Editing | UploadPhase::Failed(_))
    }

    fn refresh(&mut self) {
        self.last_patch = self.presenter.render(self.store.snapshot());
        self.selected_row = self
            .selected_row
            .min(self.store.count().saturating_sub(1));
    }

    pub fn dialog(&self) -> Option<&QuestionDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut QuestionDialog> {
        self.dialog.as_mut()
    }

    pub fn open_dialog(&mut self) {
        if self.is_editable() && self.dialog.is_none() {
            self.dialog = Some(QuestionDialog::new());
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Validates the open dialog. On success the question is admitted and the
    /// dialog closes; on failure it stays open showing the error.
    pub fn confirm_dialog(&mut self) -> Option<Result<usize, ValidationError>> {
        let mut dialog = self.dialog.take()?;
        dialog.state = DialogState::Validating;

        let result = self.admit(&dialog.draft());
        match &result {
            Ok(_) => dialog.state = DialogState::Admitted,
            Err(err) => {
                dialog.state = DialogState::Rejected(err.clone());
                self.dialog = Some(dialog);
            }
        }
        Some(result)
    }

    /// Validates `draft` and appends it with the next sequential index.
    pub fn admit(&mut self, draft: &QuestionDraft) -> Result<usize, ValidationError> {
        let question = validate_question(draft)?;
        let index = self.store.next_index();
        self.store.append(question.into_record(index));
        if matches!(
            self.form_error,
            Some(ValidationError::InsufficientQuestions { .. })
        ) && self.store.count() >= self.min_questions
        {
            self.form_error = None;
        }
        self.refresh();
        logger::log(&format!(
            "Admitted question {} ({} in list)",
            index,
            self.store.count()
        ));
        Ok(index)
    }

    pub fn remove_item(&mut self, position: usize) -> Result<QuestionRecord, OutOfRangeError> {
        let removed = self.store.remove_at(position)?;
        self.refresh();
        logger::log(&format!(
            "Removed question {} at position {}",
            removed.index, position
        ));
        Ok(removed)
    }

    /// Submission preconditions, checked in order: enough questions, a title,
    /// a category.
    pub fn validate_submission(&self) -> Result<&Category, ValidationError> {
        if self.store.count() < self.min_questions {
            return Err(ValidationError::InsufficientQuestions {
                minimum: self.min_questions,
            });
        }
        if self.title.trimmed().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.selected_category()
            .ok_or(ValidationError::NoCategorySelected)
    }

    pub fn build_payload(&self) -> Result<QuizPayload, ValidationError> {
        let category = self.validate_submission()?;
        Ok(QuizPayload::new(
            self.title.trimmed().to_string(),
            category,
            &self.creator,
            self.store.snapshot().to_vec(),
        ))
    }

    /// Validates the form and hands the payload to the upload service.
    /// Nothing is sent while an upload is already running or done.
    pub fn submit(
        &mut self,
        handle: &dyn BackendHandle,
    ) -> Result<SubmitOutcome, ValidationError> {
        if !self.is_editable() {
            return Ok(SubmitOutcome::AlreadySubmitted);
        }
        let payload = match self.build_payload() {
            Ok(payload) => payload,
            Err(err) => {
                logger::log(&format!("Submission blocked: {}", err));
                self.form_error = Some(err.clone());
                return Err(err);
            }
        };
        logger::log(&format!(
            "Submitting quiz {:?} with {} question(s)",
            payload.title, payload.total_questions
        ));
        self.form_error = None;
        self.upload = UploadPhase::Busy;
        self.upload_sub = Some(handle.upload(payload));
        Ok(SubmitOutcome::Sent)
    }

    /// Dismisses an upload failure so the form can be edited again.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.upload, UploadPhase::Failed(_)) {
            self.upload = UploadPhase::Editing;
        }
    }

    /// Fraction of the completion delay already elapsed, for the success gauge.
    pub fn completion_progress(&self, now: Instant) -> f64 {
        match self.upload {
            UploadPhase::Finished { at } if !self.success_delay.is_zero() => {
                let elapsed = now.saturating_duration_since(at).as_secs_f64();
                (elapsed / self.success_delay.as_secs_f64()).min(1.0)
            }
            UploadPhase::Finished { .. } => 1.0,
            _ => 0.0,
        }
    }

    /// True once the success screen has been shown for the full delay.
    pub fn navigation_due(&self, now: Instant) -> bool {
        match self.upload {
            UploadPhase::Finished { at } => now.saturating_duration_since(at) >= self.success_delay,
            _ => false,
        }
    }

    /// Stops listening to every outstanding request.
    pub fn detach(&mut self) {
        self.category_sub = None;
        self.identity_sub = None;
        self.upload_sub = None;
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            ComposerFocus::Title => ComposerFocus::Category,
            ComposerFocus::Category => ComposerFocus::Questions,
            ComposerFocus::Questions => ComposerFocus::Title,
        };
    }

    fn focus_previous(&mut self) {
        self.focus = match self.focus {
            ComposerFocus::Title => ComposerFocus::Questions,
            ComposerFocus::Category => ComposerFocus::Title,
            ComposerFocus::Questions => ComposerFocus::Category,
        };
    }
}

pub fn handle_composer_input(
    composer: &mut QuizComposer,
    key: KeyEvent,
    handle: &dyn BackendHandle,
    nav: &mut dyn NavigationHost,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match composer.upload_phase() {
        UploadPhase::Busy => {
            if key.code == KeyCode::Esc {
                logger::log("Leaving the composer while the upload is running");
                composer.detach();
                nav.navigate_back();
            }
            return;
        }
        UploadPhase::Finished { .. } => return,
        UploadPhase::Failed(_) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                composer.acknowledge_failure();
            }
            return;
        }
        UploadPhase::Editing => {}
    }

    if composer.dialog.is_some() {
        match key.code {
            KeyCode::Esc => composer.cancel_dialog(),
            KeyCode::Enter => {
                let _ = composer.confirm_dialog();
            }
            code => {
                if let Some(dialog) = composer.dialog.as_mut() {
                    match code {
                        KeyCode::Tab | KeyCode::Down => dialog.focus_next(),
                        KeyCode::BackTab | KeyCode::Up => dialog.focus_previous(),
                        _ => {
                            dialog.focused_field_mut().handle_key(key);
                        }
                    }
                }
            }
        }
        return;
    }

    match key.code {
        KeyCode::Char('s') if ctrl => {
            let _ = composer.submit(handle);
            return;
        }
        KeyCode::Char('n') if ctrl => {
            composer.open_dialog();
            return;
        }
        KeyCode::Esc => {
            composer.detach();
            nav.navigate_back();
            return;
        }
        KeyCode::Tab => {
            composer.focus_next();
            return;
        }
        KeyCode::BackTab => {
            composer.focus_previous();
            return;
        }
        _ => {}
    }

    match composer.focus {
        ComposerFocus::Title => {
            if composer.title.handle_key(key)
                && composer.form_error == Some(ValidationError::EmptyTitle)
            {
                composer.form_error = None;
            }
        }
        ComposerFocus::Category => match key.code {
            KeyCode::Right | KeyCode::Down => composer.select_next_category(),
            KeyCode::Left | KeyCode::Up => composer.select_previous_category(),
            KeyCode::Char('r') if matches!(composer.category_status, LoadStatus::Failed(_)) => {
                composer.load_categories(handle);
            }
            _ => {}
        },
        ComposerFocus::Questions => match key.code {
            KeyCode::Up => composer.selected_row = composer.selected_row.saturating_sub(1),
            KeyCode::Down => {
                if composer.selected_row + 1 < composer.question_count() {
                    composer.selected_row += 1;
                }
            }
            KeyCode::Char('a') | KeyCode::Enter => composer.open_dialog(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if composer.question_count() > 0 {
                    let _ = composer.remove_item(composer.selected_row);
                }
            }
            _ => {}
        },
    }
}
