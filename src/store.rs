use crate::error::OutOfRangeError;
use crate::models::QuestionRecord;

/// Ordered questions of the quiz currently being composed.
///
/// Records keep the `index` they were admitted with; removal shifts later
/// records left without renumbering them.
#[derive(Debug, Default)]
pub struct QuestionListStore {
    records: Vec<QuestionRecord>,
    next_index: usize,
}

impl QuestionListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next admitted record should carry.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn append(&mut self, record: QuestionRecord) {
        self.next_index = self.next_index.max(record.index + 1);
        self.records.push(record);
    }

    pub fn remove_at(&mut self, position: usize) -> Result<QuestionRecord, OutOfRangeError> {
        if position >= self.records.len() {
            return Err(OutOfRangeError {
                position,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(position))
    }

    pub fn snapshot(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
