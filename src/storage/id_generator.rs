//! Sequential ID generation for tasks and notifications

use thiserror::Error;

/// Raised when no id greater than the last one handed out can be represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Id space exhausted: no id can follow {0}")]
pub struct IdExhausted(pub u64);

/// Hands out strictly increasing ids, starting at 1.
///
/// The pending id always has a successor, so `peek()` stays greater than
/// every id handed out or observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator { next: 1 }
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to [`IdGenerator::next_id`] returns
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Take the next id. The generator is unchanged on error.
    pub fn next_id(&mut self) -> Result<u64, IdExhausted> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(IdExhausted(id))?;
        Ok(id)
    }

    /// Make sure every future id is greater than `id`
    pub fn observe(&mut self, id: u64) -> Result<(), IdExhausted> {
        if id >= self.next {
            self.next = id.checked_add(1).ok_or(IdExhausted(id))?;
        }
        Ok(())
    }

    /// Find the maximum of a set of ids, or 0 when empty
    pub fn find_max_id(ids: impl IntoIterator<Item = u64>) -> u64 {
        ids.into_iter().max().unwrap_or(0)
    }
}
