//! Bounded, newest-first notification log

use crate::models::{Notification, NotificationKind};
use crate::storage::id_generator::IdGenerator;

/// Default number of notifications kept
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: Vec<Notification>,
    capacity: usize,
    ids: IdGenerator,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        NotificationLog {
            entries: Vec::new(),
            capacity: capacity.max(1),
            ids: IdGenerator::new(),
        }
    }

    /// Prepend a notification, dropping the oldest past capacity
    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> &Notification {
        let id = match self.ids.next_id() {
            Ok(id) => id,
            Err(e) => {
                // Entries holding the early ids were dropped long ago
                log::warn!("{}, restarting notification ids", e);
                self.ids = IdGenerator::new();
                self.ids.next_id().unwrap_or(1)
            }
        };
        let notification = Notification::new(id, message, kind);
        log::debug!(
            "Notification #{} [{}]: {}",
            notification.id,
            notification.kind,
            notification.message
        );
        self.entries.insert(0, notification);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Mark a notification read. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: u64) {
        if let Some(n) = self.entries.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.entries {
            n.read = true;
        }
    }

    pub fn unread(&self) -> Vec<&Notification> {
        self.entries.iter().filter(|n| !n.read).collect()
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
