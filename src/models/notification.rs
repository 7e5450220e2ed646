//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
    /// Any caller-defined type
    Other(String),
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => NotificationKind::Info,
            "success" => NotificationKind::Success,
            "error" => NotificationKind::Error,
            _ => NotificationKind::Other(s),
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(s: &str) -> Self {
        NotificationKind::from(s.to_string())
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.to_string()
    }
}

/// A user-facing event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(id: u64, message: impl Into<String>, kind: NotificationKind) -> Self {
        Notification {
            id,
            message: message.into(),
            kind,
            timestamp: Utc::now(),
            read: false,
        }
    }
}
