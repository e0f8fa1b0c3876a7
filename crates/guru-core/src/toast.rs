//! Short-lived user notifications
//!
//! A toast is identified by its creation time in milliseconds and expires
//! [`TOAST_TTL`] after it was raised. Nothing is persisted.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How long a toast stays visible
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Creation time in epoch milliseconds (unique within a queue)
    pub id: i64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).to_std().map_or(false, |age| age >= TOAST_TTL)
    }
}

/// FIFO of pending notifications
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    last_id: i64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a notification stamped at `now`
    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        self.toasts.push_back(Toast {
            id,
            message: message.into(),
            severity,
            created_at: now,
        });
        id
    }

    /// Toasts still visible at `now`; expired ones are discarded
    pub fn active(&mut self, now: DateTime<Utc>) -> Vec<Toast> {
        self.toasts.retain(|t| !t.is_expired(now));
        self.toasts.iter().cloned().collect()
    }

    /// Take every pending toast, oldest first
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    /// Most recent toast, if any
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
