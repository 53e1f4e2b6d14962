//! Transient toasts raised by the views.

use std::time::{Duration, Instant};

/// Kind of notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Operation succeeded; expires on its own.
    Success,
    /// Operation failed; stays until dismissed.
    Error,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Success or error.
    pub kind: NoticeKind,
    /// Message shown to the user.
    pub message: String,
    /// When the notice disappears; `None` means never.
    pub expires_at: Option<Instant>,
}

impl Notice {
    /// Returns `true` once `now` has reached the expiry.
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Queue of notices for one view, oldest first.
///
/// Time is passed in rather than read so callers control the clock.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Raises a success notice that expires `ttl` after `now`.
    pub fn success(&mut self, message: impl Into<String>, ttl: Duration, now: Instant) {
        self.items.push(Notice {
            kind: NoticeKind::Success,
            message: message.into(),
            expires_at: Some(now + ttl),
        });
    }

    /// Raises an error notice that persists until dismissed.
    pub fn error(&mut self, message: impl Into<String>) {
        self.items.push(Notice {
            kind: NoticeKind::Error,
            message: message.into(),
            expires_at: None,
        });
    }

    /// Drops expired notices.
    pub fn tick(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    /// Dismisses the notice at `index`, returning it.
    pub fn dismiss(&mut self, index: usize) -> Option<Notice> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Dismisses everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates over live notices, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    /// The most recent notice.
    #[must_use]
    pub fn latest(&self) -> Option<&Notice> {
        self.items.last()
    }

    /// Number of live notices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no notices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
