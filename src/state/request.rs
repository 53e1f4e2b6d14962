//! Per-operation request lifecycle and stale-response suppression.

/// Lifecycle of one backend operation.
///
/// `Idle -> Pending -> Succeeded(payload) | Failed(reason)`. A view holds
/// one of these per operation it can issue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Succeeded(T),
    /// The last request failed.
    Failed(String),
}

impl<T> RequestState<T> {
    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if nothing has been requested.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns the payload of a successful request.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the failure reason.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Folds a result into the matching terminal state.
    #[must_use]
    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Generation marker for an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// The generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides whether a response is still wanted.
///
/// Only the most recently issued ticket is current; responses carrying an
/// older ticket are discarded.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    /// Creates a sequencer with no outstanding requests.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issues a ticket that supersedes every earlier one.
    pub const fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Returns `true` if `ticket` is the latest issued.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Passes `result` through only when `ticket` is still current.
    pub fn complete<T>(&self, ticket: Ticket, result: crate::Result<T>) -> Option<crate::Result<T>> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest,
                "Discarding stale response"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut seq = RequestSequencer::new();
        let first = seq.begin();
        let second = seq.begin();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(seq.complete(first, Ok(1)).is_none());
        assert_eq!(seq.complete(second, Ok(2)).unwrap().unwrap(), 2);
        assert!(second > first);
    }

    #[test]
    fn test_request_state_accessors() {
        let state: RequestState<u32> = RequestState::default();
        assert!(state.is_idle());

        let state = RequestState::from_result(Ok(7));
        assert_eq!(state.value(), Some(&7));

        let state: RequestState<u32> =
            RequestState::from_result(Err(crate::Error::InvalidInput("blank".to_string())));
        assert_eq!(state.error(), Some("invalid input: blank"));
        assert!(!state.is_pending());
    }
}
