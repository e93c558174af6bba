//! Sequence-tagged asynchronous lookups.
//!
//! A shopper switching quickly between products can fire several variant
//! lookups whose responses arrive out of order. Each request takes a
//! [`Ticket`] from a [`LookupTracker`]; only the response carrying the most
//! recent ticket is applied, so the stored value always corresponds to the
//! last request issued.

use serde::Serialize;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Sequence number of this request.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// Observable state of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupState<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for LookupState<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }
}

/// Tracks the latest request for one lookup slot.
#[derive(Debug, Clone)]
pub struct LookupTracker<T> {
    next_seq: u64,
    latest: Option<Ticket>,
    state: LookupState<T>,
}

impl<T> Default for LookupTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LookupTracker<T> {
    /// An idle tracker with no value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_seq: 0,
            latest: None,
            state: LookupState {
                value: None,
                loading: false,
                error: None,
            },
        }
    }

    /// Issue a new request. Any earlier in-flight request becomes stale.
    ///
    /// The previous value and error are cleared so the slot never shows a
    /// result for an input it is no longer looking up.
    pub fn begin(&mut self) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket(self.next_seq);
        self.latest = Some(ticket);
        self.state = LookupState {
            value: None,
            loading: true,
            error: None,
        };
        ticket
    }

    /// Apply a response. Returns `false` (and changes nothing) if a newer
    /// request has been issued since `ticket`.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<T, String>) -> bool {
        if self.latest != Some(ticket) {
            return false;
        }
        self.state = match outcome {
            Ok(value) => LookupState {
                value: Some(value),
                loading: false,
                error: None,
            },
            Err(error) => LookupState {
                value: None,
                loading: false,
                error: Some(error),
            },
        };
        true
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LookupState<T> {
        &self.state
    }

    /// The most recently issued ticket.
    #[must_use]
    pub const fn latest(&self) -> Option<Ticket> {
        self.latest
    }

    /// Whether `ticket` is still the most recent request.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest == Some(ticket)
    }
}
