use std::sync::atomic::{AtomicU64, Ordering};

/// A polled endpoint whose responses may arrive out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Status,
    Portfolio,
    Trades,
    Logs,
    Signals,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::Status,
        Feed::Portfolio,
        Feed::Trades,
        Feed::Logs,
        Feed::Signals,
    ];

    fn slot(&self) -> usize {
        match self {
            Feed::Status => 0,
            Feed::Portfolio => 1,
            Feed::Trades => 2,
            Feed::Logs => 3,
            Feed::Signals => 4,
        }
    }
}

/// Issued when a request goes out, checked when its response comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub feed: Feed,
    pub seq: u64,
}

/// Per-feed request counters. Only the response to the most recently issued
/// request of a feed may be applied.
#[derive(Debug, Default)]
pub struct FeedSequencer {
    latest: [AtomicU64; 5],
}

impl FeedSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, feed: Feed) -> Ticket {
        let seq = self.latest[feed.slot()].fetch_add(1, Ordering::AcqRel) + 1;
        Ticket { feed, seq }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.feed.slot()].load(Ordering::Acquire) == ticket.seq
    }

    #[cfg(test)]
    pub fn latest(&self, feed: Feed) -> u64 {
        self.latest[feed.slot()].load(Ordering::Acquire)
    }
}
