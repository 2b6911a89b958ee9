// Interaction state machine - Which channel's trend view is open
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub const INACTIVITY_TIMEOUT_SECS: i64 = 120;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Selection {
    Closed,
    Open {
        channel: String,
        opened_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    },
}

/// What a `select` did, so the caller knows whether history must be refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Opened,
    Switched,
    /// The channel was already open; only the timer moved
    Extended,
}

impl SelectOutcome {
    pub fn needs_fetch(&self) -> bool {
        !matches!(self, SelectOutcome::Extended)
    }
}

#[derive(Debug)]
pub struct SelectionMachine {
    state: Selection,
    timeout: TimeDelta,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(INACTIVITY_TIMEOUT_SECS))
    }
}

impl SelectionMachine {
    pub fn new(timeout: TimeDelta) -> Self {
        Self {
            state: Selection::Closed,
            timeout,
        }
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn open_channel(&self) -> Option<&str> {
        match &self.state {
            Selection::Open { channel, .. } => Some(channel),
            Selection::Closed => None,
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match &self.state {
            Selection::Open { closes_at, .. } => Some(*closes_at),
            Selection::Closed => None,
        }
    }

    pub fn select(&mut self, channel: &str, now: DateTime<Utc>) -> SelectOutcome {
        let closes_at = now + self.timeout;

        let outcome = match &mut self.state {
            Selection::Open {
                channel: open,
                closes_at: deadline,
                ..
            } if open.as_str() == channel => {
                *deadline = closes_at;
                return SelectOutcome::Extended;
            }
            Selection::Open { .. } => SelectOutcome::Switched,
            Selection::Closed => SelectOutcome::Opened,
        };

        self.state = Selection::Open {
            channel: channel.to_string(),
            opened_at: now,
            closes_at,
        };
        outcome
    }

    /// Reset the inactivity timer; returns false when nothing is open
    pub fn interact(&mut self, now: DateTime<Utc>) -> bool {
        match &mut self.state {
            Selection::Open { closes_at, .. } => {
                *closes_at = now + self.timeout;
                true
            }
            Selection::Closed => false,
        }
    }

    pub fn close(&mut self) -> bool {
        let was_open = matches!(self.state, Selection::Open { .. });
        self.state = Selection::Closed;
        was_open
    }

    /// Close the view if its deadline has passed; returns whether it closed
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.close(),
            _ => false,
        }
    }
}
