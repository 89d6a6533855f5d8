use std::{collections::HashMap, time::Duration};

use shared::domain::Command;
use tokio::time::Instant;

/// Last accepted dispatch per command. A command is ready again once strictly
/// more than `window` has elapsed since its own last dispatch.
#[derive(Debug, Clone)]
pub struct CooldownTable {
    window: Duration,
    last_dispatch: HashMap<Command, Instant>,
}

impl CooldownTable {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_dispatch: HashMap::new(),
        }
    }

    pub fn is_ready(&self, command: Command, now: Instant) -> bool {
        match self.last_dispatch.get(&command) {
            None => true,
            Some(last) => now.saturating_duration_since(*last) > self.window,
        }
    }

    /// Records `now` and returns true when `command` is ready; otherwise leaves
    /// the table untouched.
    pub fn try_consume(&mut self, command: Command, now: Instant) -> bool {
        if !self.is_ready(command, now) {
            return false;
        }
        self.last_dispatch.insert(command, now);
        true
    }

    pub fn last_dispatch(&self, command: Command) -> Option<Instant> {
        self.last_dispatch.get(&command).copied()
    }
}
