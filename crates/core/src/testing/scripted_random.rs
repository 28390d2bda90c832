//! Random source that replays a fixed script.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::random::RandomSource;

/// A [`RandomSource`] that returns queued picks in order, then 0.
///
/// Picks are reduced modulo `len`. Calls are counted so tests can assert
/// whether a tie-break happened.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    picks: Mutex<VecDeque<usize>>,
    calls: Mutex<usize>,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self {
            picks: Mutex::new(picks.into()),
            calls: Mutex::new(0),
        }
    }

    /// Number of `pick` calls so far.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&self, len: usize) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        let next = self
            .picks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(0);
        if len == 0 {
            0
        } else {
            next % len
        }
    }
}
