// Undo/redo history module for the editor.
//
// A bounded, linear buffer of full snapshots with a cursor (`step`) at the
// entry that matches what is on screen.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Number of snapshots kept per page unless configured otherwise.
pub const DEFAULT_MAX_STATES: usize = 20;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct History<T> {
    states: Vec<T>,
    /// `None` only while the buffer is empty.
    step: Option<usize>,

    #[serde(default = "default_max_states")]
    max_states: usize,
}

fn default_max_states() -> usize {
    DEFAULT_MAX_STATES
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STATES)
    }
}

impl<T> History<T> {
    /// An empty history holding at most `max_states` snapshots (at least one).
    pub fn new(max_states: usize) -> Self {
        Self {
            states: Vec::new(),
            step: None,
            max_states: max_states.max(1),
        }
    }

    /// Append a snapshot of the current state.
    ///
    /// Anything after the cursor is discarded first, so drawing after an undo
    /// permanently drops the redo branch. When the buffer overflows, the oldest
    /// entry is evicted and the cursor is left where it is; otherwise the
    /// cursor advances onto the new entry.
    pub fn record(&mut self, snapshot: T) {
        if let Some(step) = self.step {
            if step + 1 < self.states.len() {
                let dropped = self.states.len() - (step + 1);
                self.states.truncate(step + 1);
                debug!(dropped, "Pruned redo branch");
            }
        }

        self.states.push(snapshot);

        if self.states.len() > self.max_states {
            self.states.remove(0);
            debug!(
                max_states = self.max_states,
                step = ?self.step,
                "Evicted oldest snapshot"
            );
        } else {
            self.step = Some(self.step.map_or(0, |s| s + 1));
        }

        trace!(len = self.states.len(), step = ?self.step, "Recorded snapshot");
    }

    /// Step back one entry. `restore` receives the target snapshot; the cursor
    /// only moves if it succeeds. Returns `Ok(false)` at the start of history.
    pub fn undo<E, F>(&mut self, restore: F) -> Result<bool, E>
    where
        F: FnOnce(&T) -> Result<(), E>,
    {
        let Some(step) = self.step.filter(|s| *s > 0) else {
            trace!("Nothing to undo");
            return Ok(false);
        };

        restore(&self.states[step - 1])?;
        self.step = Some(step - 1);
        debug!(step = step - 1, len = self.states.len(), "Undo");
        Ok(true)
    }

    /// Step forward one entry, the mirror of [`History::undo`].
    pub fn redo<E, F>(&mut self, restore: F) -> Result<bool, E>
    where
        F: FnOnce(&T) -> Result<(), E>,
    {
        let Some(step) = self.step.filter(|s| s + 1 < self.states.len()) else {
            trace!("Nothing to redo");
            return Ok(false);
        };

        restore(&self.states[step + 1])?;
        self.step = Some(step + 1);
        debug!(step = step + 1, len = self.states.len(), "Redo");
        Ok(true)
    }

    /// Start over from a single baseline entry that cannot be undone past.
    pub fn reset(&mut self, baseline: T) {
        self.clear();
        self.record(baseline);
        debug!("History reset to baseline");
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.step = None;
    }

    pub fn can_undo(&self) -> bool {
        self.step.is_some_and(|s| s > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.step.is_some_and(|s| s + 1 < self.states.len())
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.step.and_then(|s| self.states.get(s))
    }

    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_states
    }

    pub fn states(&self) -> &[T] {
        &self.states
    }
}
