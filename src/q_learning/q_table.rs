//! Q-table keyed by board state and action

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Error, Result,
    tictactoe::{Action, StateKey},
};

/// One stored `(state, action) -> value` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QEntry {
    pub state: StateKey,
    pub action: Action,
    pub value: f64,
}

/// Q-values per state, per action.
///
/// A state gets its row of actions the first time it is visited. Any
/// `(state, action)` pair that has no entry reads as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    values: HashMap<StateKey, BTreeMap<Action, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from stored entries
    pub fn from_entries<I: IntoIterator<Item = QEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.set(entry.state, entry.action, entry.value);
        }
        table
    }

    /// Q-value for a state-action pair, 0.0 when nothing is stored
    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Stored actions and values for a state in row-major action order,
    /// `None` if the state has never been visited
    pub fn actions(&self, state: &StateKey) -> Option<&BTreeMap<Action, f64>> {
        self.values.get(state).filter(|row| !row.is_empty())
    }

    /// Give every action of an unvisited state an explicit 0.0 entry
    pub fn initialize<I: IntoIterator<Item = Action>>(&mut self, state: StateKey, actions: I) {
        let row = self.values.entry(state).or_default();
        for action in actions {
            row.entry(action).or_insert(0.0);
        }
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Largest stored value for a state
    pub fn max_value(&self, state: &StateKey) -> Option<f64> {
        self.actions(state)
            .map(|row| row.values().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// One-step temporal-difference update
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_a' Q(s,a'))
    ///
    /// The maximum ranges over the stored row of the same state, including
    /// the entry being updated. Returns `old − new`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingQEntry`] if `(state, action)` was never
    /// initialized.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: Action,
        reward: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Result<f64> {
        let missing = || Error::MissingQEntry {
            state: state.to_string(),
            action: action.to_string(),
        };
        let row = self.values.get_mut(state).ok_or_else(missing)?;
        let old = *row.get(&action).ok_or_else(missing)?;
        let best = row.values().copied().fold(f64::NEG_INFINITY, f64::max);

        let new = (1.0 - learning_rate) * old + learning_rate * (reward + discount_factor * best);
        row.insert(action, new);

        trace!(%state, %action, reward, old, new, "q-value update");
        Ok(old - new)
    }

    /// Iterate over every stored entry
    pub fn entries(&self) -> impl Iterator<Item = QEntry> + '_ {
        self.values.iter().flat_map(|(state, row)| {
            row.iter().map(move |(&action, &value)| QEntry {
                state: state.clone(),
                action,
                value,
            })
        })
    }

    /// Number of visited states
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of stored Q-values
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
