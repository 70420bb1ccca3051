// src/store/model.rs
// =============================================================================
// The in-memory shape of everything we persist.
//
// Storage is logically append-only: requests are pushed with a fresh id and
// never modified or removed afterwards.
// =============================================================================

use crate::checker::LinkStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

// Every id up to u64::MAX has been used up
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request ids are exhausted")]
pub struct IdsExhausted;

// One "check links" call and its results, in submission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRequest {
    pub id: u64,
    // Older storage files wrote `null` for a batch with no links
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<LinkStatus>,
}

// Everything the service knows, exactly as written to the storage file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requests: Vec<SavedRequest>,
    /// Always one greater than the highest id ever issued
    pub next_id: u64,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            next_id: 1,
        }
    }
}

impl Storage {
    /// Allocates the next id and appends a request holding `links`.
    ///
    /// `next_id` is advanced before anything is stored, so an id that can't
    /// be followed by another is never handed out.
    pub fn push(&mut self, links: Vec<LinkStatus>) -> Result<SavedRequest, IdsExhausted> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(IdsExhausted)?;

        let saved = SavedRequest { id, links };
        self.requests.push(saved.clone());
        Ok(saved)
    }

    /// Requests whose id is in `ids`, in storage order
    pub fn select(&self, ids: &HashSet<u64>) -> Vec<SavedRequest> {
        self.requests
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect()
    }

    /// The first id that appears more than once, if any
    pub fn duplicate_id(&self) -> Option<u64> {
        let mut seen = HashSet::with_capacity(self.requests.len());
        self.requests.iter().map(|r| r.id).find(|id| !seen.insert(*id))
    }

    /// Lifts `next_id` above every stored id.
    ///
    /// Returns true if it had to change. Fails when no id is left to issue.
    pub fn repair_next_id(&mut self) -> Result<bool, IdsExhausted> {
        let floor = match self.requests.iter().map(|r| r.id).max() {
            Some(max) => max.checked_add(1).ok_or(IdsExhausted)?,
            None => 1,
        };

        if self.next_id == u64::MAX {
            return Err(IdsExhausted);
        }

        if self.next_id < floor {
            self.next_id = floor;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
