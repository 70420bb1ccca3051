// src/store/mod.rs
// =============================================================================
// This module owns the durable record of every link check ever made.
//
// Submodules:
// - model: The data we persist (Storage, SavedRequest)
// - file: The JSON-file-backed, lock-guarded RequestStore
// =============================================================================

mod file;
mod model;

pub use file::{RequestStore, StoreError};
pub(crate) use model::null_as_empty;
pub use model::{SavedRequest, Storage};
