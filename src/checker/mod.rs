// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - http: Probes a hostname over HTTP and classifies the answer
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod http;

// Re-export public items so callers can write `checker::HttpProber`
pub use http::{Availability, HttpProber, LinkStatus, Prober};
