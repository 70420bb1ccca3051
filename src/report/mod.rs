// src/report/mod.rs
// =============================================================================
// This module builds link reports.
//
// Submodules:
// - aggregate: Joins stored requests into one ordered list of lines
// - pdf: Renders those lines into a PDF document
// =============================================================================

mod aggregate;
mod pdf;

pub use aggregate::{aggregate, report_lines, REPORT_TITLE};
pub use pdf::{PdfRenderer, RenderError, Renderer};
