// src/report/aggregate.rs
// =============================================================================
// Joins stored requests into the flat list of links a report shows.
//
// The order is fixed by storage, not by the caller:
// - requests appear in creation order
// - inside a request, links keep their submission order
// =============================================================================

use crate::checker::LinkStatus;
use crate::store::SavedRequest;

/// First line of every report
pub const REPORT_TITLE: &str = "Links Report";

/// Concatenates the links of `requests`, keeping their order
pub fn aggregate(requests: &[SavedRequest]) -> Vec<LinkStatus> {
    requests
        .iter()
        .flat_map(|request| request.links.iter().cloned())
        .collect()
}

/// One report line per link: "<url> - <status>"
pub fn report_lines(links: &[LinkStatus]) -> Vec<String> {
    links
        .iter()
        .map(|link| format!("{} - {}", link.url, link.status))
        .collect()
}
