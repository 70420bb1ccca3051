// src/service.rs
// =============================================================================
// The service façade: the two operations the outside world can ask for.
//
// 1. check_links: probe a batch of hostnames, store the results under a new
//    request id, and answer with that id plus a url -> status map
// 2. build_report / render_report: collect the links of earlier requests and
//    hand them to a renderer
//
// Probing happens before the store is touched, so a slow host never holds the
// storage lock.
// =============================================================================

use crate::checker::{Availability, LinkStatus, Prober};
use crate::report::{aggregate, report_lines, RenderError, Renderer, REPORT_TITLE};
use crate::store::{RequestStore, StoreError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

// What a batch check answers with
//
// `statuses` has one entry per distinct url: if a batch repeats a url, the
// last probe wins here, while the stored request keeps every entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub id: u64,
    pub statuses: BTreeMap<String, Availability>,
}

pub struct LinkService<P> {
    store: Arc<RequestStore>,
    prober: P,
    renderer: Box<dyn Renderer>,
}

impl<P: Prober> LinkService<P> {
    pub fn new(store: Arc<RequestStore>, prober: P, renderer: impl Renderer + 'static) -> Self {
        Self {
            store,
            prober,
            renderer: Box::new(renderer),
        }
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    /// Probes every hostname in order and stores the batch as one request.
    ///
    /// Hostnames are probed one after another; duplicates are probed (and
    /// stored) once per occurrence. Fails only when the store has no ids left.
    pub async fn check_links(&self, hostnames: Vec<String>) -> Result<CheckOutcome, StoreError> {
        let mut links = Vec::with_capacity(hostnames.len());

        for url in hostnames {
            let status = self.prober.probe(&url).await;
            info!(url = %url, status = %status, "checked link");
            links.push(LinkStatus { url, status });
        }

        let saved = self.store.append_request(links)?;
        info!(id = saved.id, links = saved.links.len(), "stored request");

        // Collecting into a map keeps the last status for a repeated url
        let statuses = saved
            .links
            .iter()
            .map(|link| (link.url.clone(), link.status))
            .collect();

        Ok(CheckOutcome {
            id: saved.id,
            statuses,
        })
    }

    /// All links of the requests in `ids`, in creation order.
    ///
    /// Unknown ids contribute nothing.
    pub fn build_report(&self, ids: &[u64]) -> Vec<LinkStatus> {
        let requests = self.store.find_by_ids(ids);
        info!(requested = ids.len(), found = requests.len(), "building report");
        aggregate(&requests)
    }

    /// Builds the report for `ids` and renders it
    pub fn render_report(&self, ids: &[u64]) -> Result<Vec<u8>, RenderError> {
        let links = self.build_report(ids);
        self.renderer.render(REPORT_TITLE, &report_lines(&links))
    }
}
