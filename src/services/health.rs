//! Backend health sampling.
//!
//! There is no health endpoint, so health is inferred by timing a few
//! real read routes. One route answering means the backend is online.

use std::time::Instant;

use crate::api::ApiClient;
use crate::types::HealthSnapshot;

const PROBE_PATHS: &[&str] = &[
    "/api/approvals/pending",
    "/api/activity/recent",
    "/api/expense/list",
];

/// Time each probe route and aggregate. Latency is averaged over the
/// probes that succeeded; zero successes means offline.
pub async fn sample_health(client: &ApiClient) -> HealthSnapshot {
    let mut probes_ok = 0usize;
    let mut total_ms = 0u128;

    for path in PROBE_PATHS {
        let started = Instant::now();
        match client.get_json(path).await {
            Ok(_) => {
                probes_ok += 1;
                total_ms += started.elapsed().as_millis();
            }
            Err(e) => log::debug!("health probe {} failed: {}", path, e),
        }
    }

    HealthSnapshot {
        avg_latency_ms: if probes_ok > 0 {
            (total_ms / probes_ok as u128) as u64
        } else {
            0
        },
        online: probes_ok > 0,
        probes_ok,
        probes_total: PROBE_PATHS.len(),
    }
}
