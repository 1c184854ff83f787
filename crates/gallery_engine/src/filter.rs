use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use gallery_logging::{gallery_debug, gallery_info, short_url};

use crate::probe::{Prober, ProgressSink};
use crate::timer::{Sleeper, TokioSleeper};
use crate::{EngineEvent, FailureKind, ProbeError, ProbeResult};

#[derive(Debug, Clone)]
pub struct FilterSettings {
    /// Upper bound on probes in flight at once. Zero is treated as one.
    pub batch_size: usize,
    /// A probe still pending after this long counts as failed.
    pub probe_timeout: Duration,
    /// Pause between two batches, not after the last one.
    pub inter_batch_delay: Duration,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            probe_timeout: Duration::from_millis(10_000),
            inter_batch_delay: Duration::from_millis(500),
        }
    }
}

/// Every probe outcome of one filtering pass, in candidate order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub results: Vec<ProbeResult>,
}

impl FilterReport {
    pub fn candidate_count(&self) -> usize {
        self.results.len()
    }

    /// Verified URLs in candidate order.
    pub fn verified(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|result| result.verified)
            .map(|result| result.url.clone())
            .collect()
    }

    pub fn is_empty_input(&self) -> bool {
        self.results.is_empty()
    }

    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|result| !result.verified)
    }
}

struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Order-preserving sieve that keeps the candidates whose probe succeeds.
///
/// Candidates are probed in consecutive batches of `batch_size`. All probes of a
/// batch run concurrently and the next batch starts only after every one of them
/// settled, so at most `batch_size` probes are ever in flight. A timed-out probe
/// future is dropped, which aborts its request.
pub struct ImageAvailabilityFilter {
    prober: Arc<dyn Prober>,
    sleeper: Arc<dyn Sleeper>,
    settings: FilterSettings,
}

impl ImageAvailabilityFilter {
    pub fn new(prober: Arc<dyn Prober>, settings: FilterSettings) -> Self {
        Self {
            prober,
            sleeper: Arc::new(TokioSleeper),
            settings,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Returns the loadable candidates, in input order.
    pub async fn filter(&self, candidates: &[String]) -> Vec<String> {
        self.probe_all(candidates, &NullSink).await.verified()
    }

    /// Probes every candidate and reports each outcome through `sink` as it settles.
    pub async fn probe_all(&self, candidates: &[String], sink: &dyn ProgressSink) -> FilterReport {
        let mut report = FilterReport {
            results: Vec::with_capacity(candidates.len()),
        };
        if candidates.is_empty() {
            return report;
        }

        gallery_info!("probing {} images", candidates.len());
        let batch_size = self.settings.batch_size.max(1);
        for (batch_index, batch) in candidates.chunks(batch_size).enumerate() {
            if batch_index > 0 {
                self.sleeper.sleep(self.settings.inter_batch_delay).await;
            }
            let offset = batch_index * batch_size;
            gallery_debug!("batch {} with {} probes", batch_index + 1, batch.len());
            let probes = batch
                .iter()
                .enumerate()
                .map(|(position, url)| self.probe_one(offset + position, url, sink));
            report.results.extend(join_all(probes).await);
        }

        let verified = report.results.iter().filter(|r| r.verified).count();
        gallery_info!("{}/{} images verified", verified, report.results.len());
        report
    }

    async fn probe_one(&self, index: usize, url: &str, sink: &dyn ProgressSink) -> ProbeResult {
        let outcome = tokio::time::timeout(self.settings.probe_timeout, self.prober.probe(url))
            .await
            .unwrap_or_else(|_elapsed| {
                Err(ProbeError::new(
                    FailureKind::Timeout,
                    format!("no response within {:?}", self.settings.probe_timeout),
                ))
            });

        let verified = match outcome {
            Ok(()) => {
                gallery_debug!("probe ok: {}", short_url(url));
                true
            }
            Err(err) => {
                gallery_debug!("probe failed ({}): {}", err.kind, short_url(url));
                false
            }
        };

        let result = ProbeResult {
            index,
            url: url.to_string(),
            verified,
        };
        sink.emit(EngineEvent::ProbeSettled(result.clone()));
        result
    }
}
