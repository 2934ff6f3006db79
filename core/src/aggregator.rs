//! # Source Aggregation
//!
//! Runs every enabled source one after the other and folds what they return
//! into a single [`ResultSet`]:
//!
//! 1. passive sources, in registration order (certificate logs, then search);
//! 2. the brute-force probe, through the worker pool.
//!
//! A source that fails contributes nothing and the run carries on. Union is
//! commutative, so the order only changes how progress output interleaves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use subscout_common::{Domain, ResultSet, source::PassiveSource};

use crate::pool::{self, PoolOptions, ResolutionStats};
use crate::progress::{ProgressReporter, Silent};
use crate::resolver::NameResolver;

const BRUTEFORCE_SOURCE: &str = "bruteforce";

/// Everything the active probe needs.
pub struct BruteForce {
    pub labels: Vec<String>,
    pub resolver: Arc<dyn NameResolver>,
    pub options: PoolOptions,
}

pub struct Aggregator {
    domain: Domain,
    passive: Vec<Box<dyn PassiveSource>>,
    bruteforce: Option<BruteForce>,
    progress: Arc<dyn ProgressReporter>,
    stop: Arc<AtomicBool>,
}

impl Aggregator {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            passive: Vec::new(),
            bruteforce: None,
            progress: Arc::new(Silent),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Registers a passive source. Sources run in the order they were added.
    pub fn with_source(mut self, source: Box<dyn PassiveSource>) -> Self {
        self.passive.push(source);
        self
    }

    pub fn with_bruteforce(mut self, bruteforce: BruteForce) -> Self {
        self.bruteforce = Some(bruteforce);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Shares a flag that, once raised, skips the remaining sources and stops
    /// the probe from dispatching new candidates.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub async fn run(self) -> ResultSet {
        let mut results = ResultSet::new(self.domain.clone());

        for source in &self.passive {
            if self.stopped() {
                break;
            }
            self.collect_passive(source.as_ref(), &mut results).await;
        }

        if let Some(bruteforce) = &self.bruteforce
            && !self.stopped()
        {
            self.collect_bruteforce(bruteforce, &mut results).await;
        }

        results
    }

    async fn collect_passive(&self, source: &dyn PassiveSource, results: &mut ResultSet) {
        let name = source.name();
        self.progress.source_started(name);

        let added = match source.fetch(&self.domain).await {
            Ok(candidates) => {
                let summary = results.merge_candidates(&candidates);
                debug!(
                    "{name}: {} candidates, {} rejected, {} already known",
                    candidates.len(),
                    summary.rejected,
                    summary.duplicates
                );
                info!("{name} contributed {} new subdomains", summary.added);
                summary.added
            }
            Err(e) => {
                warn!("{e}; continuing without {name}");
                0
            }
        };

        self.progress.source_finished(name, added);
    }

    async fn collect_bruteforce(&self, bruteforce: &BruteForce, results: &mut ResultSet) {
        self.progress.source_started(BRUTEFORCE_SOURCE);

        let report = pool::resolve_all(
            &bruteforce.labels,
            &self.domain,
            bruteforce.resolver.clone(),
            bruteforce.options,
            self.progress.clone(),
            self.stop.clone(),
        )
        .await;

        log_stats(&report.stats);
        let added = results.extend(report.subdomains);
        info!("{BRUTEFORCE_SOURCE} contributed {added} new subdomains");

        self.progress.source_finished(BRUTEFORCE_SOURCE, added);
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

fn log_stats(stats: &ResolutionStats) {
    debug!(
        "probe: {} resolved, {} nxdomain, {} no answer, {} skipped entries",
        stats.resolved, stats.not_found, stats.no_answer, stats.skipped
    );
    if stats.timed_out > 0 || stats.errored > 0 {
        warn!(
            "{} queries timed out and {} failed; results may be incomplete",
            stats.timed_out, stats.errored
        );
    }
}
