//! Bounded-concurrency resolution of wordlist candidates.
//!
//! A fixed number of worker tasks pull candidates from a shared, immutable
//! list through an atomic cursor. Each worker keeps its own partial result and
//! counters; they are merged once every worker has returned, so nothing is
//! shared mutably while queries are in flight.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use subscout_common::{Domain, Subdomain, normalize};

use crate::progress::ProgressReporter;
use crate::resolver::{NameResolver, ResolutionOutcome};

#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    /// Maximum number of in-flight resolutions.
    pub concurrency: usize,
    /// Bound on one resolution, enforced here whatever the resolver does.
    pub query_timeout: Duration,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionStats {
    pub resolved: usize,
    pub not_found: usize,
    pub no_answer: usize,
    pub timed_out: usize,
    pub errored: usize,
    /// Wordlist entries that did not form a valid name and were never sent.
    pub skipped: usize,
}

impl ResolutionStats {
    fn record(&mut self, outcome: &ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Resolved(_) => self.resolved += 1,
            ResolutionOutcome::NotFound => self.not_found += 1,
            ResolutionOutcome::NoAnswer => self.no_answer += 1,
            ResolutionOutcome::TimedOut => self.timed_out += 1,
            ResolutionOutcome::Errored(_) => self.errored += 1,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.resolved += other.resolved;
        self.not_found += other.not_found;
        self.no_answer += other.no_answer;
        self.timed_out += other.timed_out;
        self.errored += other.errored;
        self.skipped += other.skipped;
    }

    /// Candidates that were actually queried.
    pub fn processed(&self) -> usize {
        self.resolved + self.not_found + self.no_answer + self.timed_out + self.errored
    }
}

#[derive(Debug, Default)]
pub struct PoolReport {
    pub subdomains: HashSet<Subdomain>,
    pub stats: ResolutionStats,
}

impl PoolReport {
    fn record(&mut self, outcome: ResolutionOutcome) {
        self.stats.record(&outcome);
        if let ResolutionOutcome::Resolved(name) = outcome {
            self.subdomains.insert(name);
        }
    }

    fn merge(&mut self, partial: PoolReport) {
        self.subdomains.extend(partial.subdomains);
        self.stats.merge(&partial.stats);
    }
}

struct WorkQueue {
    candidates: Vec<Subdomain>,
    cursor: AtomicUsize,
    processed: AtomicUsize,
    resolver: Arc<dyn NameResolver>,
    query_timeout: Duration,
    progress: Arc<dyn ProgressReporter>,
    stop: Arc<AtomicBool>,
}

/// Resolves `label.domain` for every wordlist label and returns the names
/// that resolved.
///
/// Timeouts are never retried and per-candidate failures are only counted.
/// Raising `stop` ends dispatch; queries already in flight still run to
/// completion or timeout.
pub async fn resolve_all(
    labels: &[String],
    domain: &Domain,
    resolver: Arc<dyn NameResolver>,
    options: PoolOptions,
    progress: Arc<dyn ProgressReporter>,
    stop: Arc<AtomicBool>,
) -> PoolReport {
    let (candidates, skipped) = build_candidates(labels, domain);
    let mut report = PoolReport::default();
    report.stats.skipped = skipped;

    if candidates.is_empty() {
        return report;
    }

    let workers = options.concurrency.clamp(1, candidates.len());
    debug!("probing {} candidates with {workers} workers", candidates.len());
    progress.probe_started(candidates.len());

    let queue = Arc::new(WorkQueue {
        candidates,
        cursor: AtomicUsize::new(0),
        processed: AtomicUsize::new(0),
        resolver,
        query_timeout: options.query_timeout,
        progress: progress.clone(),
        stop,
    });

    let mut handles = JoinSet::new();
    for _ in 0..workers {
        handles.spawn(run_worker(queue.clone()));
    }

    while let Some(joined) = handles.join_next().await {
        match joined {
            Ok(partial) => report.merge(partial),
            Err(e) => warn!("resolution worker died: {e}"),
        }
    }

    progress.probe_finished();
    report
}

async fn run_worker(queue: Arc<WorkQueue>) -> PoolReport {
    let mut local = PoolReport::default();

    while !queue.stop.load(Ordering::Relaxed) {
        let index = queue.cursor.fetch_add(1, Ordering::Relaxed);
        let Some(candidate) = queue.candidates.get(index) else {
            break;
        };

        let outcome = tokio::time::timeout(queue.query_timeout, queue.resolver.resolve(candidate))
            .await
            .unwrap_or(ResolutionOutcome::TimedOut);

        trace!(name = %candidate, ?outcome, "probe finished");
        local.record(outcome);

        let processed = queue.processed.fetch_add(1, Ordering::Relaxed) + 1;
        queue.progress.probe_advanced(processed);
    }

    local
}

/// Qualifies and validates wordlist labels. Returns the unique candidates in
/// wordlist order and the number of entries that were unusable.
fn build_candidates(labels: &[String], domain: &Domain) -> (Vec<Subdomain>, usize) {
    let mut seen: HashSet<Subdomain> = HashSet::new();
    let mut candidates = Vec::with_capacity(labels.len());
    let mut skipped = 0;

    for label in labels {
        let name = if label.contains('*') {
            None
        } else {
            normalize(&domain.qualify(label), domain)
        };

        match name {
            Some(name) => {
                if seen.insert(name.clone()) {
                    candidates.push(name);
                }
            }
            None => {
                trace!(label = label.as_str(), "unusable wordlist entry");
                skipped += 1;
            }
        }
    }

    (candidates, skipped)
}
