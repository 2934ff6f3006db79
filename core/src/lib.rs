//! # Subscout Core
//!
//! The aggregation and resolution engine.
//!
//! * [`resolver`]: the lookup seam and its `hickory-resolver` implementation.
//! * [`pool`]: bounded-concurrency brute-force resolution.
//! * [`aggregator`]: runs the sources and unions their findings.
//! * [`wordlist`] and [`output`]: file input and JSON persistence.
//!
//! [`enumerate`] wires the production sources together from a [`Config`].

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use tracing::info;

use subscout_common::{Subdomain, config::Config};
use subscout_sources::{CrtSh, SearchScraper};

pub mod aggregator;
pub mod output;
pub mod pool;
pub mod progress;
pub mod resolver;
pub mod wordlist;

use aggregator::{Aggregator, BruteForce};
use pool::PoolOptions;
use progress::ProgressReporter;
use resolver::DnsResolver;

/// Runs a full enumeration and returns the sorted, deduplicated names.
///
/// Configuration problems, including an unreadable wordlist or a missing
/// output directory, are reported before any request is made. Source and
/// per-query failures only shrink the result. Nothing is written to disk;
/// hand the names to [`save`] once they have been shown.
pub async fn enumerate(
    cfg: &Config,
    progress: Arc<dyn ProgressReporter>,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<Vec<Subdomain>> {
    cfg.validate()?;

    let labels = if cfg.enable_bruteforce {
        let labels = wordlist::load(&cfg.wordlist)?;
        info!("Loaded {} words from {}", labels.len(), cfg.wordlist.display());
        Some(labels)
    } else {
        None
    };

    let crtsh = CrtSh::new().context("building certificate log client")?;
    let mut aggregator = Aggregator::new(cfg.domain.clone())
        .with_progress(progress)
        .with_stop_signal(stop)
        .with_source(Box::new(crtsh));

    if cfg.enable_search {
        let search = SearchScraper::new(cfg.search_limit, cfg.search_pages)
            .context("building search client")?;
        aggregator = aggregator.with_source(Box::new(search));
    }

    if let Some(labels) = labels {
        aggregator = aggregator.with_bruteforce(BruteForce {
            labels,
            resolver: Arc::new(DnsResolver::new(&cfg.resolvers, cfg.query_timeout)),
            options: PoolOptions {
                concurrency: cfg.concurrency,
                query_timeout: cfg.query_timeout,
            },
        });
    }

    Ok(aggregator.run().await.finalize())
}

/// Persists `names` to `cfg.output` as JSON. Returns the path written, or
/// `None` when no output was requested.
pub fn save<'a>(cfg: &'a Config, names: &[Subdomain]) -> anyhow::Result<Option<&'a Path>> {
    let Some(path) = cfg.output.as_deref() else {
        return Ok(None);
    };
    output::persist(path, names)?;
    Ok(Some(path))
}
