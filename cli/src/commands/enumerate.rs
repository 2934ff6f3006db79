use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use colored::*;
use tracing::{info, warn};

use subscout_common::{Subdomain, config::Config};
use subscout_core::enumerate as engine;

use crate::sprint;
use crate::terminal::{colors, print, progress};

pub async fn enumerate(cfg: &Config) -> anyhow::Result<()> {
    print::header("configuration", cfg.quiet);
    print_settings(cfg);

    let stop: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(stop.clone());

    let reporter = Arc::new(progress::TerminalProgress::new(cfg.quiet < 2));
    let start_time: Instant = Instant::now();
    let result = engine(cfg, reporter, stop.clone()).await;
    progress::finish();

    let names: Vec<Subdomain> = result?;
    if stop.load(Ordering::Relaxed) {
        warn!("Run interrupted, results are partial");
    }

    enumeration_ends(&names, start_time.elapsed(), cfg)
}

/// Runs once the names are on screen.
fn save(cfg: &Config, names: &[Subdomain]) -> anyhow::Result<()> {
    if let Some(path) = subscout_core::save(cfg, names)? {
        info!("Saved {} subdomains to {}", names.len(), path.display());
    }
    Ok(())
}

fn spawn_interrupt_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.store(true, Ordering::Relaxed);
            warn!("Interrupt received, waiting for in-flight queries");
        }
    });
}

fn print_settings(cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    const KEY_WIDTH: usize = 11;
    let enabled = |on: bool| if on { "enabled".green() } else { "disabled".bright_black() };

    print::aligned_line("Target", KEY_WIDTH, cfg.domain.as_str().bold());
    print::aligned_line("CT logs", KEY_WIDTH, "enabled".green());
    print::aligned_line("Search", KEY_WIDTH, enabled(cfg.enable_search));
    print::aligned_line("Bruteforce", KEY_WIDTH, enabled(cfg.enable_bruteforce));

    if cfg.enable_bruteforce {
        let resolvers: Vec<String> = cfg.resolvers.iter().map(ToString::to_string).collect();
        print::aligned_line("Wordlist", KEY_WIDTH, cfg.wordlist.display());
        print::aligned_line("Resolvers", KEY_WIDTH, resolvers.join(", "));
        print::aligned_line("Concurrency", KEY_WIDTH, cfg.concurrency);
        print::aligned_line(
            "Timeout",
            KEY_WIDTH,
            format!("{}ms", cfg.query_timeout.as_millis()),
        );
    }
}

fn enumeration_ends(names: &[Subdomain], total_time: Duration, cfg: &Config) -> anyhow::Result<()> {
    if names.is_empty() {
        print::header("zero subdomains found", cfg.quiet);
        print::no_results();
    } else {
        if cfg.quiet < 2 {
            sprint!();
        }
        print::header("found subdomains", cfg.quiet);

        // Names go to stdout so they can be piped; everything else is on stderr.
        for name in names {
            println!("{name}");
        }
    }

    let saved = save(cfg, names);
    if cfg.quiet < 2 {
        print_summary(names.len(), total_time, cfg);
    }
    saved
}

fn print_summary(found: usize, total_time: Duration, cfg: &Config) {
    let found: ColoredString = format!("{found}").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Total unique subdomains: {found} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => info!("{}", output),
    }
}
