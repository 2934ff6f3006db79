use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use subscout_common::config::Config;
use subscout_common::error::ConfigError;
use subscout_common::{Domain, Subdomain};
use subscout_core::aggregator::{Aggregator, BruteForce};
use subscout_core::pool::PoolOptions;
use subscout_core::progress::Silent;
use subscout_core::{output, wordlist};

use super::fakes::{CannedSource, GarbledSource, Zone, ZoneResolver};

fn example() -> Domain {
    "example.com".parse().unwrap()
}

fn bruteforce(words: &[&str], resolver: ZoneResolver) -> BruteForce {
    BruteForce {
        labels: words.iter().map(|w| w.to_string()).collect(),
        resolver: Arc::new(resolver),
        options: PoolOptions {
            concurrency: 50,
            query_timeout: Duration::from_millis(200),
        },
    }
}

fn strings(names: Vec<Subdomain>) -> Vec<String> {
    names.into_iter().map(Subdomain::into_string).collect()
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("subscout-{}-{name}", std::process::id()))
}

#[tokio::test]
async fn certificate_log_names_are_normalized() {
    let results = Aggregator::new(example())
        .with_source(CannedSource::boxed(
            "crt.sh",
            &["*.example.com", "api.example.com", "WWW.example.com."],
        ))
        .run()
        .await;

    assert_eq!(
        strings(results.finalize()),
        ["api.example.com", "example.com", "www.example.com"]
    );
}

#[tokio::test]
async fn bruteforce_keeps_only_resolving_names() {
    let resolver = ZoneResolver::new(vec![
        ("api.example.com", Zone::A),
        ("mail.example.com", Zone::A),
        ("doesnotexist123456.example.com", Zone::NxDomain),
    ]);

    let results = Aggregator::new(example())
        .with_bruteforce(bruteforce(&["api", "mail", "doesnotexist123456"], resolver))
        .run()
        .await;

    assert_eq!(
        strings(results.finalize()),
        ["api.example.com", "mail.example.com"]
    );
}

#[tokio::test]
async fn unrelated_search_hits_never_reach_the_result() {
    let results = Aggregator::new(example())
        .with_source(CannedSource::boxed("crt.sh", &["api.example.com"]))
        .with_source(CannedSource::boxed(
            "search",
            &["evil.com", "blog.example.com", "notexample.com"],
        ))
        .run()
        .await;

    let names = strings(results.finalize());
    assert_eq!(names, ["api.example.com", "blog.example.com"]);
    assert!(!names.iter().any(|n| n == "evil.com"));
}

#[tokio::test]
async fn passive_and_active_findings_are_unioned_once() {
    let resolver = ZoneResolver::new(vec![
        ("api.example.com", Zone::A),
        ("vpn.example.com", Zone::A),
    ]);

    let results = Aggregator::new(example())
        .with_source(CannedSource::boxed(
            "crt.sh",
            &["a.example.com", "A.example.com", "a.example.com.", "API.example.com"],
        ))
        .with_source(CannedSource::boxed("search", &["api.example.com"]))
        .with_bruteforce(bruteforce(&["api", "vpn", "nothing"], resolver))
        .run()
        .await;

    assert_eq!(
        strings(results.finalize()),
        ["a.example.com", "api.example.com", "vpn.example.com"]
    );
}

#[tokio::test]
async fn failures_degrade_to_smaller_results() {
    let resolver = ZoneResolver::new(vec![
        ("stuck.example.com", Zone::Slow),
        ("refused.example.com", Zone::Refused),
        ("www.example.com", Zone::A),
        ("dev.example.com", Zone::A),
    ]);

    let results = Aggregator::new(example())
        .with_source(Box::new(GarbledSource))
        .with_source(CannedSource::boxed("crt.sh", &["shop.example.com"]))
        .with_bruteforce(bruteforce(&["stuck", "refused", "www", "dev"], resolver))
        .run()
        .await;

    assert_eq!(
        strings(results.finalize()),
        ["dev.example.com", "shop.example.com", "www.example.com"]
    );
}

#[tokio::test]
async fn wordlist_file_drives_the_probe_and_output_is_persisted() {
    let words = scratch_file("words.txt");
    let out = scratch_file("out.json");
    fs::write(&words, "# common\nmail\napi\n\nftp\n").unwrap();

    let labels = wordlist::load(&words).unwrap();
    let resolver = ZoneResolver::new(vec![
        ("mail.example.com", Zone::A),
        ("api.example.com", Zone::A),
    ]);

    let names = Aggregator::new(example())
        .with_bruteforce(BruteForce {
            labels,
            resolver: Arc::new(resolver),
            options: PoolOptions {
                concurrency: 2,
                query_timeout: Duration::from_millis(200),
            },
        })
        .run()
        .await
        .finalize();

    output::persist(&out, &names).unwrap();
    let written = fs::read_to_string(&out).unwrap();
    fs::remove_file(&words).unwrap();
    fs::remove_file(&out).unwrap();

    let parsed: Vec<String> = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, ["api.example.com", "mail.example.com"]);
    assert!(written.contains("\n  \"api.example.com\""));
}

#[tokio::test]
async fn missing_wordlist_halts_before_any_work() {
    let mut cfg = Config::new(example());
    cfg.enable_bruteforce = true;
    cfg.wordlist = PathBuf::from("/nonexistent/subscout/wordlist.txt");
    cfg.output = Some(scratch_file("never-written.json"));

    let err = subscout_core::enumerate(
        &cfg,
        Arc::new(Silent),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Wordlist { .. })
    ));
    assert!(!scratch_file("never-written.json").exists());
}

#[tokio::test]
async fn invalid_probe_settings_halt_before_any_work() {
    let mut cfg = Config::new(example());
    cfg.enable_bruteforce = true;
    cfg.concurrency = 0;

    let err = subscout_core::enumerate(
        &cfg,
        Arc::new(Silent),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ZeroConcurrency)
    ));
}

#[tokio::test]
async fn missing_output_directory_halts_before_any_work() {
    let mut cfg = Config::new(example());
    cfg.output = Some(PathBuf::from("/nonexistent/subscout/out.json"));

    let err = subscout_core::enumerate(
        &cfg,
        Arc::new(Silent),
        Arc::new(AtomicBool::new(false)),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::OutputDir { .. })
    ));
}

#[tokio::test]
async fn failed_save_leaves_results_in_hand() {
    let names = Aggregator::new(example())
        .with_source(CannedSource::boxed("crt.sh", &["api.example.com", "www.example.com"]))
        .run()
        .await
        .finalize();

    let mut cfg = Config::new(example());
    cfg.output = Some(PathBuf::from("/nonexistent/subscout/out.json"));

    let err = subscout_core::save(&cfg, &names).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/subscout/out.json"));
    assert_eq!(strings(names), ["api.example.com", "www.example.com"]);
}

#[test]
fn empty_result_is_still_saved() {
    let out = scratch_file("empty.json");
    let mut cfg = Config::new(example());

    assert_eq!(subscout_core::save(&cfg, &[]).unwrap(), None);

    cfg.output = Some(out.clone());
    assert_eq!(subscout_core::save(&cfg, &[]).unwrap(), Some(out.as_path()));

    let written = fs::read_to_string(&out).unwrap();
    fs::remove_file(&out).unwrap();
    assert_eq!(written, "[]");
}
