pub mod enumerate;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use subscout_common::config::{self, Config};
use subscout_common::Domain;

#[derive(Parser)]
#[command(name = "subscout")]
#[command(version, about = "Passive + optional active subdomain enumeration.")]
pub struct CommandLine {
    /// Target domain (e.g. example.com)
    pub domain: Domain,

    /// Enable DNS brute-force
    #[arg(short, long)]
    pub bruteforce: bool,

    /// Wordlist for brute-force, one label per line
    #[arg(short, long, default_value = config::DEFAULT_WORDLIST)]
    pub wordlist: PathBuf,

    /// Save results to a JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable search engine scraping (slow, may be blocked)
    #[arg(short = 'g', long = "google")]
    pub search: bool,

    /// Maximum number of DNS queries in flight
    #[arg(short, long, default_value_t = config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-query timeout in milliseconds
    #[arg(short, long = "timeout-ms", default_value_t = config::DEFAULT_QUERY_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Resolver to query, as ip or ip:port (repeatable)
    #[arg(short, long = "resolver", value_parser = parse_resolver)]
    pub resolvers: Vec<SocketAddr>,

    /// Stop scraping after this many hosts
    #[arg(long, default_value_t = config::DEFAULT_SEARCH_LIMIT)]
    pub search_limit: usize,

    /// Maximum number of search result pages
    #[arg(long, default_value_t = config::DEFAULT_SEARCH_PAGES)]
    pub search_pages: usize,

    /// Less output: -q hides the banner and headers, -qq prints only names
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        let mut cfg = Config::new(self.domain);
        cfg.enable_search = self.search;
        cfg.enable_bruteforce = self.bruteforce;
        cfg.wordlist = self.wordlist;
        cfg.output = self.output;
        cfg.concurrency = self.concurrency;
        cfg.query_timeout = Duration::from_millis(self.timeout_ms);
        if !self.resolvers.is_empty() {
            cfg.resolvers = self.resolvers;
        }
        cfg.search_limit = self.search_limit;
        cfg.search_pages = self.search_pages;
        cfg.quiet = self.quiet;
        cfg.no_banner = self.no_banner;
        cfg
    }
}

fn parse_resolver(s: &str) -> Result<SocketAddr, String> {
    config::parse_resolver(s).map_err(|e| e.to_string())
}
