use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::name::Domain;

pub const DEFAULT_WORDLIST: &str = "subdomains-top1million-5000.txt";
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const DEFAULT_SEARCH_PAGES: usize = 5;
pub const DNS_PORT: u16 = 53;

/// Public resolvers used when none are given.
pub const DEFAULT_RESOLVERS: [SocketAddr; 2] = [
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), DNS_PORT),
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), DNS_PORT),
];

pub struct Config {
    /// Root target of the run.
    pub domain: Domain,
    /// Scrape search result pages in addition to certificate logs.
    pub enable_search: bool,
    /// Probe wordlist-generated names against [`Config::resolvers`].
    pub enable_bruteforce: bool,
    /// One label per line. Only read when brute force is enabled.
    pub wordlist: PathBuf,
    /// Where to persist the final list as JSON, if anywhere.
    pub output: Option<PathBuf>,
    /// Upper bound on in-flight resolutions.
    pub concurrency: usize,
    /// Bound on a single resolution. Timed out queries are not retried.
    pub query_timeout: Duration,
    pub resolvers: Vec<SocketAddr>,
    /// Stop scraping once this many hosts were collected.
    pub search_limit: usize,
    /// Hard cap on scraped result pages.
    pub search_pages: usize,
    pub no_banner: bool,
    /// 0 prints everything, 1 hides banner and headers, 2 prints only names.
    pub quiet: u8,
}

impl Config {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            enable_search: false,
            enable_bruteforce: false,
            wordlist: PathBuf::from(DEFAULT_WORDLIST),
            output: None,
            concurrency: DEFAULT_CONCURRENCY,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            resolvers: DEFAULT_RESOLVERS.to_vec(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            search_pages: DEFAULT_SEARCH_PAGES,
            no_banner: false,
            quiet: 0,
        }
    }

    /// Checks the settings that would otherwise fail halfway through a run.
    ///
    /// Wordlist readability is checked when the wordlist is loaded, which
    /// also happens before any network activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(output) = &self.output {
            let dir = output_dir(output);
            if !dir.is_dir() {
                return Err(ConfigError::OutputDir {
                    path: dir.to_path_buf(),
                });
            }
        }
        if !self.enable_bruteforce {
            return Ok(());
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.query_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.resolvers.is_empty() {
            return Err(ConfigError::NoResolvers);
        }
        Ok(())
    }
}

/// Directory the output file lands in. A bare file name means the working directory.
fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Parses a resolver given as `ip` or `ip:port`. Port defaults to 53.
pub fn parse_resolver(s: &str) -> Result<SocketAddr, ConfigError> {
    let s = s.trim();
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }

    s.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| ConfigError::InvalidResolver(s.to_string()))
}
