//! Search engine scraping.
//!
//! Issues `site:` dork queries and pulls hostnames out of the result links.
//! Pagination ends when enough hosts were collected, when a page carries no
//! "Next" marker, or when the page cap is reached, whichever comes first.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use subscout_common::{Domain, error::SourceError, source::PassiveSource};

const SOURCE_NAME: &str = "search";
const SEARCH_URL: &str = "https://www.google.com/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RESULTS_PER_PAGE: usize = 100;
const NEXT_PAGE_MARKER: &str = "Next";

pub struct SearchScraper {
    client: reqwest::Client,
    base_url: String,
    result_limit: usize,
    max_pages: usize,
}

impl SearchScraper {
    pub fn new(result_limit: usize, max_pages: usize) -> reqwest::Result<Self> {
        Ok(Self {
            client: crate::http_client(REQUEST_TIMEOUT)?,
            base_url: SEARCH_URL.to_string(),
            result_limit,
            max_pages,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(&self, query: &str, start: usize) -> Result<String, SourceError> {
        let start = start.to_string();
        let num = RESULTS_PER_PAGE.to_string();

        self.client
            .get(&self.base_url)
            .query(&[("q", query), ("start", start.as_str()), ("num", num.as_str())])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SourceError::unavailable(SOURCE_NAME, e))?
            .text()
            .await
            .map_err(|e| SourceError::unavailable(SOURCE_NAME, e))
    }
}

#[async_trait]
impl PassiveSource for SearchScraper {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, domain: &Domain) -> Result<HashSet<String>, SourceError> {
        let query = dork_query(domain);
        let mut hosts: HashSet<String> = HashSet::new();

        for page in 0..self.max_pages {
            if hosts.len() >= self.result_limit {
                break;
            }

            let body = match self.fetch_page(&query, page * RESULTS_PER_PAGE).await {
                Ok(body) => body,
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    warn!("{e}; keeping {} hosts from earlier pages", hosts.len());
                    break;
                }
            };

            let found = extract_hosts(&body, domain);
            debug!("search page {page}: {} matching hosts", found.len());
            hosts.extend(found);

            if !has_next_page(&body) {
                break;
            }
        }

        Ok(hosts)
    }
}

fn dork_query(domain: &Domain) -> String {
    format!("site:*.{domain} -site:www.{domain}")
}

/// Extracts hosts mentioning `domain` from the links of a result page.
///
/// Handles direct `http(s)://` links and `/url?q=` redirect links. The match
/// is a loose substring test; strict validation happens downstream.
pub fn extract_hosts(html: &str, domain: &Domain) -> HashSet<String> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return HashSet::new();
    };

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(link_target)
        .filter_map(|target| target.host_str().map(str::to_ascii_lowercase))
        .filter(|host| host.contains(domain.as_str()))
        .collect()
}

fn link_target(href: &str) -> Option<Url> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Url::parse(href).ok();
    }

    if href.starts_with("/url?") {
        let wrapped = Url::parse("https://redirect.invalid").ok()?.join(href).ok()?;
        let (_, target) = wrapped.query_pairs().find(|(key, _)| key == "q")?;
        return Url::parse(&target).ok();
    }

    None
}

fn has_next_page(html: &str) -> bool {
    html.contains(NEXT_PAGE_MARKER)
}
