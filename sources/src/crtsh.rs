//! Certificate transparency lookups through crt.sh.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use subscout_common::{Domain, error::SourceError, source::PassiveSource};

const SOURCE_NAME: &str = "crt.sh";
const CRTSH_URL: &str = "https://crt.sh/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    /// One or more names, newline separated.
    name_value: String,
    #[serde(default)]
    common_name: Option<String>,
}

pub struct CrtSh {
    client: reqwest::Client,
    base_url: String,
}

impl CrtSh {
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self {
            client: crate::http_client(REQUEST_TIMEOUT)?,
            base_url: CRTSH_URL.to_string(),
        })
    }

    /// Points the fetcher at another crt.sh compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_url(&self, domain: &Domain) -> String {
        format!("{}?q=%25.{}&output=json", self.base_url, domain)
    }
}

#[async_trait]
impl PassiveSource for CrtSh {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn fetch(&self, domain: &Domain) -> Result<HashSet<String>, SourceError> {
        let url = self.query_url(domain);
        debug!("querying {url}");

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SourceError::unavailable(SOURCE_NAME, e))?
            .text()
            .await
            .map_err(|e| SourceError::unavailable(SOURCE_NAME, e))?;

        parse_entries(&body).map_err(|e| SourceError::parse(SOURCE_NAME, e))
    }
}

/// Flattens a crt.sh JSON body into the set of logged names.
pub fn parse_entries(body: &str) -> serde_json::Result<HashSet<String>> {
    let entries: Vec<CrtShEntry> = serde_json::from_str(body)?;

    let names = entries
        .into_iter()
        .flat_map(|entry| {
            let logged: Vec<String> = entry
                .name_value
                .lines()
                .chain(entry.common_name.as_deref())
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            logged
        })
        .collect();

    Ok(names)
}
