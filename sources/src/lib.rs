//! Passive collaborators. Each one implements
//! [`PassiveSource`](subscout_common::source::PassiveSource) and returns raw,
//! unvalidated candidates.

use std::time::Duration;

pub mod crtsh;
pub mod search;

pub use crtsh::CrtSh;
pub use search::SearchScraper;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
