//! Seam between the aggregator and the passive collaborators.
//!
//! A passive source never queries the target's DNS. It hands back whatever
//! names it found, unvalidated: wildcards, trailing dots, mixed case and
//! unrelated hosts are all expected and are filtered by the aggregator.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::name::Domain;

#[async_trait]
pub trait PassiveSource: Send + Sync {
    /// Short label used in logs, e.g. `crt.sh`.
    fn name(&self) -> &'static str;

    /// Collects raw candidate names for `domain`.
    async fn fetch(&self, domain: &Domain) -> Result<HashSet<String>, SourceError>;
}
