use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use subscout_common::error::SourceError;
use subscout_common::source::PassiveSource;
use subscout_common::{Domain, Subdomain};
use subscout_core::resolver::{NameResolver, ResolutionOutcome};

/// Passive source returning a fixed list of raw candidates.
pub struct CannedSource {
    pub name: &'static str,
    pub names: Vec<&'static str>,
}

impl CannedSource {
    pub fn boxed(name: &'static str, names: &[&'static str]) -> Box<dyn PassiveSource> {
        Box::new(Self {
            name,
            names: names.to_vec(),
        })
    }
}

#[async_trait]
impl PassiveSource for CannedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _domain: &Domain) -> Result<HashSet<String>, SourceError> {
        Ok(self.names.iter().map(|n| n.to_string()).collect())
    }
}

/// Passive source whose body never parses.
pub struct GarbledSource;

#[async_trait]
impl PassiveSource for GarbledSource {
    fn name(&self) -> &'static str {
        "garbled"
    }

    async fn fetch(&self, _domain: &Domain) -> Result<HashSet<String>, SourceError> {
        Err(SourceError::parse("garbled", "expected value at line 1 column 1"))
    }
}

pub enum Zone {
    A,
    NxDomain,
    Slow,
    Refused,
}

/// Resolver answering from an in-memory zone. Unknown names are NXDOMAIN.
pub struct ZoneResolver {
    zone: HashMap<&'static str, Zone>,
}

impl ZoneResolver {
    pub fn new(records: Vec<(&'static str, Zone)>) -> Self {
        Self {
            zone: records.into_iter().collect(),
        }
    }
}

#[async_trait]
impl NameResolver for ZoneResolver {
    async fn resolve(&self, name: &Subdomain) -> ResolutionOutcome {
        match self.zone.get(name.as_str()) {
            Some(Zone::A) => ResolutionOutcome::Resolved(name.clone()),
            Some(Zone::Slow) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                ResolutionOutcome::Resolved(name.clone())
            }
            Some(Zone::Refused) => ResolutionOutcome::Errored("REFUSED".to_string()),
            Some(Zone::NxDomain) | None => ResolutionOutcome::NotFound,
        }
    }
}
