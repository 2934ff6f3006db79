use std::fs;
use std::path::Path;

use anyhow::Context;

use subscout_common::{Subdomain, results};

/// Writes `names` to `path` as a UTF-8 JSON array, preserving their order.
pub fn persist(path: &Path, names: &[Subdomain]) -> anyhow::Result<()> {
    let json = results::to_json(names).context("serializing results")?;
    fs::write(path, json).with_context(|| format!("writing results to {}", path.display()))
}
