use std::fs;
use std::path::Path;

use subscout_common::error::ConfigError;

/// Reads a wordlist: one label per line, blank lines and `#` comments ignored.
pub fn load(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Wordlist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse(&contents))
}

pub fn parse(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
