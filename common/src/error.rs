use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a passive source. Never fatal: the aggregator logs it and moves on.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure or a non-success HTTP status.
    #[error("{source_name} unavailable: {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: String,
    },

    /// The source answered, but the body could not be decoded.
    #[error("{source_name} returned an unreadable response: {reason}")]
    Parse {
        source_name: &'static str,
        reason: String,
    },
}

impl SourceError {
    pub fn unavailable(source_name: &'static str, reason: impl ToString) -> Self {
        Self::Unavailable {
            source_name,
            reason: reason.to_string(),
        }
    }

    pub fn parse(source_name: &'static str, reason: impl ToString) -> Self {
        Self::Parse {
            source_name,
            reason: reason.to_string(),
        }
    }
}

/// Unusable inputs. The only error class that halts a run, raised before any
/// network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid domain '{0}'")]
    InvalidDomain(String),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("per-query timeout must be greater than zero")]
    ZeroTimeout,

    #[error("brute force needs at least one resolver")]
    NoResolvers,

    #[error("invalid resolver address '{0}'")]
    InvalidResolver(String),

    #[error("output directory {} does not exist", path.display())]
    OutputDir { path: PathBuf },

    #[error("cannot read wordlist {}: {source}", path.display())]
    Wordlist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
