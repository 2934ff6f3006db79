//! Shared model for subscout: validated names, the result set, run
//! configuration, the error taxonomy and the passive source seam.

pub mod config;
pub mod error;
pub mod name;
pub mod results;
pub mod source;

pub use name::{Domain, Subdomain, normalize};
pub use results::ResultSet;
