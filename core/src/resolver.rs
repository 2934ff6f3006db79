//! Forward lookups for the active probe.
//!
//! [`NameResolver`] is the seam the worker pool depends on; [`DnsResolver`]
//! is the production implementation backed by `hickory-resolver`. Every
//! attempt ends in a [`ResolutionOutcome`] value, failures included.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::{ResolveError, ResolveErrorKind, TokioResolver};

use subscout_common::Subdomain;

/// Result of one resolution attempt. Only `Resolved` contributes to a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(Subdomain),
    /// NXDOMAIN.
    NotFound,
    /// The name exists but has no address records.
    NoAnswer,
    TimedOut,
    Errored(String),
}

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Performs a single forward-address lookup for `name`.
    async fn resolve(&self, name: &Subdomain) -> ResolutionOutcome;
}

/// Resolver bound to an explicit list of upstream endpoints over UDP.
///
/// One attempt per query, no cache, no hosts file: a brute-force run asks
/// each name once and wants the upstream's answer.
pub struct DnsResolver {
    inner: TokioResolver,
}

impl DnsResolver {
    pub fn new(endpoints: &[SocketAddr], query_timeout: Duration) -> Self {
        let mut config = ResolverConfig::new();
        for endpoint in endpoints {
            config.add_name_server(NameServerConfig::new(*endpoint, Protocol::Udp));
        }

        let mut options = ResolverOpts::default();
        options.timeout = query_timeout;
        options.attempts = 1;
        options.cache_size = 0;

        let inner = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(options)
            .build();

        Self { inner }
    }
}

#[async_trait]
impl NameResolver for DnsResolver {
    async fn resolve(&self, name: &Subdomain) -> ResolutionOutcome {
        // Trailing dot keeps the system search list out of the query.
        let fqdn = format!("{name}.");
        match self.inner.lookup_ip(fqdn.as_str()).await {
            Ok(lookup) if lookup.iter().next().is_some() => {
                ResolutionOutcome::Resolved(name.clone())
            }
            Ok(_) => ResolutionOutcome::NoAnswer,
            Err(e) => classify(&e),
        }
    }
}

fn classify(error: &ResolveError) -> ResolutionOutcome {
    let ResolveErrorKind::Proto(proto) = error.kind() else {
        return ResolutionOutcome::Errored(error.to_string());
    };

    match proto.kind() {
        ProtoErrorKind::NoRecordsFound { response_code, .. } => no_records(*response_code),
        ProtoErrorKind::Timeout => ResolutionOutcome::TimedOut,
        _ => ResolutionOutcome::Errored(error.to_string()),
    }
}

/// NXDOMAIN arrives as a no-records error too. The response code tells the
/// two apart.
fn no_records(response_code: ResponseCode) -> ResolutionOutcome {
    match response_code {
        ResponseCode::NXDomain => ResolutionOutcome::NotFound,
        _ => ResolutionOutcome::NoAnswer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::ProtoError;

    fn proto_error(kind: ProtoErrorKind) -> ResolveError {
        ResolveError::from(ProtoError::from(kind))
    }

    #[test]
    fn nxdomain_is_not_found() {
        assert_eq!(no_records(ResponseCode::NXDomain), ResolutionOutcome::NotFound);
    }

    #[test]
    fn empty_answers_are_no_answer() {
        assert_eq!(no_records(ResponseCode::NoError), ResolutionOutcome::NoAnswer);
        assert_eq!(no_records(ResponseCode::ServFail), ResolutionOutcome::NoAnswer);
    }

    #[test]
    fn timeout_is_timed_out() {
        assert_eq!(
            classify(&proto_error(ProtoErrorKind::Timeout)),
            ResolutionOutcome::TimedOut
        );
    }

    #[test]
    fn other_failures_keep_their_message() {
        let outcome = classify(&proto_error(ProtoErrorKind::Message("connection refused")));
        assert!(
            matches!(&outcome, ResolutionOutcome::Errored(msg) if msg.contains("connection refused")),
            "unexpected outcome {outcome:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_never_resolves() {
        // TEST-NET-1 is unroutable, so the lookup fails instead of answering.
        let resolver = DnsResolver::new(
            &["192.0.2.1:53".parse().unwrap()],
            Duration::from_millis(200),
        );
        let name = subscout_common::normalize("api.example.com", &"example.com".parse().unwrap())
            .unwrap();

        let outcome = resolver.resolve(&name).await;
        assert!(
            matches!(outcome, ResolutionOutcome::TimedOut | ResolutionOutcome::Errored(_)),
            "unexpected outcome {outcome:?}"
        );
    }
}
