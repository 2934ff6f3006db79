use std::collections::BTreeSet;

use crate::name::{self, Domain, Subdomain};

/// Deduplicated collection of [`Subdomain`]s for one [`Domain`], built by
/// union across sources.
#[derive(Debug, Clone)]
pub struct ResultSet {
    domain: Domain,
    names: BTreeSet<Subdomain>,
}

/// Outcome of folding one batch of raw candidates into a [`ResultSet`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Candidates that normalized and were not yet present.
    pub added: usize,
    /// Candidates that normalized but were already present.
    pub duplicates: usize,
    /// Candidates dropped by normalization.
    pub rejected: usize,
}

impl ResultSet {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            names: BTreeSet::new(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Normalizes each raw candidate and unions the survivors in.
    pub fn merge_candidates<I, S>(&mut self, candidates: I) -> MergeSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = MergeSummary::default();

        for raw in candidates {
            match name::normalize(raw.as_ref(), &self.domain) {
                Some(sub) if self.names.insert(sub.clone()) => summary.added += 1,
                Some(_) => summary.duplicates += 1,
                None => {
                    tracing::trace!(candidate = raw.as_ref(), "rejected by normalization");
                    summary.rejected += 1;
                }
            }
        }

        summary
    }

    /// Unions already validated names. Names belonging to another domain are
    /// dropped, so the containment invariant holds whatever the caller passes.
    pub fn extend<I>(&mut self, subdomains: I) -> usize
    where
        I: IntoIterator<Item = Subdomain>,
    {
        let before = self.names.len();
        let domain = &self.domain;
        self.names.extend(
            subdomains
                .into_iter()
                .filter(|sub| domain.contains(sub.as_str())),
        );
        self.names.len() - before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lexicographically sorted, duplicate-free sequence.
    pub fn finalize(self) -> Vec<Subdomain> {
        self.names.into_iter().collect()
    }
}

/// Renders names as a JSON array of strings with 2-space indentation, in the
/// order given.
pub fn to_json(names: &[Subdomain]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Domain {
        "example.com".parse().unwrap()
    }

    #[test]
    fn merge_counts_each_candidate_once() {
        let mut set = ResultSet::new(example());
        let summary = set.merge_candidates([
            "a.example.com",
            "A.example.com",
            "a.example.com.",
            "evil.com",
            "b.example.com",
        ]);

        assert_eq!(
            summary,
            MergeSummary {
                added: 2,
                duplicates: 2,
                rejected: 1
            }
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn finalize_is_sorted() {
        let mut set = ResultSet::new(example());
        set.merge_candidates(["www.example.com", "api.example.com", "example.com", "mx.example.com"]);

        let names: Vec<String> = set.finalize().into_iter().map(Subdomain::into_string).collect();
        assert_eq!(
            names,
            ["api.example.com", "example.com", "mx.example.com", "www.example.com"]
        );
    }

    #[test]
    fn extend_drops_foreign_subdomains() {
        let other: Domain = "other.org".parse().unwrap();
        let foreign = name::normalize("www.other.org", &other).unwrap();
        let local = name::normalize("www.example.com", &example()).unwrap();

        let mut set = ResultSet::new(example());
        assert_eq!(set.extend([foreign, local]), 1);
        assert!(set.contains("www.example.com"));
        assert!(!set.contains("www.other.org"));
    }

    #[test]
    fn json_uses_two_space_indent_and_given_order() {
        let mut set = ResultSet::new(example());
        set.merge_candidates(["b.example.com", "a.example.com"]);
        let names = set.finalize();

        let json = to_json(&names).unwrap();
        assert_eq!(json, "[\n  \"a.example.com\",\n  \"b.example.com\"\n]");
    }

    #[test]
    fn empty_set_serializes_to_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }
}
