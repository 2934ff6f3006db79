/// Observer for the reporting side of a run. Purely informational: nothing
/// here influences which names end up in the result set.
///
/// Probe callbacks arrive from worker tasks, possibly in parallel and in any
/// order.
pub trait ProgressReporter: Send + Sync {
    fn source_started(&self, _source: &str) {}

    fn source_finished(&self, _source: &str, _added: usize) {}

    fn probe_started(&self, _total: usize) {}

    /// `processed` is the number of candidates finished so far.
    fn probe_advanced(&self, _processed: usize) {}

    fn probe_finished(&self) {}
}

/// Reporter that ignores everything.
pub struct Silent;

impl ProgressReporter for Silent {}
