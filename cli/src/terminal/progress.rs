use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use subscout_core::progress::ProgressReporter;

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];
const SPINNER_TEMPLATE: &str = "{spinner:.blue} {msg}";
const BAR_TEMPLATE: &str =
    "{spinner:.blue} [{elapsed_precise}] {bar:36.green/black} {pos}/{len} ({percent}%) {msg}";

pub(crate) static PROGRESS: OnceLock<ProgressBar> = OnceLock::new();

/// The single bar shared by the whole run. Hidden until a source starts.
pub fn get_progress() -> &'static ProgressBar {
    PROGRESS.get_or_init(ProgressBar::hidden)
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Renders source and probe progress on stderr.
pub struct TerminalProgress {
    enabled: bool,
}

impl TerminalProgress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn bar(&self) -> Option<&'static ProgressBar> {
        self.enabled.then(get_progress)
    }
}

impl ProgressReporter for TerminalProgress {
    fn source_started(&self, source: &str) {
        let Some(pb) = self.bar() else { return };
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.set_style(style(SPINNER_TEMPLATE));
        pb.enable_steady_tick(TICK_INTERVAL);
        pb.set_message(format!("Querying {} ...", source.bold()));
    }

    fn source_finished(&self, _source: &str, _added: usize) {
        if let Some(pb) = self.bar() {
            pb.set_message("");
        }
    }

    fn probe_started(&self, total: usize) {
        let Some(pb) = self.bar() else { return };
        pb.set_style(style(BAR_TEMPLATE));
        pb.set_length(total as u64);
        pb.set_position(0);
        pb.set_message("Bruteforcing");
    }

    fn probe_advanced(&self, processed: usize) {
        if let Some(pb) = self.bar() {
            pb.set_position(processed as u64);
        }
    }

    fn probe_finished(&self) {
        if let Some(pb) = self.bar() {
            pb.set_message("");
        }
    }
}

/// Clears the bar for good once the run is over.
pub fn finish() {
    get_progress().finish_and_clear();
}

/// Log sink that keeps lines from tearing through the bar.
pub struct ProgressWriter;

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_progress().suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
