//! Shared helpers for `princess-scheduler` tests.

pub mod builders;

use std::path::{Path, PathBuf};
use std::sync::Once;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route `tracing` output into the test harness.
///
/// Output is captured per test and only shown for failures (or with
/// `--nocapture`). The filter is read from `PRINCESS_LOG`, same as the
/// binary, and defaults to `warn` so passing runs stay quiet:
/// `PRINCESS_LOG=princess_scheduler=trace cargo test -- --nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("PRINCESS_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// Parse a `YYYY-MM-DD` literal; panics on typos in test code.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date literal must be YYYY-MM-DD")
}

/// Write `contents` to `Princess.toml` inside `dir` and return its path.
pub fn write_catalog(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("Princess.toml");
    std::fs::write(&path, contents).expect("failed to write test catalog");
    path
}
