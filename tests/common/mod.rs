//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRICE_V1: &str = r#"
localized_timezones:
  - Pacific/Chatham
time_of_use:
  - name: electricity_price
    description: Electricity price
    timezone: Pacific/Auckland
    labels:
      provider: Power Co
    default_value: 1
    time_windows:
      - value: 10
        start: "00:00"
        end: "00:00"
"#;

pub const PRICE_V2: &str = r#"
localized_timezones:
  - Pacific/Chatham
time_of_use:
  - name: gas_price
    description: Gas price
    default_value: 2
"#;

/// Write `contents` to `name` inside `dir` and return the full path.
pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Poll `check` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}
