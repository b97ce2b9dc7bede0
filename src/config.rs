// Configuration module: everything the client needs to reach a Grafana
// workspace is collected here once at startup and passed by reference
// into the rest of the program. There are no fallback credentials: a
// missing variable aborts with a clear message.

use anyhow::{Context, Result};
use std::time::Duration;

/// Connection settings for one Grafana workspace. Built from the
/// environment (see `Config::from_env`) and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace address as given; the client normalizes it into an
    /// https base URL.
    pub workspace: String,
    /// Service account token, sent as a bearer credential on every request.
    pub api_key: String,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub retry: RetryPolicy,
}

/// Fixed-delay retry: on failure, wait `delay` and try again until
/// `max_retries` extra attempts are spent. No backoff; every error class
/// is treated the same.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Run `op`, retrying failures until the budget is spent. The last
    /// error propagates unchanged.
    pub fn run<T, E: std::fmt::Display>(
        &self,
        mut op: impl FnMut() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut left = self.max_retries;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if left > 0 => {
                    left -= 1;
                    tracing::warn!("request failed ({err}), retrying in {:?}", self.delay);
                    std::thread::sleep(self.delay);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Config {
    /// Read the workspace address and API key from `GRAFANA_WORKSPACE`
    /// and `GRAFANA_API_KEY`. Both are required. `GRAFANA_RETRY`
    /// optionally grants a per-request retry budget (default 0).
    pub fn from_env() -> Result<Self> {
        let workspace = require_var("GRAFANA_WORKSPACE")?;
        let api_key = require_var("GRAFANA_API_KEY")?;
        let retry = match std::env::var("GRAFANA_RETRY") {
            Ok(raw) => RetryPolicy::new(raw.parse().context("GRAFANA_RETRY must be an integer")?),
            Err(_) => RetryPolicy::default(),
        };
        Ok(Self {
            workspace,
            api_key,
            timeout: Duration::from_secs(5),
            max_redirects: 5,
            retry,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_never_retries() {
        let policy = RetryPolicy::default();
        let mut calls = 0;
        let result: Result<(), &str> = policy.run(|| {
            calls += 1;
            Err("boom")
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn retry_budget_is_spent_then_error_propagates() {
        let policy = RetryPolicy {
            max_retries: 2,
            delay: Duration::ZERO,
        };
        let mut calls = 0;
        let result: Result<(), &str> = policy.run(|| {
            calls += 1;
            Err("boom")
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
    }

    #[test]
    fn transient_failure_recovers_within_budget() {
        let policy = RetryPolicy {
            max_retries: 2,
            delay: Duration::ZERO,
        };
        let mut calls = 0;
        let result: Result<u32, &str> = policy.run(|| {
            calls += 1;
            if calls < 3 {
                Err("transient")
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result, Ok(3));
    }
}
