// API client module: a small blocking HTTP client that talks to a Grafana
// workspace. One request is in flight at a time; every operation
// round-trips to the service, which stays the sole source of truth for
// dashboard state.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, RetryPolicy};
use crate::model::{
    CreateDashboardRequest, CreateDashboardResponse, Dashboard, DashboardEnvelope, Datasource,
    DeleteOutcome, DeleteStatus, GridPos, Panel, SearchHit, Target,
};

/// Generated UIDs are this many hex characters of a sha256 digest.
const UID_LEN: usize = 12;

const CPU_RATE_EXPR: &str = r#"rate(node_cpu_seconds_total{mode="system"}[5m])"#;

/// Failures surfaced by client operations. `Network` means no response
/// arrived; `Request` carries the service's non-2xx status and body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Request { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for one Grafana workspace. Holds the normalized base URL, a
/// blocking HTTP client carrying the bearer and JSON headers, and the
/// retry policy from the config.
#[derive(Clone)]
pub struct GrafanaClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl GrafanaClient {
    /// Build a client for the workspace in `config`. Performs no I/O;
    /// only an API key that is not a valid header value is rejected here.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = normalize_address(&config.workspace);

        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", config.api_key);
        let mut auth =
            HeaderValue::from_str(&bearer).context("API key is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            retry: config.retry,
        })
    }

    /// Create (or overwrite) a dashboard. The UID is the caller's when
    /// given, otherwise freshly generated; the service echoes the final
    /// UID back in the acknowledgement.
    pub fn create_dashboard(
        &self,
        title: &str,
        panels: Vec<Panel>,
        folder_id: Option<i64>,
        uid: Option<&str>,
    ) -> Result<CreateDashboardResponse, ApiError> {
        let uid = match uid {
            Some(uid) => uid.to_string(),
            None => generate_uid(title),
        };
        let request = CreateDashboardRequest {
            dashboard: Dashboard::new(title, uid, panels),
            message: format!(
                "Dashboard created at {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ),
            overwrite: true,
            folder_id,
        };
        tracing::debug!(title, "POST /api/dashboards/db");
        self.execute(|| self.http.post(self.url("/api/dashboards/db")).json(&request))
    }

    /// Fetch a dashboard and its service metadata. An unknown UID
    /// surfaces as the service's 404.
    pub fn get_dashboard_by_uid(&self, uid: &str) -> Result<DashboardEnvelope, ApiError> {
        tracing::debug!(uid, "GET /api/dashboards/uid");
        self.execute(|| self.http.get(self.url(&format!("/api/dashboards/uid/{uid}"))))
    }

    /// Delete by UID. Deleting an absent UID surfaces the service's
    /// not-found error; it is not swallowed here.
    pub fn delete_dashboard(&self, uid: &str) -> Result<serde_json::Value, ApiError> {
        tracing::debug!(uid, "DELETE /api/dashboards/uid");
        self.execute(|| self.http.delete(self.url(&format!("/api/dashboards/uid/{uid}"))))
    }

    /// Title-pattern search, scoped to dashboards.
    pub fn search_dashboards(&self, pattern: &str) -> Result<Vec<SearchHit>, ApiError> {
        tracing::debug!(pattern, "GET /api/search");
        self.execute(|| {
            self.http
                .get(self.url("/api/search"))
                .query(&[("query", pattern), ("type", "dash-db")])
        })
    }

    /// Delete every dashboard whose title matches `pattern`, one at a
    /// time in search order. Each target gets its own outcome record; a
    /// failed delete is recorded and the batch moves on. No rollback.
    pub fn delete_dashboards_by_title_pattern(
        &self,
        pattern: &str,
    ) -> Result<Vec<DeleteOutcome>, ApiError> {
        let hits = self.search_dashboards(pattern)?;
        Ok(delete_each(hits, |uid| self.delete_dashboard(uid)))
    }

    /// Create a dashboard with two preset panels. Without a title, one
    /// is synthesized from the current time.
    pub fn create_sample_dashboard(
        &self,
        title: Option<&str>,
    ) -> Result<CreateDashboardResponse, ApiError> {
        let title = match title {
            Some(title) => title.to_string(),
            None => format!("TestDashboard {}", Local::now().format("%Y%m%d-%H%M%S")),
        };
        self.create_dashboard(&title, sample_panels(), None, None)
    }

    /// Replace `dashboard`'s panel list with a single fresh timeseries
    /// panel whose id does not collide with any of the old ones. The UID
    /// and title are kept; the old panels are discarded, not merged.
    pub fn update_sample_dashboard(
        &self,
        uid: &str,
        dashboard: &Dashboard,
    ) -> Result<CreateDashboardResponse, ApiError> {
        let mut ids: Vec<i64> = dashboard.panels.iter().map(|panel| panel.id).collect();
        ids.sort_unstable();
        let new_id = missing_number(&ids, 1);
        tracing::debug!(?ids, new_id, "replacing panel list");
        self.create_dashboard(
            &dashboard.title,
            vec![replacement_panel(new_id)],
            None,
            Some(uid),
        )
    }

    /// Read the service's admin settings verbatim.
    pub fn get_settings(&self) -> Result<serde_json::Value, ApiError> {
        tracing::debug!("GET /api/admin/settings");
        self.execute(|| self.http.get(self.url("/api/admin/settings")))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the built request, mapping transport failures, non-2xx
    /// statuses and undecodable bodies into `ApiError`. The retry policy
    /// re-runs the whole attempt after its fixed delay.
    fn execute<T: DeserializeOwned>(
        &self,
        build: impl Fn() -> reqwest::blocking::RequestBuilder,
    ) -> Result<T, ApiError> {
        self.retry.run(|| {
            let response = build().send().map_err(ApiError::Network)?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(ApiError::Request { status, body });
            }
            response.json::<T>().map_err(ApiError::Decode)
        })
    }
}

/// Strip a leading scheme and trailing slash from `address`, then pin
/// https.
fn normalize_address(address: &str) -> String {
    let host = address
        .strip_prefix("https://")
        .or_else(|| address.strip_prefix("http://"))
        .unwrap_or(address);
    let host = host.strip_suffix('/').unwrap_or(host);
    format!("https://{host}")
}

/// Derive a service-unique dashboard UID: sha256 over the title, the
/// current instant and a random UUID, truncated to `UID_LEN` hex chars.
fn generate_uid(title: &str) -> String {
    let seed = format!("{}-{}-{}", title, Utc::now().to_rfc3339(), Uuid::new_v4());
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..UID_LEN].to_string()
}

/// Lowest id not yet taken: scan upward from `base` through the sorted
/// `numbers`, stopping at the first gap.
fn missing_number(numbers: &[i64], base: i64) -> i64 {
    let mut num = base;
    for &number in numbers {
        if number != num {
            break;
        }
        num += 1;
    }
    num
}

/// Run `delete_fn` against every hit, collecting one outcome per
/// dashboard. Failures are recorded in the outcome, never propagated, so
/// one bad delete cannot stop the rest of the batch.
fn delete_each<F>(hits: Vec<SearchHit>, mut delete_fn: F) -> Vec<DeleteOutcome>
where
    F: FnMut(&str) -> Result<serde_json::Value, ApiError>,
{
    hits.into_iter()
        .map(|hit| match delete_fn(&hit.uid) {
            Ok(_) => {
                tracing::info!(title = %hit.title, uid = %hit.uid, "deleted dashboard");
                DeleteOutcome {
                    title: hit.title,
                    uid: hit.uid,
                    status: DeleteStatus::Deleted,
                    detail: None,
                }
            }
            Err(err) => {
                tracing::warn!(title = %hit.title, uid = %hit.uid, "failed to delete dashboard: {err}");
                DeleteOutcome {
                    title: hit.title,
                    uid: hit.uid,
                    status: DeleteStatus::Error,
                    detail: Some(err.to_string()),
                }
            }
        })
        .collect()
}

fn sample_panels() -> Vec<Panel> {
    vec![
        Panel {
            id: 1,
            grid_pos: GridPos { h: 8, w: 12, x: 0, y: 0 },
            title: "Sample Metric".to_string(),
            panel_type: "stat".to_string(),
            targets: vec![Target {
                ref_id: "A".to_string(),
                datasource: Datasource::prometheus(),
                expr: "up{}".to_string(),
            }],
        },
        Panel {
            id: 2,
            grid_pos: GridPos { h: 8, w: 12, x: 12, y: 0 },
            title: "Sample Graph".to_string(),
            panel_type: "timeseries".to_string(),
            targets: vec![Target {
                ref_id: "A".to_string(),
                datasource: Datasource::prometheus(),
                expr: CPU_RATE_EXPR.to_string(),
            }],
        },
    ]
}

fn replacement_panel(id: i64) -> Panel {
    Panel {
        id,
        grid_pos: GridPos { h: 8, w: 12, x: 0, y: 0 },
        title: format!("Sample Metric{id}"),
        panel_type: "timeseries".to_string(),
        targets: vec![Target {
            ref_id: format!("A{id}"),
            datasource: Datasource::prometheus(),
            expr: CPU_RATE_EXPR.to_string(),
        }],
    }
}
