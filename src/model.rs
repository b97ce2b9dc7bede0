// Wire types for the Grafana dashboard API. The service speaks camelCase
// JSON, so the mixed-case fields carry explicit renames. Responses may
// include fields this tool never touches; deserialization tolerates them
// through defaults.

use serde::{Deserialize, Serialize};

/// Dashboard schema revision understood by the service.
pub const SCHEMA_VERSION: i64 = 36;

/// A dashboard as stored by the service: a titled, versioned collection
/// of panels under a unique key. No copy is kept locally between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: Option<i64>,
    pub uid: Option<String>,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(rename = "schemaVersion", default)]
    pub schema_version: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub time: TimeRange,
    #[serde(default = "default_refresh")]
    pub refresh: String,
}

impl Dashboard {
    /// Fresh dashboard shell around `panels`, tagged as generated and
    /// carrying the constants the create endpoint expects.
    pub fn new(title: impl Into<String>, uid: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            id: None,
            uid: Some(uid.into()),
            title: title.into(),
            tags: vec!["generated".to_string()],
            timezone: default_timezone(),
            schema_version: SCHEMA_VERSION,
            version: 0,
            panels,
            editable: true,
            time: TimeRange::default(),
            refresh: default_refresh(),
        }
    }
}

/// Default time window shown when the dashboard opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            from: "now-6h".to_string(),
            to: "now".to_string(),
        }
    }
}

/// One visualization unit. The `id` must be unique within its dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Panel {
    pub id: i64,
    #[serde(rename = "gridPos", default)]
    pub grid_pos: GridPos,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub panel_type: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub h: i64,
    pub w: i64,
    pub x: i64,
    pub y: i64,
}

/// A query issued by a panel against a data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "refId")]
    pub ref_id: String,
    pub datasource: Datasource,
    pub expr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(rename = "type")]
    pub ds_type: String,
    pub uid: String,
}

impl Datasource {
    pub fn prometheus() -> Self {
        Self {
            ds_type: "prometheus".to_string(),
            uid: "prometheus".to_string(),
        }
    }
}

/// Body of `POST /api/dashboards/db`. `folderId` stays off the wire when
/// no folder is targeted.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDashboardRequest {
    pub dashboard: Dashboard,
    pub message: String,
    pub overwrite: bool,
    #[serde(rename = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
}

/// Acknowledgement returned by the create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDashboardResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub slug: String,
}

/// Body of `GET /api/dashboards/uid/{uid}`: the dashboard plus service
/// metadata this tool only passes through.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    pub dashboard: Dashboard,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// One row from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub uid: String,
    pub title: String,
}

/// Per-dashboard record of a bulk delete. One failure does not abort the
/// batch, so a result list may mix statuses.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub title: String,
    pub uid: String,
    pub status: DeleteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStatus {
    Deleted,
    Error,
}

fn default_timezone() -> String {
    "browser".to_string()
}

fn default_refresh() -> String {
    "5s".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_panel() -> Panel {
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
        }
    }

    #[test]
    fn create_request_carries_the_service_constants() {
        let request = CreateDashboardRequest {
            dashboard: Dashboard::new("Test", "abc123def456", vec![stat_panel()]),
            message: "Dashboard created at 2026-08-06 12:00:00".to_string(),
            overwrite: true,
            folder_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dashboard"]["schemaVersion"], 36);
        assert_eq!(json["dashboard"]["version"], 0);
        assert_eq!(json["dashboard"]["uid"], "abc123def456");
        assert_eq!(json["dashboard"]["tags"], serde_json::json!(["generated"]));
        assert_eq!(json["dashboard"]["timezone"], "browser");
        assert_eq!(json["dashboard"]["time"]["from"], "now-6h");
        assert_eq!(json["dashboard"]["time"]["to"], "now");
        assert_eq!(json["dashboard"]["refresh"], "5s");
        assert_eq!(json["dashboard"]["editable"], true);
        assert_eq!(json["overwrite"], true);
        assert!(json.get("folderId").is_none());
    }

    #[test]
    fn folder_id_shows_up_on_the_wire_when_set() {
        let request = CreateDashboardRequest {
            dashboard: Dashboard::new("Test", "abc123def456", Vec::new()),
            message: String::new(),
            overwrite: true,
            folder_id: Some(7),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["folderId"], 7);
    }

    #[test]
    fn panel_uses_the_camel_case_wire_names() {
        let json = serde_json::to_value(stat_panel()).unwrap();
        assert_eq!(json["gridPos"]["w"], 12);
        assert_eq!(json["type"], "stat");
        assert_eq!(json["targets"][0]["refId"], "A");
        assert_eq!(json["targets"][0]["datasource"]["type"], "prometheus");
    }

    #[test]
    fn get_envelope_deserializes_a_service_response() {
        let body = serde_json::json!({
            "dashboard": {
                "id": 42,
                "uid": "abc123def456",
                "title": "Test",
                "tags": ["generated"],
                "timezone": "browser",
                "schemaVersion": 36,
                "version": 3,
                "editable": true,
                "time": {"from": "now-6h", "to": "now"},
                "refresh": "5s",
                "panels": [
                    {
                        "id": 1,
                        "gridPos": {"h": 8, "w": 12, "x": 0, "y": 0},
                        "title": "Sample Metric",
                        "type": "stat",
                        "targets": [
                            {
                                "refId": "A",
                                "datasource": {"type": "prometheus", "uid": "prometheus"},
                                "expr": "up{}"
                            }
                        ]
                    }
                ]
            },
            "meta": {"slug": "test", "url": "/d/abc123def456/test"}
        });
        let envelope: DashboardEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.dashboard.title, "Test");
        assert_eq!(envelope.dashboard.uid.as_deref(), Some("abc123def456"));
        assert_eq!(envelope.dashboard.version, 3);
        assert_eq!(envelope.dashboard.panels.len(), 1);
        assert_eq!(envelope.dashboard.panels[0].targets[0].expr, "up{}");
    }

    #[test]
    fn sparse_dashboard_fills_in_defaults() {
        let body = serde_json::json!({
            "dashboard": {"uid": "abc", "title": "Bare", "panels": [], "id": null}
        });
        let envelope: DashboardEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.dashboard.timezone, "browser");
        assert_eq!(envelope.dashboard.refresh, "5s");
        assert!(envelope.dashboard.editable);
        assert_eq!(envelope.dashboard.time.from, "now-6h");
    }

    #[test]
    fn delete_outcome_status_serializes_lowercase() {
        let outcome = DeleteOutcome {
            title: "Test".to_string(),
            uid: "abc".to_string(),
            status: DeleteStatus::Error,
            detail: Some("HTTP 403".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["detail"], "HTTP 403");
    }
}
