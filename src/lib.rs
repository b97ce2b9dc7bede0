// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tool.
//
// Module responsibilities:
// - `config`: connection settings and the retry policy, loaded once from
//   the environment at startup.
// - `model`: serde types for the Grafana dashboard wire format.
// - `api`: the blocking HTTP client for dashboard CRUD, title search,
//   bulk delete and the settings read.
// - `ui`: the interactive menu that drives the client.
pub mod api;
pub mod config;
pub mod model;
pub mod ui;
