//! Tracing setup: structured JSON logs plus optional OTLP span export.
//!
//! # Telemetry invariants
//!
//! - **No payload values, signatures or key material** may appear in any span
//!   attribute or log field. Failures are logged by field name and error kind.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by `RUST_LOG`.

pub mod init;

pub use init::{init_telemetry, shutdown};
