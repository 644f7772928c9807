//! Observability setup for Cove: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
