//! # pixelhub-adapter-http-axum
//!
//! HTTP adapter — serves the JSON REST API and the intent SSE stream.
//!
//! ## Responsibilities
//! - Rule CRUD under `/api/rules`
//! - Template catalog browsing and instantiation under `/api/templates`
//! - Sensor snapshot and engine statistics
//! - Real-time intent stream via Server-Sent Events
//!
//! ## Dependency rule
//! Depends on `pixelhub-app` and `pixelhub-domain`. HTTP types never
//! leak into the engine.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
