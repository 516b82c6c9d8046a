//! # pixelhub-app
//!
//! Application layer — the sensor rule engine and **port definitions**.
//!
//! ## Responsibilities
//! - Own the in-memory state: [`SensorStore`](sensor_store::SensorStore)
//!   (latest value per topic) and [`RuleStore`](rule_store::RuleStore)
//!   (rule CRUD with priority-ordered listing)
//! - Evaluate and dispatch rules: [`RuleEngine`](engine::RuleEngine)
//! - Drive periodic evaluation: [`Scheduler`](scheduler::Scheduler)
//! - Define the **`IntentSink`** port that collaborators implement, and
//!   provide the in-process broadcast bus that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `pixelhub-domain` plus ambient crates (`tokio`, `serde`,
//! `tracing`). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod engine;
pub mod intent_bus;
pub mod ports;
pub mod rule_store;
pub mod scheduler;
pub mod sensor_store;
