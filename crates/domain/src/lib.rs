//! # pixelhub-domain
//!
//! Pure domain model for the pixelhub sensor rule engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Readings** and **`SensorValues`** (latest observation per MQTT topic)
//! - Define **Rules** (sensor binding + AND-ed conditions + ordered actions)
//! - Define **Conditions** (per-kind predicates over the bound sensor value)
//! - Define **Actions** (display, notification, effect, publish, accessory update)
//! - Define **Intents** (data-only outbound payloads realised by collaborators)
//! - Define **Rule Templates** (parameterized skeletons for quick rule creation)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod intent;
pub mod rule;
pub mod sensor;
pub mod template;
