//! # homeguard-domain
//!
//! Pure domain model for the homeguard door-sensor alarm.
//!
//! ## Responsibilities
//! - Foundational types: typed device identifiers, error conventions, timestamps
//! - Define the per-device **state record** (availability, open/closed, last seen)
//! - Define the **alarm policy**: which state raises which alarm, in which order
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod alarm;
pub mod device;
