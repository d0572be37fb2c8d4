//! # homeguard-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the alarm gate's arm / disarm surface as JSON
//!   (`GET /alarm`, `POST /alarm`, also reachable under `/api`)
//! - Serve a liveness check at `/health`
//!
//! ## Dependency rule
//! Depends on `homeguard-app` for the [`AlarmControl`] port only. Never sees
//! the gate's flag directly and never leaks axum types inward.
//!
//! [`AlarmControl`]: homeguard_app::ports::AlarmControl

pub mod api;
pub mod error;
pub mod router;
pub mod state;
