//! # homeguard-app
//!
//! Application layer — the concurrent decision core and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** at the boundaries:
//!   - `Notifier` — best-effort outbound notification sink (driven)
//!   - `AlarmSink` — where device alarms go (gate, debouncer, test doubles)
//!   - `AlarmControl` — arm / disarm surface consumed by the HTTP adapter
//!   - `DeviceUpdater` — entry point the MQTT handlers call into
//!   - `Clock` — wall-clock time used for staleness checks
//! - Provide the core components:
//!   - `AlarmGate` — global armed flag; forwards alarms only when armed
//!   - `Debouncer` — per-device cooldown between forwarded alarms
//!   - `Device` — one actor per sensor, serialising its state updates
//!   - `DeviceRegistry` — owns every `Device`, routes updates by id
//!
//! ## Dependency rule
//! Depends on `homeguard-domain` only (plus `tokio` for tasks, channels and
//! timers). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod alarm_gate;
pub mod debouncer;
pub mod device;
pub mod notifier;
pub mod ports;
pub mod registry;
