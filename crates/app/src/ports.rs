//! Port definitions — traits that adapters implement or consume.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the core and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod alarm;
pub mod clock;
pub mod device_updater;
pub mod notifier;

pub use alarm::{AlarmControl, AlarmSink};
pub use clock::{Clock, SystemClock};
pub use device_updater::DeviceUpdater;
pub use notifier::Notifier;
