//! Per-device actor — one task per sensor serialising every state update.
//!
//! Producers hand updates over a depth-one channel and wait until the device
//! accepts them, their deadline passes, or the device is shut down. The
//! device task owns the [`DeviceState`] outright, so no lock guards it.

use std::sync::{Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use homeguard_domain::device::{DeviceState, StateUpdate};
use homeguard_domain::error::UpdateError;
use homeguard_domain::id::DeviceId;

use crate::ports::{AlarmSink, Clock, SystemClock};

/// Handle to a device actor.
///
/// The processing task is not running until [`listen`](Self::listen) is
/// called; updates sent before that wait (up to their deadline) for it.
pub struct Device<S, C = SystemClock> {
    id: DeviceId,
    updates: mpsc::Sender<StateUpdate>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<DeviceWorker<S, C>>>,
}

impl<S: AlarmSink + 'static> Device<S> {
    /// Create a device whose alarms go to `sink`.
    pub fn new(id: DeviceId, sink: S) -> Self {
        Self::with_clock(id, sink, SystemClock)
    }
}

impl<S: AlarmSink + 'static, C: Clock + 'static> Device<S, C> {
    /// Create a device that reads the time from `clock`.
    pub fn with_clock(id: DeviceId, sink: S, clock: C) -> Self {
        let (updates, inbox) = mpsc::channel(1);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = DeviceWorker {
            id: id.clone(),
            sink,
            clock,
            state: DeviceState::default(),
            inbox,
            shutdown: shutdown_rx,
        };
        Self {
            id,
            updates,
            shutdown,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Spawn the processing task.
    ///
    /// Returns `None` when the task was already started or the device was
    /// closed first.
    pub fn listen(&self) -> Option<JoinHandle<()>> {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        Some(tokio::spawn(worker.run()))
    }

    /// Request `available` to be applied, waiting at most until `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::DeadlineElapsed`] when the device did not accept
    /// the update in time and [`UpdateError::Closed`] after shutdown.
    pub async fn set_availability(
        &self,
        deadline: Instant,
        available: bool,
    ) -> Result<(), UpdateError> {
        self.send(deadline, StateUpdate::Availability(available))
            .await
    }

    /// Request `opened` to be applied, waiting at most until `deadline`.
    ///
    /// # Errors
    ///
    /// Same as [`set_availability`](Self::set_availability).
    pub async fn set_opened(&self, deadline: Instant, opened: bool) -> Result<(), UpdateError> {
        self.send(deadline, StateUpdate::Opened(opened)).await
    }

    /// Stop the processing task. Later updates are rejected; idempotent.
    pub fn close(&self) {
        self.shutdown.send_replace(true);
        // Dropping an unstarted worker closes the inbox so pending senders wake up.
        drop(
            self.worker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
    }

    async fn send(&self, deadline: Instant, update: StateUpdate) -> Result<(), UpdateError> {
        if *self.shutdown.borrow() {
            return Err(UpdateError::Closed(self.id.clone()));
        }
        tokio::select! {
            sent = self.updates.send(update) => {
                sent.map_err(|_| UpdateError::Closed(self.id.clone()))
            }
            () = tokio::time::sleep_until(deadline) => {
                Err(UpdateError::DeadlineElapsed(self.id.clone()))
            }
        }
    }
}

/// The task side of a [`Device`]: sole owner of the state record.
struct DeviceWorker<S, C> {
    id: DeviceId,
    sink: S,
    clock: C,
    state: DeviceState,
    inbox: mpsc::Receiver<StateUpdate>,
    shutdown: watch::Receiver<bool>,
}

impl<S: AlarmSink, C: Clock> DeviceWorker<S, C> {
    async fn run(mut self) {
        tracing::debug!(device = %self.id, "device loop started");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.changed() => break,
                update = self.inbox.recv() => match update {
                    Some(update) => self.process(update),
                    None => break,
                },
            }
        }
        tracing::debug!(device = %self.id, "device loop stopped");
    }

    fn process(&mut self, update: StateUpdate) {
        tracing::info!(
            device = %self.id,
            operation = update.operation(),
            ?update,
            "device state update received"
        );
        if let Some(reason) = self.state.apply(update, self.clock.now()) {
            self.sink.alarm(&self.id, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use homeguard_domain::alarm::AlarmReason;
    use homeguard_domain::time::{self, Timestamp};

    /// Clock that only moves when told to.
    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<Timestamp>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(time::now())))
        }

        fn advance_hours(&self, count: i64) {
            let mut now = self.0.lock().unwrap();
            *now = *now + time::hours(count);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            *self.0.lock().unwrap()
        }
    }

    /// Sink that forwards alarms to a channel the test can await.
    struct ChannelSink(mpsc::UnboundedSender<(DeviceId, AlarmReason)>);

    impl AlarmSink for ChannelSink {
        fn alarm(&self, device: &DeviceId, reason: AlarmReason) {
            let _ = self.0.send((device.clone(), reason));
        }
    }

    fn device() -> (
        Device<ChannelSink>,
        mpsc::UnboundedReceiver<(DeviceId, AlarmReason)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = DeviceId::new("frontdoor").unwrap();
        (Device::new(id, ChannelSink(tx)), rx)
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[tokio::test]
    async fn should_alarm_opened_after_open_update() {
        let (device, mut alarms) = device();
        device.listen().unwrap();

        device.set_opened(deadline(), true).await.unwrap();

        let (id, reason) = alarms.recv().await.unwrap();
        assert_eq!(id.as_str(), "frontdoor");
        assert_eq!(reason, AlarmReason::Opened);
    }

    #[tokio::test]
    async fn should_alarm_unavailable_after_offline_update() {
        let (device, mut alarms) = device();
        device.listen().unwrap();

        device.set_availability(deadline(), false).await.unwrap();

        let (_, reason) = alarms.recv().await.unwrap();
        assert_eq!(reason, AlarmReason::Unavailable);
    }

    #[tokio::test]
    async fn should_alarm_stale_when_device_resurfaces_after_long_silence() {
        let (tx, mut alarms) = mpsc::unbounded_channel();
        let clock = ManualClock::new();
        let device = Device::with_clock(
            DeviceId::new("frontdoor").unwrap(),
            ChannelSink(tx),
            clock.clone(),
        );
        device.listen().unwrap();

        device.set_availability(deadline(), false).await.unwrap();
        assert_eq!(alarms.recv().await.unwrap().1, AlarmReason::Unavailable);

        clock.advance_hours(27);
        device.set_availability(deadline(), true).await.unwrap();

        assert_eq!(alarms.recv().await.unwrap().1, AlarmReason::Stale);
    }

    #[tokio::test]
    async fn should_not_alarm_stale_within_threshold() {
        let (tx, mut alarms) = mpsc::unbounded_channel();
        let clock = ManualClock::new();
        let device = Device::with_clock(
            DeviceId::new("frontdoor").unwrap(),
            ChannelSink(tx),
            clock.clone(),
        );
        device.listen().unwrap();

        device.set_availability(deadline(), false).await.unwrap();
        assert_eq!(alarms.recv().await.unwrap().1, AlarmReason::Unavailable);

        clock.advance_hours(25);
        device.set_availability(deadline(), true).await.unwrap();
        device.set_opened(deadline(), true).await.unwrap();

        // Updates are processed in order, so a stale alarm would come first.
        assert_eq!(alarms.recv().await.unwrap().1, AlarmReason::Opened);
    }

    #[tokio::test]
    async fn should_apply_updates_in_acceptance_order() {
        let (device, mut alarms) = device();
        device.listen().unwrap();

        device.set_availability(deadline(), false).await.unwrap();
        device.set_opened(deadline(), true).await.unwrap();
        device.set_opened(deadline(), false).await.unwrap();
        device.set_availability(deadline(), true).await.unwrap();
        device.set_opened(deadline(), true).await.unwrap();

        let mut received = Vec::new();
        while received.len() < 4 {
            let (_, reason) = alarms.recv().await.unwrap();
            received.push(reason);
        }
        assert_eq!(
            received,
            vec![
                AlarmReason::Unavailable,
                AlarmReason::Opened,
                AlarmReason::Unavailable,
                AlarmReason::Opened,
            ]
        );
    }

    #[tokio::test]
    async fn should_not_alarm_for_closed_available_device() {
        let (device, mut alarms) = device();
        let handle = device.listen().unwrap();

        device.set_opened(deadline(), false).await.unwrap();
        device.set_availability(deadline(), true).await.unwrap();
        device.close();
        handle.await.unwrap();

        assert!(alarms.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn should_give_up_when_deadline_elapses() {
        let (device, _alarms) = device();
        // Not listening: the first update fills the slot, the second must wait.
        device.set_opened(deadline(), true).await.unwrap();

        let result = device
            .set_opened(Instant::now() + Duration::from_millis(100), false)
            .await;

        assert!(matches!(result, Err(UpdateError::DeadlineElapsed(_))));
    }

    #[tokio::test]
    async fn should_reject_updates_after_close() {
        let (device, mut alarms) = device();
        let handle = device.listen().unwrap();

        device.close();
        handle.await.unwrap();
        let result = device.set_opened(deadline(), true).await;

        assert!(matches!(result, Err(UpdateError::Closed(_))));
        assert!(alarms.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_wake_waiting_sender_when_closed() {
        let (device, _alarms) = device();
        let device = std::sync::Arc::new(device);
        device.set_opened(deadline(), true).await.unwrap();

        let waiting = {
            let device = std::sync::Arc::clone(&device);
            tokio::spawn(async move { device.set_opened(deadline(), false).await })
        };
        tokio::task::yield_now().await;
        device.close();

        let result = waiting.await.unwrap();
        assert!(matches!(result, Err(UpdateError::Closed(_))));
    }

    #[tokio::test]
    async fn should_be_idempotent_on_close() {
        let (device, _alarms) = device();
        device.close();
        device.close();
        assert!(device.listen().is_none());
    }

    #[tokio::test]
    async fn should_start_processing_only_once() {
        let (device, _alarms) = device();
        assert!(device.listen().is_some());
        assert!(device.listen().is_none());
        device.close();
    }
}
