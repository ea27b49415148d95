//! # Halcyon IO
//!
//! The Sensor Bridge.
//! Owns the motion sensor subscription for the engine: the sensor-manager
//! handle, the default accelerometer (when the device has one) and the event
//! queue registered on the host looper under a reserved identifier.
//!
//! The platform lookup of a sensor manager is not done here. The host hands
//! in a [`SensorManagerFactory`] and this crate only decides which of its
//! entry points to use.

use std::time::Duration;

/// A single accelerometer reading, in m/s² on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Event time in nanoseconds, host clock.
    pub timestamp: i64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The sensor types a manager can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
}

/// A sensor advertised by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub id: u32,
    pub kind: SensorKind,
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════
// Platform Contracts
// ════════════════════════════════════════════════════════════════════

/// An event queue attached to the host looper.
pub trait SensorEventQueue {
    fn enable_sensor(&mut self, sensor: &Sensor);

    /// Requests one event every `period`.
    fn set_event_rate(&mut self, sensor: &Sensor, period: Duration);

    fn disable_sensor(&mut self, sensor: &Sensor);

    /// Pops one buffered event. `None` once the queue is empty.
    fn next_event(&mut self) -> Option<SensorSample>;
}

/// A platform sensor manager.
pub trait SensorManager {
    fn default_sensor(&self, kind: SensorKind) -> Option<Sensor>;

    /// Creates a queue that signals readiness on the host looper under `ident`.
    fn create_event_queue(&mut self, ident: i32) -> Box<dyn SensorEventQueue>;
}

/// Hands out sensor managers. This is the only platform-bridge indirection
/// the engine depends on.
pub trait SensorManagerFactory {
    /// Package-scoped lookup, only available on newer hosts.
    fn instance_for_package(&self, package: &str) -> Option<Box<dyn SensorManager>>;

    /// Legacy process-wide instance.
    fn instance(&self) -> Option<Box<dyn SensorManager>>;
}

/// Resolve a sensor manager, preferring the package-scoped instance.
pub fn acquire_sensor_manager(
    factory: &dyn SensorManagerFactory,
    package: Option<&str>,
) -> Option<Box<dyn SensorManager>> {
    if let Some(package) = package {
        if let Some(manager) = factory.instance_for_package(package) {
            tracing::debug!("Sensor manager acquired for package {}", package);
            return Some(manager);
        }
        tracing::debug!("No package-scoped sensor manager, using legacy instance");
    }
    factory.instance()
}

/// Delivery period for a requested rate.
///
/// Uses whole milliseconds per event, so 60 Hz yields 16 000 µs.
pub fn event_period(rate_hz: u32) -> Duration {
    let millis = 1000 / u64::from(rate_hz.max(1));
    Duration::from_micros(millis * 1000)
}

// ════════════════════════════════════════════════════════════════════
// Subscription
// ════════════════════════════════════════════════════════════════════

/// The accelerometer subscription owned by the engine.
///
/// Every operation degrades to a no-op when the device has no
/// accelerometer (or no sensor manager could be found at all).
pub struct SensorSubscription {
    /// Kept alive for as long as the queue it created.
    manager: Option<Box<dyn SensorManager>>,
    sensor: Option<Sensor>,
    queue: Option<Box<dyn SensorEventQueue>>,
    period: Duration,
    enabled: bool,
}

impl std::fmt::Debug for SensorSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorSubscription")
            .field("manager", &self.manager.is_some())
            .field("sensor", &self.sensor)
            .field("queue", &self.queue.is_some())
            .field("period", &self.period)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl SensorSubscription {
    /// Look up the default accelerometer and register its queue under
    /// `channel_id`. Never fails: a missing manager or sensor just leaves
    /// the subscription inert.
    pub fn initialize(
        factory: &dyn SensorManagerFactory,
        package: Option<&str>,
        channel_id: i32,
        rate_hz: u32,
    ) -> Self {
        let Some(mut manager) = acquire_sensor_manager(factory, package) else {
            tracing::warn!("No sensor manager available; motion sensing disabled");
            return Self::disconnected();
        };

        let sensor = manager.default_sensor(SensorKind::Accelerometer);
        match &sensor {
            Some(s) => tracing::info!("Accelerometer found: {} (#{})", s.name, s.id),
            None => tracing::info!("No accelerometer on this device"),
        }

        let queue = manager.create_event_queue(channel_id);

        Self {
            manager: Some(manager),
            sensor,
            queue: Some(queue),
            period: event_period(rate_hz),
            enabled: false,
        }
    }

    /// A subscription with no manager behind it.
    pub fn disconnected() -> Self {
        Self {
            manager: None,
            sensor: None,
            queue: None,
            period: event_period(60),
            enabled: false,
        }
    }

    pub fn has_sensor(&self) -> bool {
        self.sensor.is_some() && self.queue.is_some()
    }

    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Requested delivery period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start or stop delivery. Enabling also requests the configured rate.
    pub fn set_enabled(&mut self, enabled: bool) {
        let (Some(sensor), Some(queue)) = (&self.sensor, self.queue.as_mut()) else {
            return;
        };

        if enabled {
            queue.enable_sensor(sensor);
            queue.set_event_rate(sensor, self.period);
            tracing::debug!("Accelerometer enabled ({:?} period)", self.period);
        } else {
            queue.disable_sensor(sensor);
            tracing::debug!("Accelerometer disabled");
        }
        self.enabled = enabled;
    }

    /// Lazily pull buffered samples, one per `next()`.
    ///
    /// The iterator ends when the queue reports no more events; calling this
    /// again on the next loop iteration picks up whatever arrived since.
    pub fn drain_pending(&mut self) -> Drain<'_> {
        let queue = if self.sensor.is_some() {
            self.queue.as_deref_mut()
        } else {
            None
        };
        Drain { queue }
    }
}

/// Iterator returned by [`SensorSubscription::drain_pending`].
pub struct Drain<'a> {
    queue: Option<&'a mut (dyn SensorEventQueue + 'static)>,
}

impl Iterator for Drain<'_> {
    type Item = SensorSample;

    fn next(&mut self) -> Option<SensorSample> {
        let sample = self.queue.as_mut()?.next_event();
        if sample.is_none() {
            // Stay exhausted even if the queue refills mid-iteration.
            self.queue = None;
        }
        sample
    }
}
