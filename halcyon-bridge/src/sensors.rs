//! Simulated accelerometer.
//!
//! The host thread pushes samples into a shared [`SensorFeed`] and then
//! signals the sensor channel; the engine drains them through the queue.
//! Samples that arrive while the sensor is disabled are dropped, as a real
//! sensor would never have produced them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use halcyon_io::{
    Sensor, SensorEventQueue, SensorKind, SensorManager, SensorManagerFactory, SensorSample,
};

/// Samples waiting for the engine to drain them.
#[derive(Debug, Clone, Default)]
pub struct SensorFeed(Arc<Mutex<VecDeque<SensorSample>>>);

impl SensorFeed {
    pub fn push(&self, sample: SensorSample) {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(sample);
    }

    pub fn pop(&self) -> Option<SensorSample> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).pop_front()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sensor-manager factory for the bridge.
#[derive(Debug, Clone)]
pub struct SimulatedSensors {
    feed: SensorFeed,
    has_accelerometer: bool,
}

impl SimulatedSensors {
    pub fn new(feed: SensorFeed) -> Self {
        Self {
            feed,
            has_accelerometer: true,
        }
    }

    /// A device without an accelerometer.
    pub fn without_accelerometer(feed: SensorFeed) -> Self {
        Self {
            feed,
            has_accelerometer: false,
        }
    }
}

impl SensorManagerFactory for SimulatedSensors {
    fn instance_for_package(&self, package: &str) -> Option<Box<dyn SensorManager>> {
        tracing::debug!("Simulated sensor manager for {}", package);
        Some(Box::new(SimulatedManager {
            feed: self.feed.clone(),
            has_accelerometer: self.has_accelerometer,
        }))
    }

    fn instance(&self) -> Option<Box<dyn SensorManager>> {
        Some(Box::new(SimulatedManager {
            feed: self.feed.clone(),
            has_accelerometer: self.has_accelerometer,
        }))
    }
}

struct SimulatedManager {
    feed: SensorFeed,
    has_accelerometer: bool,
}

impl SensorManager for SimulatedManager {
    fn default_sensor(&self, kind: SensorKind) -> Option<Sensor> {
        match kind {
            SensorKind::Accelerometer if self.has_accelerometer => Some(Sensor {
                id: 1,
                kind,
                name: "Simulated Accelerometer".to_string(),
            }),
            SensorKind::Accelerometer => None,
        }
    }

    fn create_event_queue(&mut self, ident: i32) -> Box<dyn SensorEventQueue> {
        tracing::debug!("Sensor queue registered on channel {}", ident);
        Box::new(SimulatedQueue {
            feed: self.feed.clone(),
            enabled: false,
            period: Duration::ZERO,
        })
    }
}

struct SimulatedQueue {
    feed: SensorFeed,
    enabled: bool,
    period: Duration,
}

impl SensorEventQueue for SimulatedQueue {
    fn enable_sensor(&mut self, _sensor: &Sensor) {
        self.enabled = true;
    }

    fn set_event_rate(&mut self, sensor: &Sensor, period: Duration) {
        self.period = period;
        tracing::debug!("{} rate set to {:?}", sensor.name, self.period);
    }

    fn disable_sensor(&mut self, _sensor: &Sensor) {
        self.enabled = false;
    }

    fn next_event(&mut self) -> Option<SensorSample> {
        while let Some(sample) = self.feed.pop() {
            if self.enabled {
                return Some(sample);
            }
        }
        None
    }
}
