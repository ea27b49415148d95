use halcyon_io::{
    Sensor, SensorEventQueue, SensorKind, SensorManager, SensorManagerFactory, SensorSample,
    SensorSubscription, acquire_sensor_manager, event_period,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

// ============================================================================
// Test Doubles
// ============================================================================

#[derive(Debug, Default)]
struct Calls {
    enabled: u32,
    disabled: u32,
    rates: Vec<Duration>,
    queue_ident: Option<i32>,
    pending: VecDeque<SensorSample>,
}

struct FakeQueue(Rc<RefCell<Calls>>);

impl SensorEventQueue for FakeQueue {
    fn enable_sensor(&mut self, _sensor: &Sensor) {
        self.0.borrow_mut().enabled += 1;
    }

    fn set_event_rate(&mut self, _sensor: &Sensor, period: Duration) {
        self.0.borrow_mut().rates.push(period);
    }

    fn disable_sensor(&mut self, _sensor: &Sensor) {
        self.0.borrow_mut().disabled += 1;
    }

    fn next_event(&mut self) -> Option<SensorSample> {
        self.0.borrow_mut().pending.pop_front()
    }
}

struct FakeManager {
    calls: Rc<RefCell<Calls>>,
    has_accelerometer: bool,
    label: &'static str,
}

impl SensorManager for FakeManager {
    fn default_sensor(&self, kind: SensorKind) -> Option<Sensor> {
        (self.has_accelerometer && kind == SensorKind::Accelerometer).then(|| Sensor {
            id: 7,
            kind,
            name: format!("{} accelerometer", self.label),
        })
    }

    fn create_event_queue(&mut self, ident: i32) -> Box<dyn SensorEventQueue> {
        self.calls.borrow_mut().queue_ident = Some(ident);
        Box::new(FakeQueue(self.calls.clone()))
    }
}

struct FakeFactory {
    calls: Rc<RefCell<Calls>>,
    package_scoped: bool,
    legacy: bool,
    has_accelerometer: bool,
}

impl FakeFactory {
    fn new(has_accelerometer: bool) -> Self {
        Self {
            calls: Rc::new(RefCell::new(Calls::default())),
            package_scoped: true,
            legacy: true,
            has_accelerometer,
        }
    }

    fn manager(&self, label: &'static str) -> Box<dyn SensorManager> {
        Box::new(FakeManager {
            calls: self.calls.clone(),
            has_accelerometer: self.has_accelerometer,
            label,
        })
    }
}

impl SensorManagerFactory for FakeFactory {
    fn instance_for_package(&self, _package: &str) -> Option<Box<dyn SensorManager>> {
        self.package_scoped.then(|| self.manager("scoped"))
    }

    fn instance(&self) -> Option<Box<dyn SensorManager>> {
        self.legacy.then(|| self.manager("legacy"))
    }
}

fn sample(t: i64) -> SensorSample {
    SensorSample {
        timestamp: t,
        x: 0.1,
        y: 9.8,
        z: -0.2,
    }
}

// ============================================================================
// Factory Tests
// ============================================================================

#[test]
fn test_factory_prefers_package_scoped_instance() {
    let factory = FakeFactory::new(true);
    let manager = acquire_sensor_manager(&factory, Some("com.halcyon.demo")).unwrap();
    let sensor = manager.default_sensor(SensorKind::Accelerometer).unwrap();
    assert_eq!(sensor.name, "scoped accelerometer");
}

#[test]
fn test_factory_falls_back_to_legacy_instance() {
    let mut factory = FakeFactory::new(true);
    factory.package_scoped = false;
    let manager = acquire_sensor_manager(&factory, Some("com.halcyon.demo")).unwrap();
    let sensor = manager.default_sensor(SensorKind::Accelerometer).unwrap();
    assert_eq!(sensor.name, "legacy accelerometer");
}

#[test]
fn test_factory_without_package_uses_legacy_instance() {
    let factory = FakeFactory::new(true);
    let manager = acquire_sensor_manager(&factory, None).unwrap();
    let sensor = manager.default_sensor(SensorKind::Accelerometer).unwrap();
    assert_eq!(sensor.name, "legacy accelerometer");
}

#[test]
fn test_factory_with_nothing_available() {
    let mut factory = FakeFactory::new(true);
    factory.package_scoped = false;
    factory.legacy = false;
    assert!(acquire_sensor_manager(&factory, Some("pkg")).is_none());
}

// ============================================================================
// Event Period Tests
// ============================================================================

#[test]
fn test_event_period_sixty_hz() {
    assert_eq!(event_period(60), Duration::from_micros(16_000));
}

#[test]
fn test_event_period_zero_rate_is_clamped() {
    assert_eq!(event_period(0), Duration::from_secs(1));
}

// ============================================================================
// SensorSubscription Tests
// ============================================================================

#[test]
fn test_initialize_registers_queue_on_channel() {
    let factory = FakeFactory::new(true);
    let sub = SensorSubscription::initialize(&factory, None, 3, 60);
    assert!(sub.has_sensor());
    assert!(!sub.is_enabled());
    assert_eq!(factory.calls.borrow().queue_ident, Some(3));
}

#[test]
fn test_enable_requests_sixty_hz() {
    let factory = FakeFactory::new(true);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    sub.set_enabled(true);

    let calls = factory.calls.borrow();
    assert_eq!(calls.enabled, 1);
    assert_eq!(calls.rates, vec![Duration::from_micros(16_000)]);
    assert!(sub.is_enabled());
}

#[test]
fn test_disable_stops_delivery() {
    let factory = FakeFactory::new(true);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    sub.set_enabled(true);
    sub.set_enabled(false);

    assert_eq!(factory.calls.borrow().disabled, 1);
    assert!(!sub.is_enabled());
}

#[test]
fn test_missing_sensor_makes_everything_a_noop() {
    let factory = FakeFactory::new(false);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    factory.calls.borrow_mut().pending.push_back(sample(1));

    sub.set_enabled(true);
    assert!(!sub.has_sensor());
    assert!(!sub.is_enabled());
    assert_eq!(sub.drain_pending().count(), 0);

    let calls = factory.calls.borrow();
    assert_eq!(calls.enabled, 0);
    assert!(calls.rates.is_empty());
}

#[test]
fn test_disconnected_subscription_is_inert() {
    let mut sub = SensorSubscription::disconnected();
    sub.set_enabled(true);
    assert!(!sub.has_sensor());
    assert!(!sub.is_enabled());
    assert!(sub.drain_pending().next().is_none());
}

#[test]
fn test_drain_yields_buffered_samples_in_order() {
    let factory = FakeFactory::new(true);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    sub.set_enabled(true);
    {
        let mut calls = factory.calls.borrow_mut();
        calls.pending.push_back(sample(10));
        calls.pending.push_back(sample(20));
    }

    let drained: Vec<i64> = sub.drain_pending().map(|s| s.timestamp).collect();
    assert_eq!(drained, vec![10, 20]);
    assert!(sub.drain_pending().next().is_none());
}

#[test]
fn test_drain_is_lazy() {
    let factory = FakeFactory::new(true);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    {
        let mut calls = factory.calls.borrow_mut();
        calls.pending.extend([sample(1), sample(2), sample(3)]);
    }

    let first = sub.drain_pending().next();
    assert_eq!(first.map(|s| s.timestamp), Some(1));
    assert_eq!(factory.calls.borrow().pending.len(), 2);
}

#[test]
fn test_drain_restarts_on_next_call() {
    let factory = FakeFactory::new(true);
    let mut sub = SensorSubscription::initialize(&factory, None, 3, 60);
    factory.calls.borrow_mut().pending.push_back(sample(1));
    assert_eq!(sub.drain_pending().count(), 1);

    factory.calls.borrow_mut().pending.push_back(sample(2));
    assert_eq!(sub.drain_pending().count(), 1);
}

#[test]
fn test_subscription_debug() {
    let sub = SensorSubscription::disconnected();
    let debug = format!("{:?}", sub);
    assert!(debug.contains("SensorSubscription"));
}
