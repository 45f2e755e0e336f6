//! Sensing-node pipeline: sensor → classifier → stability gate → notifier.

use std::time::Duration;

use embedded_hal::delay::DelayNs;
use spectrum::app::{AppEvent, SenderService, SenderTick};
use spectrum::color::{Label, Sample};
use spectrum::config::SenderConfig;
use spectrum::error::{DeliveryFailure, SensorError};
use spectrum::net::{NotifierConfig, ReliableNotifier};
use spectrum::stability::Event;

use crate::mock_hw::{RecordingSink, ScriptedSensor, ScriptedSocket, SimClock, receiver_addr};

const RED: Sample = Sample::rgb(200, 20, 20);
const SAMPLE_DELAY: Duration = Duration::from_millis(1000);

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn service(socket: ScriptedSocket) -> SenderService<ScriptedSocket> {
    let config = SenderConfig::default();
    let notifier = ReliableNotifier::new(socket, receiver_addr(), config.notifier());
    SenderService::new(&config, notifier)
}

/// Tick once, then let the sample delay pass.
fn tick(
    svc: &mut SenderService<ScriptedSocket>,
    sensor: &mut ScriptedSensor,
    clock: &SimClock,
    sink: &mut RecordingSink,
) -> SenderTick {
    let t = svc.tick(sensor, clock, sink);
    clock.advance(SAMPLE_DELAY);
    t
}

#[test]
fn three_stable_red_samples_send_one_event() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::acking(clock.clone()));
    let mut sensor = ScriptedSensor::repeat(RED, 3);
    let mut sink = RecordingSink::new();

    assert!(matches!(
        tick(&mut svc, &mut sensor, &clock, &mut sink),
        SenderTick::Held { streak: 0, .. }
    ));
    assert!(matches!(
        tick(&mut svc, &mut sensor, &clock, &mut sink),
        SenderTick::Held { streak: 1, .. }
    ));
    match tick(&mut svc, &mut sensor, &clock, &mut sink) {
        SenderTick::Delivered { event, attempt } => {
            assert_eq!(event.label, Label::Red);
            assert!((event.confidence - 0.95).abs() < 1e-6);
            assert_eq!(event.timestamp, Duration::from_millis(2000));
            assert_eq!(attempt, 1);
        }
        other => panic!("expected delivery, got {other:?}"),
    }

    let socket = svc.notifier_mut().socket_mut();
    assert_eq!(socket.sent.len(), 1);
    assert_eq!(socket.sent[0], (b"Red:0.95".to_vec(), receiver_addr()));
    assert_eq!(svc.stats().delivered, 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Classified { .. })), 3);
}

#[test]
fn cooldown_skips_sensor_reads_until_it_expires() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::acking(clock.clone()));
    let mut sensor = ScriptedSensor::repeat(RED, 6);
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        tick(&mut svc, &mut sensor, &clock, &mut sink);
    }
    // Emitted at t=2s; cooling until t=4s.
    assert_eq!(tick(&mut svc, &mut sensor, &clock, &mut sink), SenderTick::CoolingDown);
    assert_eq!(sensor.reads, 3);

    // t=4s: the streak restarts from scratch.
    assert!(matches!(
        tick(&mut svc, &mut sensor, &clock, &mut sink),
        SenderTick::Held { streak: 1, .. }
    ));
    assert_eq!(sensor.reads, 4);
}

#[test]
fn sensor_fault_skips_the_sample_without_breaking_the_streak() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::acking(clock.clone()));
    let mut sensor = ScriptedSensor::new();
    sensor.push(RED).push_fault(SensorError::NotReady).push_n(RED, 2);
    let mut sink = RecordingSink::new();

    tick(&mut svc, &mut sensor, &clock, &mut sink);
    assert_eq!(
        tick(&mut svc, &mut sensor, &clock, &mut sink),
        SenderTick::SensorFault(SensorError::NotReady)
    );
    tick(&mut svc, &mut sensor, &clock, &mut sink);
    assert!(matches!(
        tick(&mut svc, &mut sensor, &clock, &mut sink),
        SenderTick::Delivered { .. }
    ));
    assert_eq!(svc.stats().sensor_faults, 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 1);
}

#[test]
fn undelivered_event_is_reported_and_loop_continues() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::new(clock.clone()));
    let mut sensor = ScriptedSensor::repeat(RED, 3);
    let mut sink = RecordingSink::new();

    tick(&mut svc, &mut sensor, &clock, &mut sink);
    tick(&mut svc, &mut sensor, &clock, &mut sink);
    let t = svc.tick(&mut sensor, &clock, &mut sink);
    assert!(matches!(
        t,
        SenderTick::Undelivered {
            failure: DeliveryFailure::AckTimeout,
            ..
        }
    ));
    assert_eq!(svc.notifier_mut().socket_mut().sent.len(), 3);
    assert_eq!(svc.stats().undelivered, 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::DeliveryFailed { .. })), 1);

    // 2 s of samples plus 1.5 s of ack waits; cooldown runs until 5.5 s.
    assert_eq!(clock.now_ms(), 3500);
    assert_eq!(svc.tick(&mut sensor, &clock, &mut sink), SenderTick::CoolingDown);
    clock.advance_ms(1999);
    assert_eq!(svc.tick(&mut sensor, &clock, &mut sink), SenderTick::CoolingDown);
    assert_eq!(sensor.reads, 3);
}

#[test]
fn slow_delivery_does_not_shorten_the_cooldown() {
    let clock = SimClock::new();
    let mut config = SenderConfig::default();
    config.network.ack_timeout_ms = 1000;
    let notifier = ReliableNotifier::new(ScriptedSocket::new(clock.clone()), receiver_addr(), config.notifier());
    let mut svc = SenderService::new(&config, notifier);
    let mut sensor = ScriptedSensor::repeat(RED, 4);
    let mut sink = RecordingSink::new();

    tick(&mut svc, &mut sensor, &clock, &mut sink);
    tick(&mut svc, &mut sensor, &clock, &mut sink);
    assert!(matches!(
        svc.tick(&mut sensor, &clock, &mut sink),
        SenderTick::Undelivered { .. }
    ));
    // Emitted at 2 s, three 1 s ack waits.
    assert_eq!(clock.now_ms(), 5000);

    assert_eq!(svc.tick(&mut sensor, &clock, &mut sink), SenderTick::CoolingDown);
    clock.advance_ms(1000);
    assert_eq!(svc.tick(&mut sensor, &clock, &mut sink), SenderTick::CoolingDown);
    assert_eq!(sensor.reads, 3);

    clock.advance_ms(1000);
    assert!(matches!(
        svc.tick(&mut sensor, &clock, &mut sink),
        SenderTick::Held { streak: 1, .. }
    ));
}

#[test]
fn unanswered_blue_gives_up_after_three_half_second_waits() {
    let clock = SimClock::new();
    let mut notifier = ReliableNotifier::new(
        ScriptedSocket::new(clock.clone()),
        receiver_addr(),
        NotifierConfig::default(),
    );
    let event = Event {
        label: Label::Blue,
        confidence: 0.80,
        timestamp: Duration::ZERO,
    };

    assert!(!notifier.send(&event));
    assert_eq!(clock.now_ms(), 1500);
    let payloads = notifier.socket_mut().sent_payloads();
    assert_eq!(payloads, vec![&b"Blue:0.80"[..]; 3]);
}

#[test]
fn calibration_changes_what_the_classifier_sees() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::acking(clock.clone()));
    let mut sink = RecordingSink::new();

    // Uncalibrated, a green-weak sensor reads white paper as magenta.
    let mut sensor = ScriptedSensor::repeat(Sample::rgb(100, 50, 100), 1);
    svc.tick(&mut sensor, &clock, &mut sink);

    let mut reference = ScriptedSensor::repeat(Sample::rgb(100, 50, 100), 10);
    let report = svc.calibrate(&mut reference, &mut NoDelay, &mut sink);
    assert_eq!(report.accepted, 10);
    assert_eq!(svc.profile().factors(), [1.0, 2.0, 1.0]);

    let mut sensor = ScriptedSensor::repeat(Sample::rgb(100, 50, 100), 1);
    svc.tick(&mut sensor, &clock, &mut sink);

    let labels: Vec<Label> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Classified { result, .. } => Some(result.label),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec![Label::Magenta, Label::Unknown]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Calibrated(_))), 1);
}

#[test]
fn unknown_labels_are_never_sent() {
    let clock = SimClock::new();
    let mut svc = service(ScriptedSocket::acking(clock.clone()));
    let mut sensor = ScriptedSensor::repeat(Sample::rgb(100, 100, 100), 10);
    let mut sink = RecordingSink::new();

    for _ in 0..10 {
        assert!(matches!(
            tick(&mut svc, &mut sensor, &clock, &mut sink),
            SenderTick::Held { .. }
        ));
    }
    assert!(svc.notifier_mut().socket_mut().sent.is_empty());
}
