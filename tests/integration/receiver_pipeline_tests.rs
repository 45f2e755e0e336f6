//! Actuating-node pipeline: datagram → ack → track map → repeat
//! suppression → DFPlayer frame.

use std::time::Duration;

use spectrum::app::{AppEvent, NET_FAULT_BACKOFF, ReceiverService, ReceiverTick};
use spectrum::audio::{Command, CommandFrame};
use spectrum::color::Label;
use spectrum::config::ReceiverConfig;
use spectrum::error::{ActuatorError, DatagramDecodeError, NetError};

use crate::mock_hw::{RecordingLink, RecordingSink, ScriptedSocket, SimClock, SimDelay, sender_addr};

fn service(clock: &SimClock, link: RecordingLink) -> ReceiverService<ScriptedSocket, RecordingLink> {
    ReceiverService::new(&ReceiverConfig::default(), ScriptedSocket::new(clock.clone()), link)
}

fn deliver(svc: &mut ReceiverService<ScriptedSocket, RecordingLink>, payload: &[u8]) {
    svc.receiver_mut().socket_mut().deliver(payload, sender_addr());
}

fn acks(svc: &mut ReceiverService<ScriptedSocket, RecordingLink>) -> usize {
    svc.receiver_mut()
        .socket_mut()
        .sent
        .iter()
        .filter(|(p, to)| p == b"ACK" && *to == sender_addr())
        .count()
}

#[test]
fn start_sets_configured_volume() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    svc.start(&mut sink).unwrap();
    assert_eq!(svc.player().link().frames(), vec![CommandFrame::set_volume(20)]);
    assert!(matches!(sink.events[..], [AppEvent::Started(_)]));
}

#[test]
fn green_twice_within_cooldown_plays_once() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Green:0.91");
    deliver(&mut svc, b"Green:0.91");

    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Played {
            label: Label::Green,
            track: 2
        }
    );
    clock.advance_ms(1000);
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Suppressed {
            label: Label::Green,
            remaining: Duration::from_millis(2000)
        }
    );

    let frames = svc.player().link().frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].command(), Some(Command::PlayTrack));
    assert_eq!(frames[0].param(), 2);
    assert_eq!(acks(&mut svc), 2, "both datagrams are acked");
    assert_eq!(svc.stats().suppressed, 1);
}

#[test]
fn same_label_plays_again_after_cooldown() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Red:0.90");
    svc.poll(&clock, &mut sink);
    clock.advance_ms(3000);
    deliver(&mut svc, b"Red:0.90");
    assert!(matches!(svc.poll(&clock, &mut sink), ReceiverTick::Played { .. }));
    assert_eq!(svc.player().link().frames().len(), 2);
}

#[test]
fn different_label_inside_cooldown_plays() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Red:0.90");
    deliver(&mut svc, b"Blue:0.90");
    svc.poll(&clock, &mut sink);
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Played {
            label: Label::Blue,
            track: 3
        }
    );
}

#[test]
fn garbage_is_acked_then_dropped_as_unmapped() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"garbage");
    assert_eq!(svc.poll(&clock, &mut sink), ReceiverTick::Unmapped);
    assert_eq!(acks(&mut svc), 1);
    assert!(svc.player().link().frames().is_empty());
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Unmapped { label, .. } if label.as_str() == "garbage"
    )));
}

#[test]
fn lowercase_label_is_unmapped() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"red:0.99");
    assert_eq!(svc.poll(&clock, &mut sink), ReceiverTick::Unmapped);
    assert_eq!(acks(&mut svc), 1);
}

#[test]
fn undecodable_datagrams_get_no_ack() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, &[0xFF, 0xFE, 0x3A]);
    deliver(&mut svc, b"");
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Dropped(DatagramDecodeError::InvalidUtf8)
    );
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Dropped(DatagramDecodeError::Empty)
    );
    assert_eq!(acks(&mut svc), 0);
    assert_eq!(svc.stats().dropped, 2);
}

#[test]
fn missing_confidence_still_plays() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Orange");
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Played {
            label: Label::Orange,
            track: 7
        }
    );
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::Played { confidence, .. } if *confidence == 0.0
    )));
}

#[test]
fn idle_poll_is_bounded_by_the_timeout() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut sink = RecordingSink::new();

    assert_eq!(svc.poll(&clock, &mut sink), ReceiverTick::Idle);
    assert_eq!(clock.now_ms(), 1000);
    assert!(sink.events.is_empty());
}

#[test]
fn persistent_socket_fault_backs_off_between_polls() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let fault = NetError::Io(std::io::ErrorKind::OutOfMemory);
    svc.receiver_mut().socket_mut().recv_error = Some(fault);
    let mut delay = SimDelay(clock.clone());
    let mut sink = RecordingSink::new();

    for _ in 0..4 {
        assert_eq!(svc.run_once(&clock, &mut delay, &mut sink), ReceiverTick::NetFault(fault));
    }
    assert_eq!(clock.now_ms(), NET_FAULT_BACKOFF.as_millis() * 4);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::NetFault(_))), 4);
}

#[test]
fn healthy_polls_do_not_back_off() {
    let clock = SimClock::new();
    let mut svc = service(&clock, RecordingLink::new());
    let mut delay = SimDelay(clock.clone());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Red:0.90");
    assert!(matches!(
        svc.run_once(&clock, &mut delay, &mut sink),
        ReceiverTick::Played { .. }
    ));
    assert_eq!(clock.now_ms(), 0);
    assert_eq!(svc.run_once(&clock, &mut delay, &mut sink), ReceiverTick::Idle);
    assert_eq!(clock.now_ms(), 1000);
}

#[test]
fn actuator_failure_is_reported_after_the_ack() {
    let clock = SimClock::new();
    let link = RecordingLink {
        fail: true,
        ..RecordingLink::default()
    };
    let mut svc = service(&clock, link);
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Cyan:0.80");
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::ActuatorFault(ActuatorError::LinkWrite)
    );
    assert_eq!(acks(&mut svc), 1);
    assert_eq!(svc.stats().actuator_faults, 1);
}

#[test]
fn custom_track_map_is_honoured() {
    let clock = SimClock::new();
    let config: ReceiverConfig =
        serde_json::from_str(r#"{"audio": {"track_map": {"Purple": 42}, "repeat_cooldown_ms": 0}}"#).unwrap();
    let mut svc = ReceiverService::new(&config, ScriptedSocket::new(clock.clone()), RecordingLink::new());
    let mut sink = RecordingSink::new();

    deliver(&mut svc, b"Purple:0.75");
    deliver(&mut svc, b"Purple:0.75");
    deliver(&mut svc, b"Red:0.95");
    assert_eq!(
        svc.poll(&clock, &mut sink),
        ReceiverTick::Played {
            label: Label::Purple,
            track: 42
        }
    );
    // Zero cooldown: the repeat plays too.
    assert!(matches!(svc.poll(&clock, &mut sink), ReceiverTick::Played { .. }));
    assert_eq!(svc.poll(&clock, &mut sink), ReceiverTick::Unmapped);
}
