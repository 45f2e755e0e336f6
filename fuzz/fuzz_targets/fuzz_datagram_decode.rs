//! Fuzz target: `wire::decode_event` and the receiver's track lookup.
//!
//! Arbitrary datagrams must never panic the decoder, and a decoded
//! confidence is always finite.
//!
//! cargo fuzz run fuzz_datagram_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use spectrum::audio::TrackMapping;
use spectrum::net::wire::decode_event;

fuzz_target!(|data: &[u8]| {
    let mapping = TrackMapping::default();
    if let Ok(event) = decode_event(data) {
        assert!(event.confidence.is_finite());
        assert!(!event.label.contains(':'), "label must stop at the first separator");
        if let Some((_, track)) = mapping.resolve(event.label) {
            assert!((1..=10).contains(&track));
        }
    }
});
