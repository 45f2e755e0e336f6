//! Fuzz target: `CommandFrame::parse`
//!
//! Any accepted frame must keep exactly the input bytes, and one without
//! the feedback flag must rebuild identically from command and parameter.
//!
//! cargo fuzz run fuzz_frame_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use spectrum::audio::CommandFrame;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = CommandFrame::parse(data) {
        assert_eq!(frame.as_bytes().as_slice(), data);
        if data[4] == 0 {
            let rebuilt = CommandFrame::new(frame.command_code(), frame.param());
            assert_eq!(rebuilt, frame);
        }
    }
});
