//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a node pipeline against
//! mock adapters.  All tests run on the host (x86_64) with no real
//! hardware required.

mod mock_hw;
mod receiver_pipeline_tests;
mod sender_pipeline_tests;
mod udp_loopback_tests;
