//! Application core: the two node services and their port boundary.
//!
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod receiver;
pub mod sender;

pub use events::{AppEvent, NodeRole};
pub use receiver::{NET_FAULT_BACKOFF, ReceiverService, ReceiverStats, ReceiverTick};
pub use sender::{SenderService, SenderStats, SenderTick};
