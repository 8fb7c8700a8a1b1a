//! Sensor session implementations

mod mock;
mod udp;

pub use mock::MockSession;
pub use udp::{UdpConfig, UdpSession};
