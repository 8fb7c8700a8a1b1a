//! SensorSession trait - packet source abstraction
//!
//! Decouples the ingestion loop from the concrete transport. A UDP socket
//! pair and the synthetic mock sensor both implement it.

use crate::ContractError;

/// Readiness reported by a single `poll`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientState {
    /// A lidar packet is ready to read
    pub lidar_data: bool,
    /// An IMU packet is ready to read
    pub imu_data: bool,
    /// The session failed and cannot continue
    pub error: bool,
    /// The session ended normally
    pub exit: bool,
}

impl ClientState {
    /// Nothing became ready before the poll timeout
    pub const TIMEOUT: ClientState = ClientState {
        lidar_data: false,
        imu_data: false,
        error: false,
        exit: false,
    };

    #[inline]
    pub fn is_timeout(&self) -> bool {
        *self == Self::TIMEOUT
    }
}

/// Packet source polled by the ingestion loop
///
/// All calls are blocking and come from one thread.
pub trait SensorSession: Send {
    /// Wait until a packet is ready, the session ends, or the poll timeout
    /// elapses
    fn poll(&mut self) -> Result<ClientState, ContractError>;

    /// Read one lidar packet into `buf`, returning the number of bytes read
    fn read_lidar_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError>;

    /// Read one IMU packet into `buf`, returning the number of bytes read
    fn read_imu_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError>;
}

impl<S: SensorSession + ?Sized> SensorSession for Box<S> {
    fn poll(&mut self) -> Result<ClientState, ContractError> {
        (**self).poll()
    }

    fn read_lidar_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        (**self).read_lidar_packet(buf)
    }

    fn read_imu_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        (**self).read_imu_packet(buf)
    }
}
