//! UDP sensor session
//!
//! Binds one socket for lidar packets and one for IMU packets. Both are
//! non-blocking; `poll` checks them in turn until a datagram arrives or the
//! poll timeout elapses.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use contracts::{ClientState, ContractError, SensorConfig, SensorSession};
use tracing::{debug, info};

/// Maximum UDP datagram size
const MAX_DATAGRAM_SIZE: usize = 65536;

/// Idle sleep between socket checks
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// UDP session configuration
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Local address to bind both sockets to
    pub bind_addr: IpAddr,
    /// Lidar port (0 picks an ephemeral port)
    pub lidar_port: u16,
    /// IMU port (0 picks an ephemeral port)
    pub imu_port: u16,
    /// Longest time a single `poll` waits
    pub poll_timeout: Duration,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            lidar_port: 7502,
            imu_port: 7503,
            poll_timeout: Duration::from_secs(1),
        }
    }
}

impl From<&SensorConfig> for UdpConfig {
    fn from(config: &SensorConfig) -> Self {
        Self {
            lidar_port: config.lidar_port,
            imu_port: config.imu_port,
            poll_timeout: Duration::from_millis(config.poll_timeout_ms),
            ..Default::default()
        }
    }
}

/// One received datagram waiting to be read
#[derive(Debug)]
struct Pending {
    buf: Vec<u8>,
    len: Option<usize>,
}

impl Pending {
    fn new() -> Self {
        Self {
            buf: vec![0u8; MAX_DATAGRAM_SIZE],
            len: None,
        }
    }

    /// Receive into the buffer unless a datagram is already waiting
    fn fill(&mut self, socket: &UdpSocket) -> Result<(), ContractError> {
        if self.len.is_some() {
            return Ok(());
        }
        match socket.recv_from(&mut self.buf) {
            Ok((len, _src)) => {
                self.len = Some(len);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(ContractError::transport(format!("udp recv failed: {e}"))),
        }
    }

    /// Copy the waiting datagram out, truncated to `out`
    fn take(&mut self, out: &mut [u8], kind: &str) -> Result<usize, ContractError> {
        let len = self
            .len
            .take()
            .ok_or_else(|| ContractError::transport(format!("no {kind} packet pending")))?;
        let n = len.min(out.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        Ok(n)
    }
}

/// Sensor session over a pair of UDP sockets
#[derive(Debug)]
pub struct UdpSession {
    lidar: UdpSocket,
    imu: UdpSocket,
    poll_timeout: Duration,
    lidar_pending: Pending,
    imu_pending: Pending,
}

impl UdpSession {
    /// Bind both sockets
    pub fn bind(config: &UdpConfig) -> Result<Self, ContractError> {
        let lidar = Self::bind_socket(SocketAddr::new(config.bind_addr, config.lidar_port))?;
        let imu = Self::bind_socket(SocketAddr::new(config.bind_addr, config.imu_port))?;

        info!(
            lidar = %lidar.local_addr()?,
            imu = %imu.local_addr()?,
            "udp sensor session bound"
        );

        Ok(Self {
            lidar,
            imu,
            poll_timeout: config.poll_timeout,
            lidar_pending: Pending::new(),
            imu_pending: Pending::new(),
        })
    }

    fn bind_socket(addr: SocketAddr) -> Result<UdpSocket, ContractError> {
        let socket = UdpSocket::bind(addr)
            .map_err(|e| ContractError::transport(format!("cannot bind {addr}: {e}")))?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }

    /// Local address of the lidar socket
    pub fn lidar_addr(&self) -> Result<SocketAddr, ContractError> {
        Ok(self.lidar.local_addr()?)
    }

    /// Local address of the IMU socket
    pub fn imu_addr(&self) -> Result<SocketAddr, ContractError> {
        Ok(self.imu.local_addr()?)
    }

    fn state(&self) -> ClientState {
        ClientState {
            lidar_data: self.lidar_pending.len.is_some(),
            imu_data: self.imu_pending.len.is_some(),
            ..Default::default()
        }
    }
}

impl SensorSession for UdpSession {
    fn poll(&mut self) -> Result<ClientState, ContractError> {
        let deadline = Instant::now() + self.poll_timeout;
        loop {
            self.lidar_pending.fill(&self.lidar)?;
            self.imu_pending.fill(&self.imu)?;

            let state = self.state();
            if !state.is_timeout() {
                return Ok(state);
            }
            if Instant::now() >= deadline {
                debug!(timeout_ms = self.poll_timeout.as_millis() as u64, "poll timed out");
                return Ok(ClientState::TIMEOUT);
            }
            thread::sleep(IDLE_SLEEP);
        }
    }

    fn read_lidar_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        self.lidar_pending.take(buf, "lidar")
    }

    fn read_imu_packet(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        self.imu_pending.take(buf, "imu")
    }
}
