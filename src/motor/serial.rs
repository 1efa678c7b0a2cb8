// Serial protocol for the feeder motor controller board
//
// Packet format: [0xFF, 0xFF, Command, Length, Params..., Checksum]
// The board answers every command with a single status byte (0x00 = ok).

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, warn};

use super::{Motor, MotorError};

/// Default serial configuration for the feeder controller
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

/// Packet header bytes
const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Status byte for an accepted command
const STATUS_OK: u8 = 0x00;

/// Command set
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum Command {
    Ping = 0x01,
    Run = 0x02,
    Stop = 0x03,
}

/// Feeder motor driven over a serial bus.
pub struct SerialMotor {
    port: Box<dyn SerialPort>,
    initialized: bool,
}

impl SerialMotor {
    /// Open a connection to the motor controller and ping it once.
    ///
    /// A failed ping leaves the motor constructed but marked
    /// not-initialized; the feeder refuses to actuate it in that state.
    pub fn open(port_name: &str) -> Result<Self, MotorError> {
        Self::open_with_baudrate(port_name, DEFAULT_BAUDRATE)
    }

    /// Open with custom baudrate
    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self, MotorError> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        let mut motor = Self { port, initialized: false };
        match motor.transact(Command::Ping, &[]) {
            Ok(()) => motor.initialized = true,
            Err(e) => warn!("Motor controller on {} not responding: {}", port_name, e),
        }
        Ok(motor)
    }

    /// Calculate checksum for a packet (excluding header)
    fn checksum(data: &[u8]) -> u8 {
        let sum: u16 = data.iter().map(|&b| b as u16).sum();
        (!sum & 0xFF) as u8
    }

    /// Build a packet with header and checksum
    fn build_packet(command: Command, params: &[u8]) -> Vec<u8> {
        let mut packet = Vec::with_capacity(5 + params.len());
        packet.extend_from_slice(&HEADER);
        packet.push(command as u8);
        packet.push(params.len() as u8);
        packet.extend_from_slice(params);
        packet.push(Self::checksum(&packet[2..]));
        packet
    }

    /// Send a command and wait for the single-byte acknowledgement
    fn transact(&mut self, command: Command, params: &[u8]) -> Result<(), MotorError> {
        let packet = Self::build_packet(command, params);
        debug!("TX {:02X?}", packet);

        self.port.write_all(&packet)?;
        self.port.flush()?;

        let mut status = [0u8; 1];
        match self.port.read_exact(&mut status) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                return Err(MotorError::Timeout);
            }
            Err(e) => return Err(e.into()),
        }

        if status[0] != STATUS_OK {
            return Err(MotorError::Rejected { status: status[0] });
        }
        Ok(())
    }
}

impl Motor for SerialMotor {
    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn run(&mut self, speed: i32, ramp_ms: u64, duration_ms: u64) -> Result<(), MotorError> {
        if !self.initialized {
            return Err(MotorError::NotInitialized);
        }

        // The board expects a duty cycle percentage
        let speed = speed.clamp(0, 100) as u8;
        let ramp = ramp_ms.min(u8::MAX as u64) as u8;
        let duration = duration_ms.min(u16::MAX as u64) as u16;

        let mut params = [0u8; 4];
        params[0] = speed;
        params[1] = ramp;
        params[2..4].copy_from_slice(&duration.to_le_bytes());

        self.transact(Command::Run, &params)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        if !self.initialized {
            return Err(MotorError::NotInitialized);
        }
        self.transact(Command::Stop, &[])
    }
}

impl Drop for SerialMotor {
    fn drop(&mut self) {
        // Best-effort stop so the mechanism never keeps spinning
        if self.initialized {
            if let Err(e) = self.stop() {
                warn!("Failed to stop motor on drop: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_layout_and_checksum() {
        let packet = SerialMotor::build_packet(Command::Run, &[100, 10, 0xE8, 0x03]);

        assert_eq!(&packet[..2], &HEADER);
        assert_eq!(packet[2], Command::Run as u8);
        assert_eq!(packet[3], 4);
        assert_eq!(&packet[4..8], &[100, 10, 0xE8, 0x03]);

        let sum: u16 = packet[2..8].iter().map(|&b| b as u16).sum();
        assert_eq!(packet[8], (!sum & 0xFF) as u8);
    }

    #[test]
    fn stop_packet_has_no_params() {
        let packet = SerialMotor::build_packet(Command::Stop, &[]);
        assert_eq!(packet.len(), 5);
        assert_eq!(packet[3], 0);
    }
}
