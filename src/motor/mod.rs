// Motor control module for the feeder mechanism
//
// Provides:
// - The Motor capability trait the feeder actuates through
// - A serial-bus hardware implementation

pub mod serial;

pub use serial::SerialMotor;

use thiserror::Error;

/// Error types for motor actuation
#[derive(Debug, Error)]
pub enum MotorError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Motor not initialized")]
    NotInitialized,

    #[error("Motor rejected command: 0x{status:02X}")]
    Rejected { status: u8 },

    #[error("Timeout waiting for motor acknowledgement")]
    Timeout,
}

/// Hardware capability the feeder drives its sequence against.
///
/// All operations are treated as fallible; no hardware success is assumed.
pub trait Motor {
    /// Whether the underlying hardware came up and can accept commands.
    fn is_initialized(&self) -> bool;

    /// Run the motor at `speed` (0-100) for `duration_ms`, pulsing with the
    /// given PWM ramp period.
    fn run(&mut self, speed: i32, ramp_ms: u64, duration_ms: u64) -> Result<(), MotorError>;

    /// Stop the motor immediately.
    fn stop(&mut self) -> Result<(), MotorError>;
}
