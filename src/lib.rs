pub mod archive;
pub mod config;
pub mod detect;
pub mod feeder;
pub mod log;
pub mod motor;
pub mod sequence;

pub use archive::{ArchiveError, ImageArchiver};
pub use detect::{Detection, DetectionHandler};
pub use feeder::{CycleState, Feeder};
pub use log::{EventLog, FileLog, Level, MemoryLog};
pub use motor::{Motor, MotorError, SerialMotor};
pub use sequence::MotorStep;
