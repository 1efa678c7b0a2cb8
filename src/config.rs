// Paths, defaults, motor configuration

// Motor sequence config file (one "<speed> <duration_ms>" pair per line)
pub const CONFIG_PATH: &str = "feeder_config.txt";

// Fallback sequence used when the config file is missing or yields no steps
pub const DEFAULT_SEQUENCE: [(i32, u64); 2] = [(100, 1000), (50, 500)];

// Archive directory for detection snapshots, one level above the working dir
pub const ARCHIVE_DIR: &str = "../archive";

// Append-only feeder event log
pub const LOG_PATH: &str = "feeder.log";

// PWM ramp period handed to every motor run call, in milliseconds
pub const RAMP_PERIOD_MS: u64 = 10;

// Motor configuration
// Serial port for the feeder motor controller
pub const MOTOR_PORT: &str = "/dev/ttyUSB0";
