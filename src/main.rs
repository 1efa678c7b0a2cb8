use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fish_feeder_runtime::detect::DetectionHandler;
use fish_feeder_runtime::feeder::Feeder;
use fish_feeder_runtime::log::FileLog;
use fish_feeder_runtime::motor::{Motor, SerialMotor};
use fish_feeder_runtime::{config, log::EventLog};

/// Dispatch one detection event to the feeder.
///
/// Stands in for the camera pipeline: decodes the given image and feeds it
/// to the feeder as a fish / no-fish event.
#[derive(Parser, Debug)]
#[command(name = "fish-feeder-runtime")]
#[command(group = clap::ArgGroup::new("outcome").required(true).args(["fish", "no_fish"]))]
struct Cli {
    /// Captured image to dispatch and archive
    image: PathBuf,

    /// Treat the image as a fish detection (actuates the feeder)
    #[arg(long)]
    fish: bool,

    /// Treat the image as a no-fish detection (archive only)
    #[arg(long)]
    no_fish: bool,

    /// Motor sequence config file
    #[arg(long, default_value = config::CONFIG_PATH)]
    config: PathBuf,

    /// Archive directory for detection snapshots
    #[arg(long, default_value = config::ARCHIVE_DIR)]
    archive: PathBuf,

    /// Serial port of the motor controller
    #[arg(long, default_value = config::MOTOR_PORT)]
    port: String,

    /// Run without hardware (test mode)
    #[arg(long)]
    no_motor: bool,
}

fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let cli = Cli::parse();
    let log: Arc<dyn EventLog> = Arc::new(FileLog::new(config::LOG_PATH));

    let motor: Option<Box<dyn Motor>> = if cli.no_motor {
        None
    } else {
        match SerialMotor::open(&cli.port) {
            Ok(motor) => Some(Box::new(motor)),
            Err(e) => {
                log.error(&format!("Could not open motor port {}: {}", cli.port, e));
                None
            }
        }
    };

    let mut feeder = Feeder::new(&cli.config, motor, &cli.archive, log.clone());

    let image = match image::open(&cli.image) {
        Ok(image) => image,
        Err(e) => {
            log.error(&format!("Could not read image {}: {}", cli.image.display(), e));
            std::process::exit(1);
        }
    };

    if cli.fish && !cli.no_fish {
        feeder.fish_detected(&image);
    } else {
        feeder.no_fish_detected(&image);
    }
}
