// Feeder orchestration
//
// Composition root: owns the loaded motor sequence, the optional motor
// capability, and the archiver. Detection events come in through the
// DetectionHandler trait; all failures are contained here and surfaced
// only through the event log.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image::DynamicImage;

use crate::archive::ImageArchiver;
use crate::config::RAMP_PERIOD_MS;
use crate::detect::{Detection, DetectionHandler};
use crate::log::EventLog;
use crate::motor::Motor;
use crate::sequence::{self, MotorStep};

/// State of one feeding cycle.
///
/// Idle means actuation never started (no usable motor); Completed and
/// Aborted are terminal for the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
    Completed,
    Aborted,
}

pub struct Feeder {
    sequence: Vec<MotorStep>,
    motor: Option<Box<dyn Motor>>,
    archiver: ImageArchiver,
    log: Arc<dyn EventLog>,
}

impl Feeder {
    /// Build a feeder, loading the motor sequence from `config_path`.
    ///
    /// `motor: None` is test mode: detection events still archive images
    /// but activation reports an error instead of actuating.
    pub fn new(
        config_path: &Path,
        motor: Option<Box<dyn Motor>>,
        archive_dir: &Path,
        log: Arc<dyn EventLog>,
    ) -> Self {
        match motor {
            Some(_) => log.info("Feeder initialized with motor"),
            None => log.info("Feeder initialized in test mode without hardware"),
        }

        let sequence = sequence::load_sequence(config_path, log.as_ref());
        let archiver = ImageArchiver::new(archive_dir, Arc::clone(&log));

        Self { sequence, motor, archiver, log }
    }

    /// The loaded motor sequence, never empty.
    pub fn sequence(&self) -> &[MotorStep] {
        &self.sequence
    }

    /// Run one feeding cycle and return its final state.
    ///
    /// Steps execute in sequence order, each followed by a blocking wait of
    /// its own duration. The first failed run aborts the cycle without
    /// invoking stop; a failed stop after a full run-through is reported
    /// but the cycle still counts as Completed.
    pub fn activate(&mut self) -> CycleState {
        let Some(motor) = self.motor.as_deref_mut() else {
            self.log.error("Cannot activate feeder: no motor present");
            return CycleState::Idle;
        };
        if !motor.is_initialized() {
            self.log.error("Cannot activate feeder: motor not initialized");
            return CycleState::Idle;
        }

        self.log.info("*** FEEDING MECHANISM ACTIVATED ***");
        let mut state = CycleState::Running;

        for step in &self.sequence {
            self.log.info(&format!(
                "Running feeder motor at speed {} for {}ms",
                step.speed, step.duration_ms
            ));
            if let Err(e) = motor.run(step.speed, RAMP_PERIOD_MS, step.duration_ms) {
                self.log.error(&format!("Motor run failed: {}", e));
                state = CycleState::Aborted;
                break;
            }
            thread::sleep(Duration::from_millis(step.duration_ms));
        }

        if state == CycleState::Running {
            match motor.stop() {
                Ok(()) => self.log.info("Feeder motor stopped."),
                Err(e) => self.log.error(&format!("Motor stop failed: {}", e)),
            }
            state = CycleState::Completed;
        }
        state
    }
}

impl DetectionHandler for Feeder {
    fn fish_detected(&mut self, image: &DynamicImage) {
        self.log.info("FISH DETECTED! Activating feeding mechanism...");
        self.activate();
        self.archiver.save(image, Detection::Fish);
    }

    fn no_fish_detected(&mut self, image: &DynamicImage) {
        self.log.info("No feeding necessary.");
        self.archiver.save(image, Detection::NoFish);
    }
}
