// Detection snapshot archive
//
// Saves each detection image under an outcome-tagged, second-resolution
// timestamped name. Two saves of the same outcome within the same second
// overwrite each other; that collision is accepted.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use image::DynamicImage;
use thiserror::Error;

use crate::detect::Detection;
use crate::log::EventLog;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not create archive directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("Could not save image: {0}")]
    Save(#[from] image::ImageError),
}

/// Persists detection snapshots into the archive directory.
pub struct ImageArchiver {
    dir: PathBuf,
    log: Arc<dyn EventLog>,
}

impl ImageArchiver {
    pub fn new(dir: impl Into<PathBuf>, log: Arc<dyn EventLog>) -> Self {
        Self { dir: dir.into(), log }
    }

    /// Archive one image under `<prefix><YYYY-MM-DD_HH-MM-SS>.jpg`.
    ///
    /// Every failure is logged and the save abandoned; returns the saved
    /// path on success.
    pub fn save(&self, image: &DynamicImage, outcome: Detection) -> Option<PathBuf> {
        match self.try_save(image, outcome) {
            Ok(path) => {
                self.log.info(&format!("Image saved to: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.log.error(&e.to_string());
                None
            }
        }
    }

    fn try_save(&self, image: &DynamicImage, outcome: Detection) -> Result<PathBuf, ArchiveError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(ArchiveError::CreateDir)?;
            self.log
                .info(&format!("Created archive directory: {}", self.dir.display()));
        }

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let filename = format!("{}{}.jpg", outcome.prefix(), timestamp);
        let path = self.dir.join(filename);

        image.save(&path)?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
