// Detection boundary types
//
// The camera pipeline lives outside this crate; it hands every decoded
// frame plus its verdict to a DetectionHandler. The Feeder is the one
// implementation here.

use image::DynamicImage;

/// Outcome of one detection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Fish,
    NoFish,
}

impl Detection {
    /// Archive filename prefix for this outcome.
    pub fn prefix(self) -> &'static str {
        match self {
            Detection::Fish => "fish_",
            Detection::NoFish => "no_fish_",
        }
    }
}

/// Callback interface the detection pipeline drives.
pub trait DetectionHandler {
    /// A fish was detected in `image`.
    fn fish_detected(&mut self, image: &DynamicImage);

    /// No fish was detected in `image`.
    fn no_fish_detected(&mut self, image: &DynamicImage);
}
