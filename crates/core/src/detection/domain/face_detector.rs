use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Input is the single-channel luminance frame; the returned rectangles
/// are in the coordinates of that frame, which match the colour frame it
/// was derived from. Order is whatever the implementation produces.
pub trait FaceDetector: Send {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
