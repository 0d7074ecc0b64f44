use crate::shared::constants::DEFAULT_LABEL;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// How detection boxes and their labels are drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationStyle {
    /// Stroke and text colour, RGB.
    pub color: [u8; 3],
    pub thickness: i32,
    pub label: String,
    /// Distance of the label baseline above the box's top edge.
    pub label_offset: i32,
    pub font_scale: f64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: [0, 0, 255],
            thickness: 2,
            label: DEFAULT_LABEL.to_string(),
            label_offset: 10,
            font_scale: 0.9,
        }
    }
}

/// Domain interface for drawing detections onto a colour frame.
///
/// Implementations modify the frame in place, drawing one box and one
/// label per region in the order given. Overlapping regions are drawn
/// independently.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, regions: &[Region])
        -> Result<(), Box<dyn std::error::Error>>;
}
