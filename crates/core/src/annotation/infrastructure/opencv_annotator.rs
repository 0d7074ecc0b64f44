use std::ffi::c_void;

use opencv::core::{Mat, Point, Rect, Scalar, CV_8UC3};
use opencv::imgproc;

use crate::annotation::domain::frame_annotator::{AnnotationStyle, FrameAnnotator};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws rectangles and Hershey-font labels with OpenCV's `imgproc`.
pub struct OpenCvAnnotator {
    style: AnnotationStyle,
}

impl OpenCvAnnotator {
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style }
    }

    fn color(&self) -> Scalar {
        // Frames are RGB, so the scalar follows the same channel order
        let [r, g, b] = self.style.color;
        Scalar::new(r as f64, g as f64, b as f64, 0.0)
    }
}

impl Default for OpenCvAnnotator {
    fn default() -> Self {
        Self::new(AnnotationStyle::default())
    }
}

impl FrameAnnotator for OpenCvAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if regions.is_empty() {
            return Ok(());
        }
        if frame.channels() != 3 {
            return Err(format!(
                "Annotator expects a 3-channel frame, got {} channels",
                frame.channels()
            )
            .into());
        }

        let rows = frame.height() as i32;
        let cols = frame.width() as i32;
        let step = frame.stride();
        // SAFETY: the Mat header borrows the frame buffer without owning it
        // and is dropped at the end of this function, while `frame` is still
        // mutably borrowed. Dimensions and step match the buffer exactly.
        let mut canvas = unsafe {
            Mat::new_rows_cols_with_data_unsafe(
                rows,
                cols,
                CV_8UC3,
                frame.data_mut().as_mut_ptr() as *mut c_void,
                step,
            )
        }?;

        let color = self.color();
        for region in regions {
            let rect = Rect::new(region.x, region.y, region.width, region.height);
            imgproc::rectangle(
                &mut canvas,
                rect,
                color,
                self.style.thickness,
                imgproc::LINE_8,
                0,
            )?;

            let (lx, ly) = region.label_origin(self.style.label_offset);
            imgproc::put_text(
                &mut canvas,
                &self.style.label,
                Point::new(lx, ly),
                imgproc::FONT_HERSHEY_SIMPLEX,
                self.style.font_scale,
                color,
                self.style.thickness,
                imgproc::LINE_8,
                false,
            )?;
        }

        Ok(())
    }
}
