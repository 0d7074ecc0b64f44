use std::path::Path;

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Face detector backed by a pre-trained OpenCV Haar cascade.
pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    params: DetectionParams,
    hits: Vector<Rect>,
}

impl HaarCascadeDetector {
    pub fn new(
        cascade_path: &Path,
        params: DetectionParams,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        params.validate()?;
        let path = cascade_path
            .to_str()
            .ok_or_else(|| format!("Cascade path is not valid UTF-8: {}", cascade_path.display()))?;

        let classifier = CascadeClassifier::new(path)?;
        if classifier.empty()? {
            return Err(format!("Failed to load cascade from {}", cascade_path.display()).into());
        }
        log::info!(
            "Loaded cascade {} (scale_factor={}, min_neighbors={}, min_size={}x{})",
            cascade_path.display(),
            params.scale_factor,
            params.min_neighbors,
            params.min_size.0,
            params.min_size.1
        );

        Ok(Self {
            classifier,
            params,
            hits: Vector::new(),
        })
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&mut self, gray: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        if gray.channels() != 1 {
            return Err(format!(
                "Cascade detector expects a single-channel frame, got {} channels",
                gray.channels()
            )
            .into());
        }

        let image = Mat::new_rows_cols_with_data::<u8>(
            gray.height() as i32,
            gray.width() as i32,
            gray.data(),
        )?;

        self.hits.clear();
        self.classifier.detect_multi_scale(
            &*image,
            &mut self.hits,
            self.params.scale_factor,
            self.params.min_neighbors as i32,
            0,
            Size::new(self.params.min_size.0 as i32, self.params.min_size.1 as i32),
            Size::default(),
        )?;

        Ok(self
            .hits
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}
