use opencv::core::{AlgorithmHint, Mat};
use opencv::prelude::*;
use opencv::{imgproc, videoio};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;

/// Camera capture through OpenCV's `VideoCapture`.
///
/// OpenCV hands out BGR frames; they are converted to RGB here so the
/// rest of the pipeline never sees the backend layout.
pub struct OpenCvCamera {
    capture: Option<videoio::VideoCapture>,
    bgr: Mat,
    rgb: Mat,
    next_index: usize,
}

impl OpenCvCamera {
    pub fn new() -> Self {
        Self {
            capture: None,
            bgr: Mat::default(),
            rgb: Mat::default(),
            next_index: 0,
        }
    }

    fn convert(&mut self) -> Result<Frame, opencv::Error> {
        imgproc::cvt_color(
            &self.bgr,
            &mut self.rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            AlgorithmHint::ALGO_HINT_DEFAULT,
        )?;
        let width = self.rgb.cols() as u32;
        let height = self.rgb.rows() as u32;
        let data = self.rgb.data_bytes()?.to_vec();
        Ok(Frame::new(data, width, height, 3, self.next_index))
    }
}

impl Default for OpenCvCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for OpenCvCamera {
    fn open(&mut self, device_index: i32) -> Result<(), CaptureError> {
        let open_failed = |reason: String| CaptureError::OpenFailed {
            device: device_index,
            reason,
        };

        let capture = videoio::VideoCapture::new(device_index, videoio::CAP_ANY)
            .map_err(|e| open_failed(e.to_string()))?;
        let opened = capture
            .is_opened()
            .map_err(|e| open_failed(e.to_string()))?;
        if !opened {
            return Err(open_failed("device not available".into()));
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or(0.0);
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or(0.0);
        log::info!("Opened camera {device_index} ({width}x{height})");

        self.capture = Some(capture);
        self.next_index = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let capture = self.capture.as_mut().ok_or(CaptureError::NotOpened)?;
        let grabbed = capture
            .read(&mut self.bgr)
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
        if !grabbed || self.bgr.empty() {
            return Err(CaptureError::ReadFailed("no frame returned".into()));
        }

        let frame = self
            .convert()
            .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;
        self.next_index += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera: {e}");
            }
            log::debug!("Camera released after {} frames", self.next_index);
        }
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use opencv::core::{Scalar, CV_8UC3};

    use super::*;

    #[test]
    fn test_read_before_open_fails() {
        let mut camera = OpenCvCamera::new();
        assert!(matches!(camera.read_frame(), Err(CaptureError::NotOpened)));
    }

    #[test]
    fn test_release_without_open_is_noop() {
        let mut camera = OpenCvCamera::new();
        camera.release();
        camera.release();
        assert!(camera.capture.is_none());
        assert!(matches!(camera.read_frame(), Err(CaptureError::NotOpened)));
    }

    #[test]
    fn test_convert_swaps_to_rgb() {
        let mut camera = OpenCvCamera::new();
        camera.bgr =
            Mat::new_rows_cols_with_default(2, 3, CV_8UC3, Scalar::new(255.0, 0.0, 0.0, 0.0))
                .unwrap();
        camera.next_index = 7;

        let frame = camera.convert().unwrap();
        assert_eq!((frame.width(), frame.height(), frame.channels()), (3, 2, 3));
        assert_eq!(frame.index(), 7);
        assert!(frame.data().chunks(3).all(|px| px == [0, 0, 255]));
    }
}
