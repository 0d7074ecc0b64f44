use std::collections::HashSet;
use std::ffi::c_void;

use opencv::core::{AlgorithmHint, Mat, CV_8UC3};
use opencv::{highgui, imgproc};

use crate::display::domain::frame_display::{FrameDisplay, KeyPress};
use crate::shared::frame::Frame;

/// Window output through OpenCV's `highgui`.
///
/// Windows are created lazily on the first `show`, so constructing the
/// display has no visible effect.
pub struct HighGuiDisplay {
    windows: HashSet<String>,
    bgr: Mat,
}

impl HighGuiDisplay {
    pub fn new() -> Self {
        Self {
            windows: HashSet::new(),
            bgr: Mat::default(),
        }
    }

    fn ensure_window(&mut self, window: &str) -> Result<(), opencv::Error> {
        if !self.windows.contains(window) {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
            log::debug!("Created window '{window}'");
            self.windows.insert(window.to_string());
        }
        Ok(())
    }
}

impl Default for HighGuiDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDisplay for HighGuiDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!(
                "Display expects a 3-channel frame, got {} channels",
                frame.channels()
            )
            .into());
        }
        self.ensure_window(window)?;
        to_bgr(frame, &mut self.bgr)?;
        highgui::imshow(window, &self.bgr)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<KeyPress>, Box<dyn std::error::Error>> {
        let code = highgui::wait_key(timeout_ms.max(1))?;
        Ok((code >= 0).then_some(KeyPress(code)))
    }

    fn close_all(&mut self) {
        if self.windows.is_empty() {
            return;
        }
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to close windows: {e}");
        }
        // Give the backend's event loop a chance to actually tear the windows down
        if let Err(e) = highgui::wait_key(1) {
            log::warn!("Failed to pump window events after close: {e}");
        }
        self.windows.clear();
    }
}

/// Converts an RGB frame into `bgr`, the layout highgui expects.
fn to_bgr(frame: &Frame, bgr: &mut Mat) -> Result<(), opencv::Error> {
    // SAFETY: the header only reads the frame buffer, lives no longer
    // than this call and matches its dimensions and row stride.
    let rgb = unsafe {
        Mat::new_rows_cols_with_data_unsafe(
            frame.height() as i32,
            frame.width() as i32,
            CV_8UC3,
            frame.data().as_ptr() as *mut c_void,
            frame.stride(),
        )
    }?;
    imgproc::cvt_color(
        &rgb,
        bgr,
        imgproc::COLOR_RGB2BGR,
        0,
        AlgorithmHint::ALGO_HINT_DEFAULT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::Vec3b;
    use opencv::prelude::*;

    #[test]
    fn test_to_bgr_swaps_red_and_blue() {
        let frame = Frame::filled(4, 3, [0, 0, 255], 0);
        let mut bgr = Mat::default();
        to_bgr(&frame, &mut bgr).unwrap();

        assert_eq!(bgr.rows(), 3);
        assert_eq!(bgr.cols(), 4);
        assert_eq!(bgr.channels(), 3);
        let px = bgr.at_2d::<Vec3b>(2, 3).unwrap();
        assert_eq!(px.0, [255, 0, 0]);
    }

    #[test]
    fn test_to_bgr_keeps_pixel_positions() {
        // 2x1: red then green
        let frame = Frame::new(vec![255, 0, 0, 0, 255, 0], 2, 1, 3, 0);
        let mut bgr = Mat::default();
        to_bgr(&frame, &mut bgr).unwrap();

        assert_eq!(bgr.at_2d::<Vec3b>(0, 0).unwrap().0, [0, 0, 255]);
        assert_eq!(bgr.at_2d::<Vec3b>(0, 1).unwrap().0, [0, 255, 0]);
    }

    #[test]
    fn test_show_rejects_single_channel_frame() {
        let mut display = HighGuiDisplay::new();
        let gray = Frame::new(vec![0; 16], 4, 4, 1, 0);
        let err = display.show("test", &gray).unwrap_err();
        assert!(err.to_string().contains("3-channel"));
        assert!(display.windows.is_empty());
    }

    #[test]
    fn test_display_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<HighGuiDisplay>();
    }

    #[test]
    fn test_close_all_without_windows_is_noop() {
        let mut display = HighGuiDisplay::new();
        display.close_all();
        display.close_all();
        assert!(display.windows.is_empty());
    }
}
