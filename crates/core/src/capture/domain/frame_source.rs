use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("could not open camera {device}: {reason}")]
    OpenFailed { device: i32, reason: String },
    #[error("could not read frame: {0}")]
    ReadFailed(String),
    #[error("camera is not open")]
    NotOpened,
}

/// A live source of colour frames, typically a camera.
///
/// The handle is opened once, read until it fails or the session ends,
/// then released. Frames come back as RGB with a capture index that
/// increases by one per successful read.
pub trait FrameSource: Send {
    /// Opens the device. Failing here is fatal for the session.
    fn open(&mut self, device_index: i32) -> Result<(), CaptureError>;

    /// Blocks until the next frame is available.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the device. Must be safe to call on an unopened source.
    fn release(&mut self);
}
