//! Real-time webcam face detection.
//!
//! The live loop in [`pipeline::live_detection_use_case`] talks to the
//! camera, detector, annotator and window only through the traits in each
//! context's `domain` module. OpenCV-backed implementations live in the
//! `infrastructure` modules and are compiled with the `opencv` feature.

pub mod annotation;
pub mod capture;
pub mod detection;
pub mod display;
pub mod pipeline;
pub mod shared;
