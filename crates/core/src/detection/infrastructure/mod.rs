pub mod cascade_resolver;
#[cfg(feature = "opencv")]
pub mod haar_cascade_detector;
