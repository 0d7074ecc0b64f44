use std::time::Instant;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::detection_params::DetectionParams;
use crate::detection::domain::face_detector::FaceDetector;
use crate::display::domain::frame_display::FrameDisplay;
use crate::pipeline::loop_state::{LoopState, Termination};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::region_filter::retain_min_size;
use crate::shared::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUIT_KEY, DEFAULT_WINDOW_TITLE};
use crate::shared::grayscale::to_grayscale;

/// Settings for one live detection session.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopConfig {
    pub device_index: i32,
    pub window_title: String,
    pub quit_key: char,
    /// Upper bound on the key wait per iteration, in milliseconds.
    pub poll_interval_ms: i32,
    pub detection: DetectionParams,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            quit_key: DEFAULT_QUIT_KEY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            detection: DetectionParams::default(),
        }
    }
}

/// Exclusive hold on the camera and the display for one session.
///
/// Dropping it releases the camera and closes the display, so both happen
/// exactly once whichever way the loop exits, including `?` and unwinding.
struct Session<'a> {
    source: &'a mut dyn FrameSource,
    display: &'a mut dyn FrameDisplay,
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.source.release();
        self.display.close_all();
        log::debug!("Session closed: camera released, display closed");
    }
}

/// Live loop: capture → grayscale → detect → annotate → display → poll.
pub struct LiveDetectionUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    display: Box<dyn FrameDisplay>,
    logger: Box<dyn PipelineLogger>,
    config: LoopConfig,
}

impl LiveDetectionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        display: Box<dyn FrameDisplay>,
        logger: Box<dyn PipelineLogger>,
        config: LoopConfig,
    ) -> Self {
        Self {
            source,
            detector,
            annotator,
            display,
            logger,
            config,
        }
    }

    /// Runs the session until the quit key, a read failure, or a backend error.
    ///
    /// A camera that fails to open ends the session before any frame is read
    /// or any window is touched. Backend errors from detection, annotation or
    /// display are returned as `Err` once the camera and display are closed.
    pub fn execute(&mut self) -> Result<Termination, Box<dyn std::error::Error>> {
        if let Err(e) = self.source.open(self.config.device_index) {
            log::error!("{e}");
            return Ok(Termination::CameraUnavailable {
                reason: e.to_string(),
            });
        }
        log::info!(
            "Streaming from camera {}; press '{}' in the window to quit",
            self.config.device_index,
            self.config.quit_key
        );

        let mut session = Session {
            source: self.source.as_mut(),
            display: self.display.as_mut(),
        };
        let mut frames = 0usize;
        let mut state = LoopState::Running;

        let termination = loop {
            let outcome = iterate(
                &mut session,
                self.detector.as_mut(),
                self.annotator.as_ref(),
                self.logger.as_mut(),
                &self.config,
                &mut frames,
            )?;
            state = state.advance(outcome);
            if let LoopState::Terminated(t) = &state {
                break t.clone();
            }
        };
        drop(session);

        log::info!("Session ended after {frames} frames: {termination:?}");
        self.logger.summary();
        Ok(termination)
    }
}

/// One pass of the per-frame contract. `Some` means the loop must stop.
fn iterate(
    session: &mut Session<'_>,
    detector: &mut dyn FaceDetector,
    annotator: &dyn FrameAnnotator,
    logger: &mut dyn PipelineLogger,
    config: &LoopConfig,
    frames: &mut usize,
) -> Result<Option<Termination>, Box<dyn std::error::Error>> {
    let started = Instant::now();
    let mut frame = match session.source.read_frame() {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("{e}");
            return Ok(Some(Termination::StreamEnded {
                reason: e.to_string(),
            }));
        }
    };
    let mark = lap(logger, "capture", started);

    let gray = to_grayscale(&frame);
    let mark = lap(logger, "grayscale", mark);

    let regions = retain_min_size(detector.detect(&gray)?, config.detection.min_size);
    drop(gray);
    let mark = lap(logger, "detect", mark);
    logger.metric("faces", regions.len() as f64);
    log::trace!("Frame {}: {} face(s)", frame.index(), regions.len());

    annotator.annotate(&mut frame, &regions)?;
    let mark = lap(logger, "annotate", mark);

    session.display.show(&config.window_title, &frame)?;
    *frames += 1;
    logger.frame_processed(*frames);

    let key = session.display.poll_key(config.poll_interval_ms)?;
    lap(logger, "display", mark);

    if key.is_some_and(|k| k.matches(config.quit_key)) {
        log::info!("Quit key '{}' pressed", config.quit_key);
        return Ok(Some(Termination::Quit));
    }
    Ok(None)
}

fn lap(logger: &mut dyn PipelineLogger, stage: &str, since: Instant) -> Instant {
    let now = Instant::now();
    logger.timing(stage, now.duration_since(since).as_secs_f64() * 1000.0);
    now
}
