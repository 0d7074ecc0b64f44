use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for live-loop events: frame count, stage timings and metrics.
///
/// Keeps the loop free of any particular output mechanism.
pub trait PipelineLogger: Send {
    /// Called once per fully processed (displayed) frame.
    fn frame_processed(&mut self, frames: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces per frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests and embedders with their own reporting.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame_processed(&mut self, _frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

#[derive(Default)]
struct Series {
    count: usize,
    sum: f64,
    max: f64,
}

impl Series {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.max = self.max.max(value);
    }

    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Log-backed reporter for the CLI.
///
/// Keeps running aggregates rather than raw samples, since a live session
/// has no frame bound. A progress line is logged every `log_every` frames.
pub struct StdoutPipelineLogger {
    log_every: usize,
    timings: BTreeMap<String, Series>,
    metrics: BTreeMap<String, Series>,
    start_time: Instant,
    frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(log_every: usize) -> Self {
        Self {
            log_every: log_every.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if no frame was processed.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Session summary ({} frames, {:.1}s):",
            self.frames,
            elapsed_ms / 1000.0
        )];

        for (stage, series) in &self.timings {
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  max {:7.2}ms",
                series.avg(),
                series.max
            ));
        }
        for (name, series) in &self.metrics {
            lines.push(format!("  {name}: avg {:.2}  max {:.0}", series.avg(), series.max));
        }
        if elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn average_timing(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).map(Series::avg)
    }

    pub fn average_metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).map(Series::avg)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(crate::shared::constants::PROGRESS_LOG_INTERVAL)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame_processed(&mut self, frames: usize) {
        self.frames = frames;
        if frames % self.log_every == 0 {
            let secs = self.start_time.elapsed().as_secs_f64();
            if secs > 0.0 {
                log::info!("Processed {frames} frames ({:.1} fps)", frames as f64 / secs);
            } else {
                log::info!("Processed {frames} frames");
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
