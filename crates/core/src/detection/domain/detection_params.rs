use thiserror::Error;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
pub const DEFAULT_MIN_SIZE: (u32, u32) = (30, 30);

#[derive(Error, Debug, PartialEq)]
pub enum InvalidDetectionParams {
    #[error("scale factor must be greater than 1.0, got {0}")]
    ScaleFactor(f64),
    #[error("minimum size must be at least 1x1, got {0}x{1}")]
    MinSize(u32, u32),
}

/// Multi-scale detector tuning, fixed for the lifetime of a session.
///
/// - `scale_factor`: each search scale shrinks the image by this factor.
/// - `min_neighbors`: overlapping raw hits needed before a region is
///   reported. Higher means fewer false positives and more misses.
/// - `min_size`: `(width, height)` floor in pixels; smaller hits are noise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionParams {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub min_size: (u32, u32),
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), InvalidDetectionParams> {
        if self.scale_factor.is_nan() || self.scale_factor <= 1.0 {
            return Err(InvalidDetectionParams::ScaleFactor(self.scale_factor));
        }
        if self.min_size.0 == 0 || self.min_size.1 == 0 {
            return Err(InvalidDetectionParams::MinSize(
                self.min_size.0,
                self.min_size.1,
            ));
        }
        Ok(())
    }
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = DetectionParams::default();
        assert_relative_eq!(params.scale_factor, 1.1);
        assert_eq!(params.min_neighbors, 5);
        assert_eq!(params.min_size, (30, 30));
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::one(1.0)]
    #[case::below_one(0.9)]
    #[case::nan(f64::NAN)]
    fn test_rejects_scale_factor(#[case] scale_factor: f64) {
        let params = DetectionParams {
            scale_factor,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(InvalidDetectionParams::ScaleFactor(_))
        ));
    }

    #[test]
    fn test_rejects_zero_min_size() {
        let params = DetectionParams {
            min_size: (0, 30),
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(InvalidDetectionParams::MinSize(0, 30))
        );
    }

    #[test]
    fn test_zero_min_neighbors_allowed() {
        let params = DetectionParams {
            min_neighbors: 0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }
}
