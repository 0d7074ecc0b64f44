use ndarray::Axis;

use super::frame::Frame;

// BT.601 luma weights in 14-bit fixed point, the same table the vision
// backend uses for its own colour-to-grey conversion.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Single-channel luminance copy of a frame, used as detector input.
///
/// The source frame is untouched and the capture index is preserved.
/// A frame that is already single-channel is returned as a copy.
pub fn to_grayscale(frame: &Frame) -> Frame {
    if frame.channels() == 1 {
        return frame.clone();
    }

    let view = frame.as_ndarray();
    let data: Vec<u8> = if frame.is_color() {
        view.lanes(Axis(2))
            .into_iter()
            .map(|px| luma(px[0], px[1], px[2]))
            .collect()
    } else {
        view.lanes(Axis(2)).into_iter().map(|px| px[0]).collect()
    };

    Frame::new(data, frame.width(), frame.height(), 1, frame.index())
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = (r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT + ROUND) >> SHIFT;
    y.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::black([0, 0, 0], 0)]
    #[case::white([255, 255, 255], 255)]
    #[case::red([255, 0, 0], 76)]
    #[case::green([0, 255, 0], 150)]
    #[case::blue([0, 0, 255], 29)]
    #[case::mid_grey([128, 128, 128], 128)]
    fn test_luma_values(#[case] rgb: [u8; 3], #[case] expected: u8) {
        let gray = to_grayscale(&Frame::filled(2, 2, rgb, 0));
        assert!(gray.data().iter().all(|&v| v == expected));
    }

    #[test]
    fn test_output_is_single_channel_same_size() {
        let frame = Frame::filled(7, 5, [10, 200, 30], 3);
        let gray = to_grayscale(&frame);
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.width(), 7);
        assert_eq!(gray.height(), 5);
        assert_eq!(gray.data().len(), 35);
        assert_eq!(gray.index(), 3);
    }

    #[test]
    fn test_source_frame_keeps_colour() {
        let frame = Frame::filled(4, 4, [1, 2, 3], 0);
        let before = frame.clone();
        let _ = to_grayscale(&frame);
        assert_eq!(frame, before);
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn test_pixel_order_preserved() {
        // 2x1: red then blue
        let frame = Frame::new(vec![255, 0, 0, 0, 0, 255], 2, 1, 3, 0);
        let gray = to_grayscale(&frame);
        assert_eq!(gray.data(), &[76, 29]);
    }

    #[test]
    fn test_single_channel_passthrough() {
        let frame = Frame::new(vec![1, 2, 3, 4], 2, 2, 1, 9);
        assert_eq!(to_grayscale(&frame), frame);
    }

    #[test]
    fn test_alpha_channel_ignored() {
        let frame = Frame::new(vec![255, 255, 255, 0], 1, 1, 4, 0);
        assert_eq!(to_grayscale(&frame).data(), &[255]);
    }
}
