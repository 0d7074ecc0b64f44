use crate::shared::frame::Frame;

/// A key code returned by the display's key poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress(pub i32);

impl KeyPress {
    /// Compares the low byte of the code with an ASCII key, ignoring the
    /// modifier bits some window backends set above it.
    pub fn matches(&self, key: char) -> bool {
        key.is_ascii() && (self.0 & 0xFF) == key as i32
    }
}

/// On-screen presentation of annotated frames plus keyboard polling.
pub trait FrameDisplay: Send {
    /// Shows a colour frame in the named window, creating it on first use.
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits at most `timeout_ms` for a key press. `timeout_ms` must be
    /// positive: backends treat zero as "wait forever".
    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<KeyPress>, Box<dyn std::error::Error>>;

    /// Closes every window this display opened.
    fn close_all(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain(113, 'q', true)]
    #[case::with_modifier_bits(0x10_0071, 'q', true)]
    #[case::other_key(27, 'q', false)]
    #[case::uppercase_differs(81, 'q', false)]
    #[case::non_ascii(0xE9, 'é', false)]
    fn test_key_matches(#[case] code: i32, #[case] key: char, #[case] expected: bool) {
        assert_eq!(KeyPress(code).matches(key), expected);
    }
}
