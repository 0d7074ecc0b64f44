/// An axis-aligned face rectangle in image coordinates (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when both sides reach the given minimum `(width, height)`.
    pub fn meets_min_size(&self, min_size: (u32, u32)) -> bool {
        i64::from(self.width) >= i64::from(min_size.0)
            && i64::from(self.height) >= i64::from(min_size.1)
    }

    /// Baseline-left point for a label drawn `offset` pixels above the top edge.
    ///
    /// Clamped to `offset` so a face touching the top of the frame still
    /// gets a visible label instead of one drawn at negative y.
    pub fn label_origin(&self, offset: i32) -> (i32, i32) {
        (self.x, (self.y - offset).max(offset))
    }
}
