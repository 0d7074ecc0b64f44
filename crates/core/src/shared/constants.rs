pub const HAAR_CASCADE_NAME: &str = "haarcascade_frontalface_default.xml";
pub const HAAR_CASCADE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades/haarcascade_frontalface_default.xml";

/// Directories where OpenCV packages install their bundled cascades.
pub const BUNDLED_CASCADE_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
    "/opt/homebrew/share/opencv4/haarcascades",
];

pub const DEFAULT_WINDOW_TITLE: &str = "Real-Time Face Detection";
pub const DEFAULT_LABEL: &str = "Face";
pub const DEFAULT_QUIT_KEY: char = 'q';

/// Key-poll wait per iteration; also paces the loop to the display refresh.
pub const DEFAULT_POLL_INTERVAL_MS: i32 = 1;

/// Frames between progress log lines (~1 second at 30 fps).
pub const PROGRESS_LOG_INTERVAL: usize = 30;
