/// Why a live detection session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The quit key was pressed.
    Quit,
    /// A frame could not be read; treated as end of stream.
    StreamEnded { reason: String },
    /// The camera never opened, so no frame was processed.
    CameraUnavailable { reason: String },
}

impl Termination {
    /// Process exit status for this outcome.
    ///
    /// A lost stream gets its own code so scripts can tell it apart from
    /// a user quitting.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Quit => 0,
            Termination::CameraUnavailable { .. } => 1,
            Termination::StreamEnded { .. } => 2,
        }
    }
}

/// State of the live detection loop.
///
/// `Running` either stays `Running` after an iteration or moves to one of
/// the terminal states; a terminal state never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated(Termination),
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Terminated(_))
    }

    /// Applies an iteration result. Terminal states absorb further input.
    pub fn advance(self, outcome: Option<Termination>) -> LoopState {
        match (self, outcome) {
            (LoopState::Running, None) => LoopState::Running,
            (LoopState::Running, Some(t)) => LoopState::Terminated(t),
            (terminal, _) => terminal,
        }
    }
}
