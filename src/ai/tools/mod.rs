pub mod availability;
pub use availability::AvailabilityTool;

pub mod booking;
pub use booking::{BookingGuard, BookingTool};

/// Classified result of running a tool. The orchestrating loop only
/// ever sees the rendered text, but the variants let callers and
/// tests tell a real answer from a refusal or a recovered failure
/// without pattern matching on message prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The tool did its job and produced an answer.
    Success(String),
    /// The tool declined to act, by policy rather than failure.
    Refused(String),
    /// Something went wrong, but the reply text still lets the agent
    /// carry on: retry, pick another tool, or give up gracefully.
    Recoverable(String),
}

impl ToolOutcome {
    /// The text handed back to the reasoning loop.
    pub fn into_message(self) -> String {
        match self {
            Self::Success(text) | Self::Refused(text) | Self::Recoverable(text) => text,
        }
    }
}
