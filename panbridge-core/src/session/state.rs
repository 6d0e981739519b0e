//! Session lifecycle states

use std::fmt;

/// Where the session client is in its connect/execute cycle
///
/// ```text
/// Disconnected -> Connecting -> AwaitingShellPrompt -> LaunchingCli -> Ready <-> Busy
///       ^                                                                 |
///       +----------------------- timeout / channel error ----------------+
/// ```
///
/// `Destroyed` is terminal and reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No open channel
    #[default]
    Disconnected,
    /// Opening the transport
    Connecting,
    /// Transport open, waiting for the OS shell prompt
    AwaitingShellPrompt,
    /// `pancli` launched, waiting for its prompt
    LaunchingCli,
    /// Idle at the PanCLI prompt
    Ready,
    /// A command is in flight
    Busy,
    /// Shut down; every request fails
    Destroyed,
}

impl SessionState {
    /// Returns the state name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingShellPrompt => "awaiting-shell-prompt",
            Self::LaunchingCli => "launching-cli",
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Destroyed => "destroyed",
        }
    }

    /// True when a command can be written without connecting first
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// True while a connection attempt is under way
    #[must_use]
    pub const fn is_connecting(&self) -> bool {
        matches!(
            self,
            Self::Connecting | Self::AwaitingShellPrompt | Self::LaunchingCli
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
