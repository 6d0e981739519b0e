//! Persistent PanCLI session over an interactive SSH shell
//!
//! - [`transport`] opens the byte stream (`ssh -tt` or a test double)
//! - [`prompt`] detects prompts and cleans command output
//! - [`client`] serializes commands through one worker and reconnects
//! - [`retry`] holds the reconnection backoff policy

pub mod client;
pub mod prompt;
pub mod retry;
pub mod state;
pub mod transport;

pub use client::{CommandExecutor, CommandOutput, SessionClient, SessionConfig};
pub use prompt::{Prompt, clean_output};
pub use retry::RetryConfig;
pub use state::SessionState;
pub use transport::{ShellChannel, SshProcessTransport, SshTarget, Transport};
