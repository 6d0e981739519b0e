//! Byte-stream transports for the interactive shell
//!
//! The session client only needs one bidirectional stream. Production uses
//! the system `ssh` client with a forced TTY (or `sshpass -e ssh` for
//! password logins); tests plug in an in-memory duplex stream.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::sync::OnceCell;

use crate::error::{SessionError, SessionResult};

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Read half of a shell channel
pub type ChannelReader = Box<dyn AsyncRead + Send + Unpin>;

/// Write half of a shell channel
pub type ChannelWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// One open interactive channel
///
/// Dropping the channel closes both halves and kills the child process,
/// if any.
pub struct ShellChannel {
    /// Output from the remote shell
    pub reader: ChannelReader,
    /// Input to the remote shell
    pub writer: ChannelWriter,
    child: Option<Child>,
}

impl ShellChannel {
    /// Wraps a reader/writer pair
    #[must_use]
    pub fn new(reader: ChannelReader, writer: ChannelWriter) -> Self {
        Self {
            reader,
            writer,
            child: None,
        }
    }

    /// Splits a single bidirectional stream
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Self::new(Box::new(reader), Box::new(writer))
    }

    /// Ties a child process to the channel's lifetime
    #[must_use]
    pub fn with_child(mut self, child: Child) -> Self {
        self.child = Some(child);
        self
    }
}

impl std::fmt::Debug for ShellChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellChannel")
            .field("child", &self.child.as_ref().and_then(Child::id))
            .finish_non_exhaustive()
    }
}

/// Opens interactive channels to the appliance
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a fresh channel; the previous one, if any, is already dropped
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ConnectionFailed` if the channel cannot be opened.
    async fn open(&self) -> SessionResult<ShellChannel>;

    /// Human-readable target, used in logs
    fn describe(&self) -> String;
}

/// Where and how to log in
#[derive(Debug, Clone)]
pub struct SshTarget {
    /// Appliance hostname or IP
    pub host: String,
    /// SSH port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Password, answered through `sshpass`
    pub password: Option<SecretString>,
    /// Private key file
    pub identity_file: Option<PathBuf>,
    /// Passed to ssh as `ConnectTimeout`
    pub connect_timeout: Duration,
}

impl SshTarget {
    /// Creates a target with default port and timeout
    #[must_use]
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            user: user.into(),
            password: None,
            identity_file: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the SSH port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the password
    #[must_use]
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the private key file
    #[must_use]
    pub fn with_identity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Sets the ssh `ConnectTimeout`
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `user@host`, or just the host when no user is set
    #[must_use]
    pub fn destination(&self) -> String {
        if self.user.is_empty() {
            self.host.clone()
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }
}

/// Runs the system `ssh` client with a forced TTY
///
/// Whether `sshpass` is installed is checked on the first `open` and
/// remembered for the lifetime of the transport.
#[derive(Debug)]
pub struct SshProcessTransport {
    target: SshTarget,
    use_sshpass: OnceCell<bool>,
}

impl SshProcessTransport {
    /// Creates the transport without touching the system
    #[must_use]
    pub fn new(target: SshTarget) -> Self {
        Self {
            target,
            use_sshpass: OnceCell::new(),
        }
    }

    /// Builds the `ssh` invocation, wrapped in `sshpass -e` when asked
    #[must_use]
    pub fn command(&self, use_sshpass: bool) -> Command {
        let mut cmd;
        if use_sshpass {
            cmd = Command::new("sshpass");
            cmd.arg("-e").arg("ssh");
            if let Some(ref pw) = self.target.password {
                cmd.env("SSHPASS", pw.expose_secret());
            }
        } else {
            cmd = Command::new("ssh");
            cmd.arg("-o").arg("BatchMode=yes");
        }

        cmd.arg("-tt");
        cmd.arg("-o").arg("StrictHostKeyChecking=no");
        cmd.arg("-o").arg(format!(
            "ConnectTimeout={}",
            self.target.connect_timeout.as_secs().max(1)
        ));
        if self.target.port != DEFAULT_SSH_PORT {
            cmd.arg("-p").arg(self.target.port.to_string());
        }
        if let Some(ref key) = self.target.identity_file {
            cmd.arg("-i").arg(key);
        }
        cmd.arg(self.target.destination());

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Whether password logins go through `sshpass`
    ///
    /// Always false without a password. Otherwise probes `sshpass -V` once.
    pub async fn uses_sshpass(&self) -> bool {
        if self.target.password.is_none() {
            return false;
        }
        *self
            .use_sshpass
            .get_or_init(|| async {
                let found = Command::new("sshpass")
                    .arg("-V")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await
                    .is_ok();
                if !found {
                    tracing::warn!(
                        host = %self.target.host,
                        "Password configured but sshpass is not installed, falling back to key auth"
                    );
                }
                found
            })
            .await
    }
}

#[async_trait]
impl Transport for SshProcessTransport {
    async fn open(&self) -> SessionResult<ShellChannel> {
        let use_sshpass = self.uses_sshpass().await;
        let mut child = self
            .command(use_sshpass)
            .spawn()
            .map_err(|e| SessionError::ConnectionFailed(format!("Failed to spawn ssh: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::ConnectionFailed("ssh stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::ConnectionFailed("ssh stdout unavailable".into()))?;

        tracing::debug!(
            host = %self.target.host,
            port = self.target.port,
            sshpass = use_sshpass,
            "Spawned ssh process"
        );
        Ok(ShellChannel::new(Box::new(stdout), Box::new(stdin)).with_child(child))
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.target.destination(), self.target.port)
    }
}
