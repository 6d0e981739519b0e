//! The serialized PanCLI session client
//!
//! [`SessionClient`] owns one interactive channel through a single worker
//! task. Callers submit requests over an unbounded queue and await a
//! oneshot reply, so any number of tasks may call [`SessionClient::execute`]
//! concurrently while exactly one command is on the wire at a time, in
//! submission order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use super::prompt::{self, CONFIRM_REPLY, LAUNCH_COMMAND, Prompt};
use super::retry::RetryConfig;
use super::state::SessionState;
use super::transport::{ShellChannel, Transport};
use crate::error::{SessionError, SessionResult};
use crate::tracing::span_names::{SESSION_CONNECT, SESSION_EXECUTE};

/// Default timeout for opening the channel
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for each prompt wait after a command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters of buffered output kept in timeout errors
const TIMEOUT_TAIL_CHARS: usize = 200;

const READ_CHUNK: usize = 4096;

/// Timeouts and retry policy for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Budget for opening the channel
    pub connect_timeout: Duration,
    /// Budget for each prompt wait, the two login prompts included
    pub command_timeout: Duration,
    /// Reconnection policy
    pub retry: RetryConfig,
    /// Command typed at the shell prompt to start PanCLI
    pub launch_command: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            retry: RetryConfig::default(),
            launch_command: LAUNCH_COMMAND.to_string(),
        }
    }
}

impl SessionConfig {
    /// Sets the connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the command timeout
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Sets the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the command that starts PanCLI
    #[must_use]
    pub fn with_launch_command(mut self, command: impl Into<String>) -> Self {
        self.launch_command = command.into();
        self
    }
}

/// Cleaned output of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Output without echo, prompt or terminal codes
    pub output: String,
    /// Time from write to final prompt
    pub duration: Duration,
}

/// Something that runs PanCLI commands
///
/// Domain services and the performance accumulator depend on this rather
/// than on [`SessionClient`] directly.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs a command and returns its cleaned output
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the session cannot connect, the prompt
    /// does not return in time, or the client was destroyed.
    async fn execute(&self, command: &str) -> SessionResult<CommandOutput>;

    /// Runs a command that asks for confirmation and answers `y`
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    async fn execute_with_confirmation(&self, command: &str) -> SessionResult<CommandOutput>;
}

struct CommandRequest {
    command: String,
    confirm: bool,
    reply: oneshot::Sender<SessionResult<CommandOutput>>,
}

enum WorkerMessage {
    Connect(oneshot::Sender<SessionResult<()>>),
    Run(CommandRequest),
}

/// Client for one PanCLI session
///
/// Must be created inside a Tokio runtime. Dropping the client destroys it.
pub struct SessionClient {
    queue: mpsc::UnboundedSender<WorkerMessage>,
    state: watch::Receiver<SessionState>,
    shutdown: watch::Sender<bool>,
    destroyed: AtomicBool,
    target: String,
}

impl SessionClient {
    /// Starts the worker; no connection is made until the first request
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::Disconnected);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let target = transport.describe();

        let worker = Worker {
            transport,
            config,
            channel: None,
            state: state_tx,
        };
        tokio::spawn(worker.run(queue_rx, shutdown_rx));

        Self {
            queue: queue_tx,
            state: state_rx,
            shutdown: shutdown_tx,
            destroyed: AtomicBool::new(false),
            target,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Receiver that observes every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// The transport's description of the appliance
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Connects once, without retries; no-op when already connected
    ///
    /// # Errors
    ///
    /// Returns the connection error; the session stays `Disconnected`.
    pub async fn connect(&self) -> SessionResult<()> {
        if self.is_destroyed() {
            return Err(SessionError::Destroyed);
        }
        let (reply, rx) = oneshot::channel();
        self.queue
            .send(WorkerMessage::Connect(reply))
            .map_err(|_| SessionError::Destroyed)?;
        rx.await.map_err(|_| SessionError::WorkerGone)?
    }

    async fn submit(&self, command: &str, confirm: bool) -> SessionResult<CommandOutput> {
        if self.is_destroyed() {
            return Err(SessionError::Destroyed);
        }
        let (reply, rx) = oneshot::channel();
        let request = CommandRequest {
            command: command.to_string(),
            confirm,
            reply,
        };
        self.queue
            .send(WorkerMessage::Run(request))
            .map_err(|_| SessionError::Destroyed)?;
        rx.await.map_err(|_| SessionError::WorkerGone)?
    }

    /// Shuts the session down
    ///
    /// Queued and in-flight requests fail with `SessionError::Destroyed`,
    /// and so does every later call. The channel is released by the worker.
    pub fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::SeqCst) {
            tracing::info!(host = %self.target, "Destroying session client");
            self.shutdown.send_replace(true);
        }
    }

    /// Returns true once [`destroy`](Self::destroy) has been called
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Waits until the worker has released the channel after `destroy`
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == SessionState::Destroyed).await;
    }
}

#[async_trait]
impl CommandExecutor for SessionClient {
    async fn execute(&self, command: &str) -> SessionResult<CommandOutput> {
        self.submit(command, false).await
    }

    async fn execute_with_confirmation(&self, command: &str) -> SessionResult<CommandOutput> {
        self.submit(command, true).await
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Resolves once shutdown is requested or the client is gone
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

struct Worker {
    transport: Arc<dyn Transport>,
    config: SessionConfig,
    channel: Option<ShellChannel>,
    state: watch::Sender<SessionState>,
}

impl Worker {
    async fn run(
        mut self,
        mut queue: mpsc::UnboundedReceiver<WorkerMessage>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let message = tokio::select! {
                biased;
                () = shutdown_requested(&mut shutdown) => break,
                message = queue.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            match message {
                WorkerMessage::Connect(reply) => {
                    let result = tokio::select! {
                        biased;
                        () = shutdown_requested(&mut shutdown) => Err(SessionError::Destroyed),
                        result = self.connect_if_needed() => result,
                    };
                    let _ = reply.send(result);
                }
                WorkerMessage::Run(request) => {
                    let result = tokio::select! {
                        biased;
                        () = shutdown_requested(&mut shutdown) => Err(SessionError::Destroyed),
                        result = self
                            .execute(&request.command, request.confirm)
                            .instrument(tracing::debug_span!(SESSION_EXECUTE, command = %request.command)) => result,
                    };
                    let _ = request.reply.send(result);
                }
            }
        }

        queue.close();
        let mut rejected = 0_usize;
        while let Ok(message) = queue.try_recv() {
            rejected += 1;
            match message {
                WorkerMessage::Connect(reply) => {
                    let _ = reply.send(Err(SessionError::Destroyed));
                }
                WorkerMessage::Run(request) => {
                    let _ = request.reply.send(Err(SessionError::Destroyed));
                }
            }
        }
        self.channel = None;
        self.set_state(SessionState::Destroyed);
        tracing::debug!(rejected, "Session worker stopped");
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            tracing::trace!(from = %previous, to = %state, "Session state changed");
        }
    }

    fn is_connected(&self) -> bool {
        self.channel.is_some() && self.state.borrow().is_ready()
    }

    fn disconnect(&mut self) {
        self.channel = None;
        self.set_state(SessionState::Disconnected);
    }

    async fn connect_if_needed(&mut self) -> SessionResult<()> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect_once().await
    }

    /// One full login: open, shell prompt, launch PanCLI, PanCLI prompt
    async fn connect_once(&mut self) -> SessionResult<()> {
        let target = self.transport.describe();
        self.channel = None;
        self.set_state(SessionState::Connecting);

        let span = tracing::info_span!(SESSION_CONNECT, host = %target);
        let result = self.login().instrument(span).await;
        match result {
            Ok(banner) => {
                tracing::info!(host = %target, "PanCLI ready");
                for line in prompt::banner_lines(&banner) {
                    tracing::info!(host = %target, "  {line}");
                }
                self.set_state(SessionState::Ready);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(host = %target, error = %e, "Connection attempt failed");
                self.disconnect();
                Err(e)
            }
        }
    }

    async fn login(&mut self) -> SessionResult<String> {
        let connect_timeout = self.config.connect_timeout;
        let channel = tokio::time::timeout(connect_timeout, self.transport.open())
            .await
            .map_err(|_| SessionError::ConnectTimeout(connect_timeout))??;
        let channel = self.channel.insert(channel);

        self.state.send_replace(SessionState::AwaitingShellPrompt);
        read_until(channel, Prompt::Shell, self.config.command_timeout).await?;
        tracing::debug!("Shell prompt received, launching PanCLI");

        write_line(channel, &self.config.launch_command).await?;
        self.state.send_replace(SessionState::LaunchingCli);
        read_until(channel, Prompt::Cli, self.config.command_timeout).await
    }

    /// Connects with the retry policy when not already connected
    async fn ensure_connected(&mut self) -> SessionResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        let retry = self.config.retry.clone();
        let attempts = retry.attempts();
        let mut last_error = String::new();
        for attempt in 0..attempts {
            if let Some(delay) = retry.delay_for_attempt(attempt)
                && !delay.is_zero()
            {
                tracing::info!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnecting"
                );
                tokio::time::sleep(delay).await;
            }
            match self.connect_once().await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(SessionError::ReconnectExhausted {
            attempts,
            last_error,
        })
    }

    async fn execute(&mut self, command: &str, confirm: bool) -> SessionResult<CommandOutput> {
        self.ensure_connected().await?;
        self.set_state(SessionState::Busy);

        let start = Instant::now();
        let result = self.exchange(command, confirm).await;
        let duration = start.elapsed();

        match result {
            Ok(raw) => {
                self.set_state(SessionState::Ready);
                tracing::debug!(
                    command,
                    duration_ms = duration.as_millis() as u64,
                    "Command completed"
                );
                Ok(CommandOutput {
                    output: prompt::clean_output(&raw, command),
                    duration,
                })
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "Command failed");
                if e.invalidates_session() {
                    self.disconnect();
                } else {
                    self.set_state(SessionState::Ready);
                }
                Err(e)
            }
        }
    }

    async fn exchange(&mut self, command: &str, confirm: bool) -> SessionResult<String> {
        let timeout = self.config.command_timeout;
        let channel = self.channel.as_mut().ok_or(SessionError::ChannelClosed)?;

        write_line(channel, command).await?;
        let mut output = read_until(channel, Prompt::Cli, timeout).await?;
        if confirm {
            write_line(channel, CONFIRM_REPLY).await?;
            output.push_str(&read_until(channel, Prompt::Cli, timeout).await?);
        }
        Ok(output)
    }
}

async fn write_line(channel: &mut ShellChannel, line: &str) -> SessionResult<()> {
    channel.writer.write_all(line.as_bytes()).await?;
    channel.writer.write_all(b"\n").await?;
    channel.writer.flush().await?;
    Ok(())
}

/// Reads until `prompt` matches the accumulated output
async fn read_until(
    channel: &mut ShellChannel,
    prompt: Prompt,
    timeout: Duration,
) -> SessionResult<String> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    match tokio::time::timeout(timeout, fill_until(channel, prompt, &mut buffer)).await {
        Ok(result) => result.map(|()| String::from_utf8_lossy(&buffer).into_owned()),
        Err(_) => Err(SessionError::PromptTimeout {
            pattern: prompt.pattern().to_string(),
            waited: timeout,
            tail: prompt::tail(&String::from_utf8_lossy(&buffer), TIMEOUT_TAIL_CHARS),
        }),
    }
}

async fn fill_until(
    channel: &mut ShellChannel,
    prompt: Prompt,
    buffer: &mut Vec<u8>,
) -> SessionResult<()> {
    let mut chunk = [0_u8; READ_CHUNK];
    loop {
        let n = channel.reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(SessionError::ChannelClosed);
        }
        buffer.extend_from_slice(&chunk[..n]);
        if prompt.is_match(&String::from_utf8_lossy(buffer)) {
            return Ok(());
        }
    }
}
