//! Scripted in-memory appliance
//!
//! `FakeAppliance` implements `Transport` over `tokio::io::duplex`. Each
//! `open` starts a fresh login: a shell banner ending in `$ `, then the
//! PanCLI banner and prompt once `pancli` arrives. Commands are answered
//! from a table; unknown commands print an error line.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use panbridge_core::error::{SessionError, SessionResult};
use panbridge_core::session::{ShellChannel, Transport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};

const PROMPT: &str = "[pancli] ";

#[derive(Debug, Clone, Default)]
struct Reply {
    output: String,
    delay: Duration,
    confirm: bool,
    /// Write the response this many bytes at a time; 0 writes it whole
    piece: usize,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, Reply>,
    hang_once: HashSet<String>,
    received: Vec<String>,
    refuse_opens: usize,
}

/// In-memory appliance shared by every channel it opens
#[derive(Clone, Default)]
pub struct FakeAppliance {
    script: Arc<Mutex<Script>>,
    opens: Arc<AtomicUsize>,
    overlaps: Arc<AtomicUsize>,
}

impl FakeAppliance {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answers `command` with `output`
    pub fn respond(&self, command: &str, output: &str) -> &Self {
        self.respond_after(command, output, Duration::ZERO)
    }

    /// Answers `command` with `output` after `delay`
    pub fn respond_after(&self, command: &str, output: &str, delay: Duration) -> &Self {
        self.script().replies.insert(
            command.to_string(),
            Reply {
                output: output.to_string(),
                delay,
                confirm: false,
                piece: 0,
            },
        );
        self
    }

    /// Asks for confirmation before answering `command` with `output`
    pub fn respond_with_confirmation(&self, command: &str, output: &str) -> &Self {
        self.script().replies.insert(
            command.to_string(),
            Reply {
                output: output.to_string(),
                delay: Duration::ZERO,
                confirm: true,
                piece: 0,
            },
        );
        self
    }

    /// Answers `command` in `piece`-byte writes with a pause between them,
    /// so the echo, the output and the prompt arrive split across reads
    pub fn respond_in_pieces(&self, command: &str, output: &str, piece: usize) -> &Self {
        self.script().replies.insert(
            command.to_string(),
            Reply {
                output: output.to_string(),
                delay: Duration::ZERO,
                confirm: false,
                piece,
            },
        );
        self
    }

    /// Echoes `command` once without ever printing the prompt
    pub fn hang_once(&self, command: &str) -> &Self {
        self.script().hang_once.insert(command.to_string());
        self
    }

    /// Fails the next `count` opens
    pub fn refuse_opens(&self, count: usize) -> &Self {
        self.script().refuse_opens = count;
        self
    }

    /// Every line received after PanCLI started, in order
    pub fn received(&self) -> Vec<String> {
        self.script().received.clone()
    }

    /// Received lines that match `command`
    pub fn count(&self, command: &str) -> usize {
        self.received().iter().filter(|c| *c == command).count()
    }

    /// Channels opened so far, refused ones excluded
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Times a command arrived while another was still being answered
    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    async fn serve(self, stream: DuplexStream) {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = BufReader::new(reader).lines();

        if writer.write_all(b"Last login: today\r\nadmin@vch-1 ~]$ ").await.is_err() {
            return;
        }

        let mut cli = false;
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !cli {
                if line == "pancli" {
                    cli = true;
                    let banner = format!("pancli\r\nPanCLI 11.0\r\nRealm: lab\r\n{PROMPT}");
                    if writer.write_all(banner.as_bytes()).await.is_err() {
                        return;
                    }
                }
                continue;
            }
            if !self.answer(&line, &mut lines, &mut writer).await {
                return;
            }
        }
    }

    /// Returns false once the client side is gone
    async fn answer(
        &self,
        command: &str,
        lines: &mut tokio::io::Lines<BufReader<ReadHalf<DuplexStream>>>,
        writer: &mut WriteHalf<DuplexStream>,
    ) -> bool {
        let (reply, hang) = {
            let mut script = self.script();
            script.received.push(command.to_string());
            let hang = script.hang_once.remove(command);
            (script.replies.get(command).cloned(), hang)
        };

        if hang {
            return writer
                .write_all(format!("{command}\r\nworking...\r\n").as_bytes())
                .await
                .is_ok();
        }

        let reply = reply.unwrap_or_else(|| Reply {
            output: format!("Error: unknown command '{command}'"),
            ..Reply::default()
        });

        if !reply.delay.is_zero() {
            tokio::select! {
                () = tokio::time::sleep(reply.delay) => {}
                _ = lines.next_line() => {
                    self.overlaps.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        if reply.confirm {
            let question = format!("{command}\r\nAre you sure? {PROMPT}");
            if writer.write_all(question.as_bytes()).await.is_err() {
                return false;
            }
            match lines.next_line().await {
                Ok(Some(answer)) if answer.trim() == "y" => {}
                _ => return false,
            }
            let done = format!("y\r\n{}\r\n{PROMPT}", reply.output);
            return writer.write_all(done.as_bytes()).await.is_ok();
        }

        let response = format!("{command}\r\n{}\r\n{PROMPT}", reply.output);
        if reply.piece == 0 {
            return writer.write_all(response.as_bytes()).await.is_ok();
        }
        for chunk in response.as_bytes().chunks(reply.piece) {
            if writer.write_all(chunk).await.is_err() || writer.flush().await.is_err() {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        true
    }
}

#[async_trait]
impl Transport for FakeAppliance {
    async fn open(&self) -> SessionResult<ShellChannel> {
        {
            let mut script = self.script();
            if script.refuse_opens > 0 {
                script.refuse_opens -= 1;
                return Err(SessionError::ConnectionFailed("connection refused".into()));
            }
        }
        self.opens.fetch_add(1, Ordering::SeqCst);

        let (client, server) = tokio::io::duplex(64 * 1024);
        tokio::spawn(self.clone().serve(server));
        Ok(ShellChannel::from_stream(client))
    }

    fn describe(&self) -> String {
        "fake-appliance:22".into()
    }
}
