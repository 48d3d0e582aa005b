use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::probe::AudioProbe;

/// Playthroughs shorter than this are treated as a broken player, not a loop
const MIN_PLAYTHROUGH: Duration = Duration::from_secs(1);

/// Outcome of a `start_loop` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MusicStatus {
    Started,
    AlreadyStarted,
    /// File does not exist
    Missing(PathBuf),
    /// File unreadable or player could not be started
    Unavailable(String),
}

impl MusicStatus {
    /// Warning to show the user, if any
    pub fn warning(&self) -> Option<String> {
        match self {
            MusicStatus::Missing(_) => Some("Background music file not found".to_string()),
            MusicStatus::Unavailable(reason) => {
                Some(format!("Could not play background music: {}", reason))
            }
            MusicStatus::Started | MusicStatus::AlreadyStarted => None,
        }
    }
}

/// Background music backend
#[async_trait::async_trait]
pub trait MusicPlayer: Send {
    /// Loop `path` forever; calling again while playing is a no-op
    ///
    /// Never fails: problems are reported through the returned status.
    async fn start_loop(&mut self, path: &Path) -> MusicStatus;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Loops a file through an external player process (ffplay, afplay, paplay...)
///
/// Opt-in alternative to `StreamMusicPlayer` for hosts where the audio
/// device is owned by another program. The player is restarted each time a
/// playthrough ends.
pub struct ProcessMusicPlayer {
    command: Vec<String>,
    supervisor: Option<JoinHandle<()>>,
}

impl ProcessMusicPlayer {
    /// `command` is the player program followed by its leading arguments
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            supervisor: None,
        }
    }
}

fn spawn_player(program: &str, args: &[String], path: &Path) -> std::io::Result<Child> {
    Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
}

#[async_trait::async_trait]
impl MusicPlayer for ProcessMusicPlayer {
    async fn start_loop(&mut self, path: &Path) -> MusicStatus {
        if self.supervisor.is_some() {
            return MusicStatus::AlreadyStarted;
        }

        if !path.is_file() {
            return MusicStatus::Missing(path.to_path_buf());
        }

        let Some((program, args)) = self.command.split_first() else {
            return MusicStatus::Unavailable("no music player configured".to_string());
        };

        if let Err(e) = AudioProbe::open(path) {
            return MusicStatus::Unavailable(format!("{:#}", e));
        }

        let mut child = match spawn_player(program, args, path) {
            Ok(child) => child,
            Err(e) => return MusicStatus::Unavailable(format!("failed to start {}: {}", program, e)),
        };

        info!("Background music started: {} via {}", path.display(), program);

        let program = program.clone();
        let args = args.to_vec();
        let path = path.to_path_buf();

        let supervisor = tokio::spawn(async move {
            loop {
                let started = Instant::now();

                match child.wait().await {
                    Ok(status) if status.success() => {
                        if started.elapsed() < MIN_PLAYTHROUGH {
                            warn!("{} finished immediately, stopping background music", program);
                            break;
                        }
                        debug!("Background music playthrough finished, restarting");
                    }
                    Ok(status) => {
                        warn!("{} exited with {}, stopping background music", program, status);
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to wait for {}: {}", program, e);
                        break;
                    }
                }

                child = match spawn_player(&program, &args, &path) {
                    Ok(child) => child,
                    Err(e) => {
                        warn!("Failed to restart {}: {}", program, e);
                        break;
                    }
                };
            }
        });

        self.supervisor = Some(supervisor);

        MusicStatus::Started
    }

    fn name(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or("none")
    }
}

impl Drop for ProcessMusicPlayer {
    fn drop(&mut self) {
        // Aborting drops the child, and kill_on_drop stops the player
        if let Some(supervisor) = self.supervisor.take() {
            supervisor.abort();
        }
    }
}
