//! Interactive session control.

use std::str::FromStr;

use playback::{PlaybackHandle, Speed};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Play,
    Pause,
    Toggle,
    SetSpeed(Speed),
    Replay,
    Status,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Err("empty command".to_string());
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "play" | "resume" => ControlCommand::Play,
            "pause" => ControlCommand::Pause,
            "toggle" | "p" => ControlCommand::Toggle,
            "speed" => {
                let value = parts
                    .next()
                    .ok_or_else(|| "usage: speed <multiplier>, e.g. `speed 2x`".to_string())?;
                let speed = value
                    .parse()
                    .map_err(|e: playback::PlaybackError| e.to_string())?;
                ControlCommand::SetSpeed(speed)
            }
            "replay" => ControlCommand::Replay,
            "status" => ControlCommand::Status,
            "quit" | "exit" | "q" => ControlCommand::Quit,
            other => return Err(format!("unknown command `{other}`")),
        };
        if let Some(extra) = parts.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }
        Ok(command)
    }
}

impl ControlCommand {
    /// Apply to the session. Returns `false` for `quit`.
    pub fn apply(&self, handle: &PlaybackHandle) -> bool {
        match self {
            ControlCommand::Play => handle.play(),
            ControlCommand::Pause => handle.pause(),
            ControlCommand::Toggle => handle.toggle(),
            ControlCommand::SetSpeed(speed) => handle.set_speed(*speed),
            ControlCommand::Replay => {
                if handle.state().status.is_finished() {
                    handle.play();
                } else {
                    warn!("replay is available once the run has finished");
                }
            }
            ControlCommand::Status => {
                let state = handle.state();
                info!(
                    status = %state.status,
                    progress = %state.progress,
                    speed = %state.speed,
                    playing = state.playing,
                    "session"
                );
            }
            ControlCommand::Quit => return false,
        }
        true
    }
}

/// Why [`read_commands`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// The user typed `quit`.
    Quit,
    /// The input reached end of file.
    Closed,
}

/// Apply commands read from `input` until `quit` or end of input.
pub async fn read_commands<R>(input: R, handle: PlaybackHandle) -> std::io::Result<InputEnd>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<ControlCommand>() {
            Ok(command) => {
                debug!(?command, "control command");
                if !command.apply(&handle) {
                    return Ok(InputEnd::Quit);
                }
            }
            Err(err) => warn!("{err}"),
        }
    }
    debug!("control input closed");
    Ok(InputEnd::Closed)
}
