//! Command-line configuration.

use clap::Parser;
use playback::Speed;

use crate::commands::Command;
use crate::demos::SessionOptions;
use crate::telemetry::{self, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "simufast", about = "Step-by-step algorithm demos, without a display.", version)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(
        long,
        global = true,
        default_value_t = Speed::MAX,
        help = "Transition speed: 0.25x, 0.5x, normal, 2x, 3x, 5x, max or any positive multiplier"
    )]
    pub speed: Speed,

    #[arg(
        long,
        global = true,
        requires = "interactive",
        help = "Start paused and wait for `play`"
    )]
    pub paused: bool,

    #[arg(
        long,
        short = 'i',
        global = true,
        help = "Read play/pause/speed/replay/quit commands from stdin"
    )]
    pub interactive: bool,

    #[arg(long, global = true, env = "LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CliConfig {
    pub fn session(&self) -> SessionOptions {
        SessionOptions {
            speed: self.speed,
            paused: self.paused,
            interactive: self.interactive,
        }
    }

    /// Run the selected command and print its result to stdout.
    pub fn run(self) -> anyhow::Result<()> {
        telemetry::init_logging(self.log_format).map_err(anyhow::Error::msg)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let outcome = runtime.block_on(self.command.execute(&self.session()));
        // stdin reads of an interactive session block a worker thread.
        runtime.shutdown_background();

        let result = outcome?;
        if self.command.json_output() {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{result}");
        }
        Ok(())
    }
}
