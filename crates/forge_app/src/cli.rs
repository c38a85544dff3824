use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forge_core::Stack;

use crate::platform::config::Overrides;
use crate::platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "uiforge",
    version,
    about = "Describe a UI component, get a single runnable HTML file back"
)]
pub struct Args {
    /// RON config file; defaults to the user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Where preview pages are written.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interactive session (the default).
    Session {
        #[arg(long)]
        stack: Option<Stack>,
    },
    /// Generate once and print the extracted code to stdout.
    Generate {
        description: String,
        #[arg(long)]
        stack: Option<Stack>,
        /// Open the result in a full-window preview.
        #[arg(long, default_value_t = false)]
        open: bool,
        /// Also render the inline preview panel page.
        #[arg(long, default_value_t = false)]
        panel: bool,
    },
    /// List the supported stacks.
    Stacks,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}
