//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chatstream
#[derive(Parser, Debug)]
#[command(name = "chatstream")]
#[command(author, version, about = "Streaming chat with Claude, with inline matplotlib rendering")]
#[command(long_about = r#"
Chatstream holds a conversation with an Anthropic model and streams each reply
as it is generated. Python blocks that use `%matplotlib inline` are executed
and their figures shown inline.

Configuration files are loaded from (in priority order):
1. CHATSTREAM_* environment variables
2. --config <path>          Explicit config file
3. ./chatstream.toml        Project-level config
4. ~/.config/chatstream/config.toml   Global config

The API key is read from ANTHROPIC_API_KEY (or MY_ANTHROPIC_API_KEY); a .env
file in the working directory is honoured.

Example:
  chatstream
  chatstream --temperature 0.7 --max-tokens 8000
  chatstream -m opus "Plot a sine wave with matplotlib"
"#)]
pub struct Cli {
    /// Send one message, print the reply and exit (interactive when omitted)
    pub message: Option<String>,

    /// Model identifier or alias (sonnet, opus, haiku)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 1.0
    #[arg(short, long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Upper bound on reply length in tokens
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// System instruction sent with every turn
    #[arg(long, value_name = "TEXT")]
    pub system: Option<String>,

    /// Text every reply is forced to begin with
    #[arg(long, value_name = "TEXT")]
    pub prefill: Option<String>,

    /// Do not execute plot blocks
    #[arg(long)]
    pub no_render: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Debug logging (same as -vv)
    #[arg(long)]
    pub debug: bool,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Effective verbosity, with `--debug` counting as `-vv`.
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}
