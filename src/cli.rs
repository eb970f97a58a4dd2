use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "fidframe",
    about = "Deterministic trait selection and layered frame art for numeric identifiers",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/fidframe/logs/fidframe.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to fidframe.yaml config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write config, built-in traits.yaml and fragments
    Init {
        /// Directory to initialize (defaults to ~/.config/fidframe)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Show the traits chosen for an identifier
    Select {
        /// Identifier (non-numeric input is treated as 0)
        fid: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the attribute document for an identifier
    Metadata {
        /// Identifier (non-numeric input is treated as 0)
        fid: String,

        /// Image URL template, `{id}` is replaced with the identifier
        #[arg(long)]
        image: Option<String>,

        /// Output format (json or yaml; default json)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Compose the SVG document for an identifier
    Compose {
        /// Identifier (non-numeric input is treated as 0)
        fid: String,

        /// Write to file instead of stdout
        #[arg(long, short = 'O')]
        output: Option<PathBuf>,
    },

    /// Rasterize the composed image to PNG
    Render {
        /// Identifier (non-numeric input is treated as 0)
        fid: String,

        /// Edge length in pixels (capped by raster.max_size)
        #[arg(long, short = 's')]
        size: Option<u32>,

        /// Write to file instead of stdout
        #[arg(long, short = 'O')]
        output: Option<PathBuf>,
    },

    /// Render a range of identifiers into a directory
    Batch {
        /// First identifier
        from: u64,

        /// Last identifier (inclusive)
        to: u64,

        /// Output directory
        #[arg(long)]
        out_dir: PathBuf,

        /// Write PNG as well as SVG
        #[arg(long)]
        png: bool,

        /// Edge length for PNG output
        #[arg(long, short = 's')]
        size: Option<u32>,

        /// Worker threads (default: number of CPUs)
        #[arg(long, short = 'j')]
        jobs: Option<usize>,
    },

    /// Check configuration, trait tables and fragment coverage
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}
