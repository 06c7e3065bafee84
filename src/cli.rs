//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};

/// Red envelope cover generator: prompt-composing proxy and session client.
#[derive(Parser, Debug)]
#[command(name = "redcover", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve `POST /api/generate`.
    Serve {
        /// Address to bind (e.g., 127.0.0.1:3000).
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Generate covers through a running server and save them.
    Generate(GenerateArgs),
    /// List a mode's suggestions and setting choices.
    Options {
        /// Mode to describe: image, avatar.
        #[arg(short, long, default_value = "image")]
        mode: String,
    },
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text prompt describing the cover.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Generation mode: image, avatar.
    #[arg(short, long, default_value = "image")]
    pub mode: String,

    /// Visual style (e.g., artistic, vintage; cartoon and anime in avatar mode).
    #[arg(long)]
    pub style: Option<String>,

    /// Background (e.g., studio, gradient).
    #[arg(long)]
    pub background: Option<String>,

    /// Lighting (soft, dramatic, natural, studio).
    #[arg(long)]
    pub lighting: Option<String>,

    /// Pose (headshot, half-body, full-body, profile; bust in avatar mode).
    #[arg(long)]
    pub pose: Option<String>,

    /// Aspect ratio (1:1, 9:16, 16:9, 4:3, 3:4).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Resolution (e.g., 1024x1024).
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Extra terms to avoid.
    #[arg(short, long)]
    pub negative_prompt: Option<String>,

    /// Server base URL.
    #[arg(long)]
    pub server: Option<String>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of covers to generate in one session (1-10).
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub count: u32,
}

impl GenerateArgs {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path).map(|s| s.trim().to_string())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}
