use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playgate")]
#[command(author, version, about = "Token-gated HLS playback delivery gateway")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the delivery gateway
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,

    /// Generate a random signing secret for playback tokens
    GenerateSecret,

    /// Mint a development playback token for a transcode session
    MintToken {
        /// Owning subject id to embed in the token
        #[arg(long)]
        subject: String,

        /// Session id to embed (random UUID when omitted)
        #[arg(long)]
        session: Option<String>,

        /// Token lifetime in seconds
        #[arg(long, default_value = "86400")]
        ttl_secs: i64,

        /// Signing secret (defaults to the configured one)
        #[arg(long)]
        secret: Option<String>,
    },
}
