mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use playgate_core::config::Config;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting playgate gateway");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!(
        "Serving sessions from {}",
        config.playback.storage_root.display()
    );

    playgate_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "playgate=trace,playgate_server=trace,playgate_core=debug,tower_http=debug".to_string()
        } else {
            "playgate=debug,playgate_server=debug,playgate_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("playgate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateSecret => generate_secret(),
        Commands::MintToken {
            subject,
            session,
            ttl_secs,
            secret,
        } => mint_token(cli.config.as_deref(), &subject, session, ttl_secs, secret),
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!(
        "  Storage root: {}",
        config.playback.storage_root.display()
    );
    println!(
        "  Token secret configured: {}",
        config.playback.token_secret.is_some()
    );
    for warning in config.validate() {
        println!("  ⚠ {warning}");
    }

    Ok(())
}

fn generate_secret() -> Result<()> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    println!("{}", hex::encode(bytes));
    Ok(())
}

fn mint_token(
    config_path: Option<&std::path::Path>,
    subject: &str,
    session: Option<String>,
    ttl_secs: i64,
    secret: Option<String>,
) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let secret = secret
        .or(config.playback.token_secret)
        .ok_or_else(|| anyhow::anyhow!("no signing secret: pass --secret or set playback.token_secret"))?;
    let session = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let token = playgate_server::token::mint(&secret, subject, &session, ttl_secs)?;
    println!("{token}");
    Ok(())
}
