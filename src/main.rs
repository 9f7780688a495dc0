use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use mccontrol::{McControlApp, McControlConfig};

#[derive(Parser, Debug)]
#[command(name = "mccontrol")]
#[command(about = "Start, stop and probe a single game server container")]
#[command(version)]
#[command(long_about = "Dashboard backend for one named container. Serves a small web page, \
toggles the container between running and stopped through the Docker API, and reports whether \
the game server port accepts TCP connections.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "mccontrol.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the server")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - connect to Docker but don't serve
    #[arg(long, help = "Load configuration and connect to Docker, then exit")]
    dry_run: bool,

    /// Print one status report as JSON and exit
    #[arg(long, help = "Build a single status report, print it as JSON and exit")]
    status: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting mccontrol v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match McControlConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded successfully from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if args.validate_config {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let app = McControlApp::connect(config).map_err(|e| {
        error!("Failed to connect to container runtime: {}", e);
        e
    })?;

    if args.dry_run {
        info!("Dry run mode - runtime client created, not serving");
        println!("✓ Dry run completed successfully");
        return Ok(());
    }

    if args.status {
        let report = app.status_report().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let reason = app.run().await.map_err(|e| {
        error!("Server error: {}", e);
        e
    })?;

    info!("mccontrol exited: {:?}", reason);
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mccontrol={},tower_http={}", log_level, log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# mccontrol configuration file");
    println!("# Every key is optional; MCCONTROL_<SECTION>__<KEY> environment variables override the file");
    println!();
    println!("{}", toml::to_string_pretty(&McControlConfig::default())?);
    Ok(())
}
