use clap::Parser;
use pipestore::cli::{Cli, Commands, boot_command, scan_command};
use pipestore::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match args.cmd {
        Commands::Scan {
            scan_package,
            profiles,
        } => {
            scan_command(scan_package, profiles)?;
        }
        Commands::Boot {
            config,
            scan_package,
            profiles,
        } => {
            boot_command(config, scan_package, profiles).await?;
        }
    }
    Ok(())
}
