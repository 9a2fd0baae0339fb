use anyhow::Result;
use bulkdns::Cli;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --log-level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let path = cli.run()?;
    println!("CSV file {} generated", path.display());
    Ok(())
}
