use clap::Parser;
use reframe::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    run(&cli, &cwd).await?;
    Ok(())
}
