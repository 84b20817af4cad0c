//! `force`: fetch Salesforce metadata into a local directory and import it back.
//!
//! ```sh
//! export SF_INSTANCE_URL='https://na1.salesforce.com'
//! export SF_ACCESS_TOKEN='00D...'
//! force fetch CustomObject Book__c Author__c
//! force import -checkonly -v
//! ```

use anyhow::Context;
use busbar_sf_force::cli::{self, Command};
use busbar_sf_force::sync::{self, ErrorKind};
use busbar_sf_force::{Session, SyncConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        let usage = e
            .downcast_ref::<sync::Error>()
            .is_some_and(|e| matches!(e.kind, ErrorKind::Usage(_)));
        if usage {
            eprintln!("Run 'force help' for usage.");
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let command = Command::parse(&args, &cwd)?;

    if command == Command::Help {
        print!("{}", cli::USAGE);
        return Ok(());
    }

    // The session is built once here and handed to every command.
    let session = Session::from_env()?;
    let remote = session.connect(&SyncConfig::from_env()?);

    let mut stdout = std::io::stdout().lock();
    cli::run(&remote, &command, &mut stdout).await
}
