use clap::Parser;

use nestegg::cli::{Cli, run};

#[tokio::main]
async fn main() {
    nestegg::telemetry::init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
