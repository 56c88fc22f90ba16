//! `aragon-env` entry point.
//!
//! ```sh
//! aragon-env apm publish --environment rinkeby   # print the resolved configuration
//! ```

use aragon_env::cmd::{self, Cli};
use aragon_env::telemetry::Telemetry;
use clap::Parser;
use dotenvy::dotenv;

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let telemetry = Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_log_level(if cli.debug { "debug" } else { "info" })
        .register();

    let result = cmd::resolve::run(&cli);
    drop(telemetry);

    if let Err(e) = result {
        if !e.is_reported() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
