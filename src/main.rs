//! codeshelf - store, tag and search code snippets from the terminal.

use clap::Parser;
use codeshelf::cli::{self, Cli};
use env_logger::{Builder, Env};
use log::error;

fn init_logger() {
    // RUST_LOG overrides, e.g. RUST_LOG=debug codeshelf list
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logger();

    let args = Cli::parse();
    if let Err(e) = cli::execute(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
