use clap::Parser;
use sifat::logging::init_logging;
use sifat::model::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });
    run(cli)
}
