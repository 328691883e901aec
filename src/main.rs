use clap::Parser;
use stockdash::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
