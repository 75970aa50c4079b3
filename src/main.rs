use clap::Parser;
use sidenav::cli::{self, Args};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = cli::run(&Args::parse());
    if let Err(e) = &result {
        log::error!("{}", e);
    }
    ExitCode::from(cli::exit_status(&result))
}
