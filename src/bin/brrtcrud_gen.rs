use brrtcrud::cli::run_cli;
use brrtcrud::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let verbose = std::env::args().any(|arg| arg == "--verbose" || arg == "-v");
    init_logging_with_config(&LogConfig::from_env().verbose(verbose))?;
    run_cli()
}
