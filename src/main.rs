use std::process::ExitCode;

use lanegraph::cli::{self, Cli};
use lanegraph::ui::output;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the flag-derived
/// default.
fn init_logging(debug: bool) {
    let default = if debug { "lanegraph=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
