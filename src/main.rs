mod cli;
mod config;
mod error;
mod fixtures;
mod history;
mod http;
mod probe;
mod scenarios;
mod testing;

use clap::Parser;
use tracing::{error, info};

use cli::Cli;
use config::{HarnessConfig, LogConfig};
use error::CliError;
use http::client::build_client;
use probe::HttpProbe;
use scenarios::{Suite, SuiteSettings};
use testing::report::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            error!(error = %err, "company-contract aborted");
            eprintln!("error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}

/// `Ok(true)` when every scenario passed.
async fn run(cli: &Cli) -> Result<bool, CliError> {
    let mut config = HarnessConfig::load(cli.config.as_deref()).await?;
    cli.apply_to(&mut config);
    config.validate()?;

    init_tracing(&config.log);
    info!(
        base_url = %config.target.base_url,
        seed = ?config.fixtures.seed,
        "company-contract starting"
    );

    let client = build_client(config.target.timeout())?;
    let probe = HttpProbe::new(client, &config.target.base_url)?;

    let suite = Suite::new(SuiteSettings {
        nonexistent_id: config.scenarios.nonexistent_id.clone(),
        invalid_id_token: config.scenarios.invalid_id_token.clone(),
        seed: config.fixtures.seed,
        show_requests: cli.show_requests,
    });
    let report = suite.run(&probe).await;

    OutputWriter::new(cli.output).render(&report)?;
    Ok(report.all_passed())
}

/// Logs go to stderr so the report on stdout stays parseable.
fn init_tracing(log: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::new(&log.level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if log.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
