use anyhow::Result;
use clap::Parser;
use dvsweep_application::Reconciler;
use dvsweep_infrastructure::{KibanaClient, SmtpNotifier, config};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Audits empty Kibana data views and reconciles them against their
/// archival counterparts. All configuration comes from the config file and
/// the environment; there are no run-parameterizing flags.
#[derive(Parser)]
#[command(name = "dvsweep")]
#[command(about = "Deletes empty Kibana data views that have an archival counterpart, alerts on those that do not", long_about = None)]
#[command(version)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let sweep_config = config::resolve()?;

    let gateway = Arc::new(KibanaClient::new(
        &sweep_config.kibana,
        Duration::from_secs(sweep_config.request_timeout_secs),
    ));
    let notifier = Arc::new(SmtpNotifier::new(&sweep_config.smtp)?);

    let reconciler = Reconciler::new(gateway, notifier, sweep_config);
    let report = reconciler.run().await?;

    print!("{}", report.render_trace());
    Ok(())
}
