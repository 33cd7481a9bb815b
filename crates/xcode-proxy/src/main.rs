//! `xcode-proxy` binary entrypoint.

use clap::Parser;
use colored::Colorize;
use xcode_proxy::{serve, Cli};
use xcode_proxy_config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Respect `RUST_LOG` if set; otherwise info with quiet transport crates.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,reqwest=warn,hyper=warn")
                }),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings_sources());
    let bind = cli.bind_address(&settings.server);

    println!(
        "{} http://{}:{} ({} models)",
        "Starting Xcode Proxy Server on".green().bold(),
        bind.host,
        bind.port,
        settings.model_count()
    );

    serve(settings, bind).await
}
