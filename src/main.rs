//! `fabric-deploy` 바이너리 진입점.

use fabric_deploy::interface::cli::{AppComposition, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse_options();

    let composition = match AppComposition::from_env() {
        Ok(composition) => composition,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = composition.deploy_usecase().execute(options).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
