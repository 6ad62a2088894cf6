use anyhow::Result;
use clap::Parser;
use std::{io::Write, sync::Arc, time::Duration};
use tracing::{error, info};

use crate::config::{APP_NAME, APP_VERSION, Config};
use crate::core::{PodSampler, ResourceStore, aggregate, export};
use crate::kubernetes::client::KubernetesClient;

mod cli;
mod config;
mod core;
mod kubernetes;
mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    logging::initialize()?;
    info!("{APP_NAME} v{APP_VERSION} started");

    if let Err(error) = run_application(args).await {
        error!("{APP_NAME} v{APP_VERSION} terminated with an error: {error}");
        Err(error)
    } else {
        info!("{APP_NAME} v{APP_VERSION} stopped");
        Ok(())
    }
}

async fn run_application(args: cli::Args) -> Result<()> {
    let config = Config::load_or_create().await?;
    let namespaces = args.namespaces(&config.namespaces);

    let client = KubernetesClient::new(args.kube_config.as_deref(), args.context.as_deref()).await?;
    info!("connected to kubernetes {} (context '{}')", client.k8s_version(), client.context());

    match args.command {
        cli::Command::Export => run_export(client, namespaces).await,
        cli::Command::Monitor { interval } => {
            run_monitor(client, namespaces, interval.unwrap_or(config.interval)).await
        },
    }
}

/// Runs one polling pass and prints the report, any cluster failure is fatal.
async fn run_export(client: KubernetesClient, namespaces: Vec<String>) -> Result<()> {
    let mut store = ResourceStore::default();
    aggregate(&mut store, &client, &namespaces).await?;

    write_report(&store)
}

/// Polls the cluster until an interrupt or termination signal arrives,
/// then prints the report accumulated over the whole session.
async fn run_monitor(client: KubernetesClient, namespaces: Vec<String>, interval: u64) -> Result<()> {
    let mut sampler = PodSampler::default();
    sampler.start(
        Arc::new(client),
        ResourceStore::default(),
        namespaces,
        Duration::from_secs(interval),
    );

    wait_for_shutdown().await?;
    info!("shutdown requested, stopping the sampler");

    let Some(store) = sampler.stop().await else {
        return Err(anyhow::anyhow!("sampler task panicked, no data to export"));
    };

    write_report(&store)
}

fn write_report(store: &ResourceStore) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    export(store, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => (),
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
