use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use watchman::{
    alerter::PagerDutySink,
    config::{Config, DEFAULT_CONFIG_NAME},
    incident::IncidentEvaluator,
    probe::Prober,
    scheduler::{self, MonitorContext},
    target::Target,
};

/// Timeout das chamadas à Events API.
const SINK_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    // Inicializa o sistema de logging (tracing); RUST_LOG sobrescreve o nível
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("Falha no startup: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Carrega a configuração (arquivo passado como argumento ou ./watchman.*)
    let config_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());
    let config = Config::load(&config_name)
        .with_context(|| format!("carregando configuração '{config_name}'"))?;
    info!("Configuração carregada: {} checks", config.checks.len());

    let targets: Vec<Target> = config.checks.iter().map(Target::from).collect();

    let ctx = MonitorContext {
        source: config.resolve_source(),
        interval: config.interval(),
    };
    let evaluator = IncidentEvaluator::new(config.fail_threshold);
    info!(
        "Identidade do host: {}; intervalo: {:?}; fail_threshold: {}",
        ctx.source,
        ctx.interval,
        evaluator.fail_threshold()
    );

    let prober = Prober::new(config.timeout()).context("criando cliente HTTP das checagens")?;
    let sink_client = reqwest::Client::builder()
        .timeout(SINK_TIMEOUT)
        .build()
        .context("criando cliente HTTP da Events API")?;
    let sink = PagerDutySink::new(sink_client, config.events_url.clone());

    info!("Iniciando os trabalhos");
    tokio::select! {
        _ = scheduler::run_scheduler(ctx, prober, evaluator, Box::new(sink), targets) => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("aguardando sinal de encerramento")?;
            info!("Sinal recebido, encerrando.");
        }
    }
    Ok(())
}
