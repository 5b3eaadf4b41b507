// src/scheduler.rs

use crate::alerter::{AlertError, AlertSink, TriggerEvent};
use crate::incident::IncidentEvaluator;
use crate::probe::Prober;
use crate::target::Target;
use crate::types::{Decision, Severity};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Contexto montado uma vez no startup e repassado aos componentes.
#[derive(Debug, Clone)]
pub struct MonitorContext {
    /// Identidade do host, enviada como `source` nos triggers.
    pub source: String,
    /// Pausa entre o fim de um ciclo e o início do próximo.
    pub interval: Duration,
}

/// Contagem do que aconteceu em um ciclo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    pub failures: usize,
    pub triggered: usize,
    pub resolved: usize,
    pub report_errors: usize,
}

/// Checa, registra, avalia e reporta um único alvo.
async fn check_target(
    cycle_number: u64,
    ctx: &MonitorContext,
    prober: &Prober,
    evaluator: &IncidentEvaluator,
    sink: &dyn AlertSink,
    target: &mut Target,
) -> Result<Decision, AlertError> {
    let outcome = prober.probe(target.url()).await;
    info!(
        "[ALVO {}][CICLO {}] Resultado: failed={} body={:?} erro={:?}",
        target.url(),
        cycle_number,
        outcome.is_failure(),
        outcome.body(),
        outcome.error()
    );
    let details = outcome.details();
    target.record(outcome);

    let decision = evaluator.evaluate(target.history());
    match decision {
        Decision::Trigger => {
            info!(
                "[ALVO {}][CICLO {}] Reportando como TRIGGERED.",
                target.url(),
                cycle_number
            );
            let event = TriggerEvent {
                routing_key: target.pd_api_key(),
                dedup_key: target.dedup_key(),
                summary: format!("Serviço em {} está FORA DO AR", target.url()),
                source: &ctx.source,
                severity: Severity::Critical,
                details,
            };
            sink.trigger(&event).await?;
        }
        Decision::Resolve => {
            info!(
                "[ALVO {}][CICLO {}] Reportando como RESOLVED.",
                target.url(),
                cycle_number
            );
            sink.resolve(target.pd_api_key(), target.dedup_key()).await?;
        }
    }
    Ok(decision)
}

/// Um ciclo completo: todos os alvos, em ordem, um por vez.
/// Erro ao reportar um alvo é logado e não impede os seguintes.
pub async fn run_cycle(
    cycle_number: u64,
    ctx: &MonitorContext,
    prober: &Prober,
    evaluator: &IncidentEvaluator,
    sink: &dyn AlertSink,
    targets: &mut [Target],
) -> CycleReport {
    let cycle_start = Instant::now();
    info!(
        "[CICLO {}] Iniciando ciclo em {} com {} alvos.",
        cycle_number,
        Utc::now(),
        targets.len()
    );

    let mut report = CycleReport::default();
    for target in targets.iter_mut() {
        report.checked += 1;
        let result = check_target(cycle_number, ctx, prober, evaluator, sink, target).await;
        if target.history().latest().is_some_and(|o| o.is_failure()) {
            report.failures += 1;
        }
        match result {
            Ok(Decision::Trigger) => report.triggered += 1,
            Ok(Decision::Resolve) => report.resolved += 1,
            Err(e) => {
                report.report_errors += 1;
                error!(
                    "[ALVO {}][CICLO {}] Erro ao reportar: {}",
                    target.url(),
                    cycle_number,
                    e
                );
            }
        }
    }

    debug!("[CICLO {}] {:?}", cycle_number, report);
    info!(
        "[CICLO {}] Fim do ciclo. Duração: {:?}",
        cycle_number,
        cycle_start.elapsed()
    );
    report
}

/// Scheduler principal: roda ciclos para sempre, dormindo `interval` entre eles.
pub async fn run_scheduler(
    ctx: MonitorContext,
    prober: Prober,
    evaluator: IncidentEvaluator,
    sink: Box<dyn AlertSink>,
    mut targets: Vec<Target>,
) {
    let mut cycle_number: u64 = 0;
    loop {
        cycle_number += 1;
        run_cycle(
            cycle_number,
            &ctx,
            &prober,
            &evaluator,
            sink.as_ref(),
            &mut targets,
        )
        .await;
        tokio::time::sleep(ctx.interval).await;
    }
}
