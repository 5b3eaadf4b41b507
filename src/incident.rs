//! incident.rs — Decide se o incidente de um alvo deve estar aberto ou resolvido
//!
//! Lento para alertar, rápido para resolver: só dispara com `fail_threshold`
//! falhas consecutivas, e qualquer sucesso dentro da janela resolve.
//! Não guarda estado entre chamadas; a decisão é recalculada a cada ciclo e
//! reenviada ao sink mesmo sem mudança (o sink é idempotente pela dedup key).

use crate::history::{HISTORY_CAPACITY, ResultHistory};
use crate::types::Decision;

/// Falhas consecutivas necessárias para abrir um incidente.
pub const DEFAULT_FAIL_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct IncidentEvaluator {
    fail_threshold: usize,
}

impl Default for IncidentEvaluator {
    fn default() -> Self {
        Self {
            fail_threshold: DEFAULT_FAIL_THRESHOLD,
        }
    }
}

impl IncidentEvaluator {
    /// O threshold é limitado a `1..=HISTORY_CAPACITY`.
    pub fn new(fail_threshold: usize) -> Self {
        Self {
            fail_threshold: fail_threshold.clamp(1, HISTORY_CAPACITY),
        }
    }

    pub fn fail_threshold(&self) -> usize {
        self.fail_threshold
    }

    /// Conta as falhas entre os últimos `fail_threshold` resultados.
    /// Entradas ausentes contam como não-falha.
    pub fn evaluate(&self, history: &ResultHistory) -> Decision {
        let failures = history
            .last(self.fail_threshold)
            .filter(|outcome| outcome.is_failure())
            .count();

        if failures >= self.fail_threshold {
            Decision::Trigger
        } else {
            Decision::Resolve
        }
    }
}

/// Avaliação com o threshold padrão (duas falhas seguidas).
pub fn evaluate(history: &ResultHistory) -> Decision {
    IncidentEvaluator::default().evaluate(history)
}
