//! history.rs — Histórico limitado de resultados por alvo

use crate::types::Outcome;
use std::collections::VecDeque;

/// Quantidade máxima de resultados retidos por alvo.
///
/// A avaliação de incidentes consulta apenas a cauda (por padrão os 2 últimos);
/// o restante existe como limite de memória e para políticas com janela maior.
pub const HISTORY_CAPACITY: usize = 10;

/// Buffer circular FIFO: o mais antigo sai primeiro quando está cheio.
#[derive(Debug, Clone, Default)]
pub struct ResultHistory {
    entries: VecDeque<Outcome>,
}

impl ResultHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Registra um resultado, descartando o mais antigo se atingiu a capacidade.
    pub fn record(&mut self, outcome: Outcome) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(outcome);
    }

    /// Os `n` resultados mais recentes em ordem cronológica (ou menos, se não houver).
    pub fn last(&self, n: usize) -> impl Iterator<Item = &Outcome> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    /// Resultado mais recente.
    pub fn latest(&self) -> Option<&Outcome> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
