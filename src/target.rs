use crate::config::CheckConfig;
use crate::history::ResultHistory;
use crate::types::Outcome;
use sha2::{Digest, Sha256};

/// Chave de deduplicação: SHA-256 (hex) da URL.
/// Mesma URL gera sempre a mesma chave, inclusive entre reinícios.
pub fn dedup_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Alvo monitorado. Criado a partir da configuração; só o histórico muda.
#[derive(Debug, Clone)]
pub struct Target {
    url: String,
    pd_api_key: String,
    dedup_key: String,
    history: ResultHistory,
}

impl Target {
    pub fn new(url: impl Into<String>, pd_api_key: impl Into<String>) -> Self {
        let url = url.into();
        let dedup_key = dedup_key(&url);
        Self {
            url,
            pd_api_key: pd_api_key.into(),
            dedup_key,
            history: ResultHistory::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pd_api_key(&self) -> &str {
        &self.pd_api_key
    }

    pub fn dedup_key(&self) -> &str {
        &self.dedup_key
    }

    pub fn history(&self) -> &ResultHistory {
        &self.history
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.history.record(outcome);
    }
}

impl From<&CheckConfig> for Target {
    fn from(check: &CheckConfig) -> Self {
        Target::new(check.url.clone(), check.pd_api_key.clone())
    }
}
