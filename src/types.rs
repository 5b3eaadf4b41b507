use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Resultado classificado de uma checagem.
///
/// `body` e `error` servem apenas para diagnóstico (vão no `custom_details`
/// do incidente); a decisão de estado olha só para a variante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Success { body: String },
    Failure { body: String, error: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn body(&self) -> &str {
        match self {
            Outcome::Success { body } | Outcome::Failure { body, .. } => body,
        }
    }

    /// Texto do erro; vazio em caso de sucesso.
    pub fn error(&self) -> &str {
        match self {
            Outcome::Success { .. } => "",
            Outcome::Failure { error, .. } => error,
        }
    }

    /// Payload de diagnóstico enviado junto com o trigger.
    pub fn details(&self) -> Value {
        json!({
            "body": self.body(),
            "exception": self.error(),
        })
    }
}

/// Estado desejado do incidente após avaliar o histórico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Trigger,
    Resolve,
}

/// Severidade enviada nos triggers; o monitor só usa `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
}
