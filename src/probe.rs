//! probe.rs — Execução de uma checagem HTTP GET contra um alvo
//!
//! Nunca propaga erro: DNS, conexão recusada, timeout, status não-2xx/3xx ou
//! corpo ilegível viram `Outcome::Failure` com o texto de diagnóstico.

use crate::types::Outcome;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// `timeout = None` mantém o padrão do cliente HTTP.
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Faz um GET em `url` e classifica o resultado.
    pub async fn probe(&self, url: &str) -> Outcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return Outcome::Failure {
                    body: String::new(),
                    error: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Outcome::Failure {
                    body: String::new(),
                    error: e.to_string(),
                };
            }
        };

        if status.is_success() || status.is_redirection() {
            Outcome::Success { body }
        } else {
            Outcome::Failure {
                body,
                error: format!("HTTP {status} para {url}"),
            }
        }
    }
}
