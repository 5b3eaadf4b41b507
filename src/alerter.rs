//! alerter.rs — Abertura/resolução de incidentes na Events API v2 do PagerDuty
//!
//! Os dois métodos são chamados a cada ciclo, não só na transição: o sink
//! precisa tolerar trigger repetido (mesma dedup key) e resolve de incidente
//! já fechado.

use crate::types::Severity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("falha HTTP na Events API: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Events API respondeu {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Dados de um trigger.
#[derive(Debug, Clone)]
pub struct TriggerEvent<'a> {
    pub routing_key: &'a str,
    pub dedup_key: &'a str,
    pub summary: String,
    pub source: &'a str,
    pub severity: Severity,
    pub details: Value,
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn trigger(&self, event: &TriggerEvent<'_>) -> Result<(), AlertError>;
    async fn resolve(&self, routing_key: &str, dedup_key: &str) -> Result<(), AlertError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum EventAction {
    Trigger,
    Resolve,
}

#[derive(Debug, Serialize)]
struct EventPayload<'a> {
    summary: &'a str,
    source: &'a str,
    severity: Severity,
    timestamp: DateTime<Utc>,
    custom_details: &'a Value,
}

#[derive(Debug, Serialize)]
struct EventRequest<'a> {
    routing_key: &'a str,
    event_action: EventAction,
    dedup_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<EventPayload<'a>>,
}

/// Sink real, compartilhado entre todos os alvos.
#[derive(Debug, Clone)]
pub struct PagerDutySink {
    client: Client,
    events_url: String,
}

impl PagerDutySink {
    pub fn new(client: Client, events_url: impl Into<String>) -> Self {
        Self {
            client,
            events_url: events_url.into(),
        }
    }

    async fn send(&self, request: &EventRequest<'_>) -> Result<(), AlertError> {
        let response = self
            .client
            .post(&self.events_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AlertError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl AlertSink for PagerDutySink {
    async fn trigger(&self, event: &TriggerEvent<'_>) -> Result<(), AlertError> {
        let request = EventRequest {
            routing_key: event.routing_key,
            event_action: EventAction::Trigger,
            dedup_key: event.dedup_key,
            payload: Some(EventPayload {
                summary: &event.summary,
                source: event.source,
                severity: event.severity,
                timestamp: Utc::now(),
                custom_details: &event.details,
            }),
        };
        self.send(&request).await
    }

    async fn resolve(&self, routing_key: &str, dedup_key: &str) -> Result<(), AlertError> {
        let request = EventRequest {
            routing_key,
            event_action: EventAction::Resolve,
            dedup_key,
            payload: None,
        };
        self.send(&request).await
    }
}
