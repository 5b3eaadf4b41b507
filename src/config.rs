use config as config_crate;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::history::HISTORY_CAPACITY;
use crate::incident::DEFAULT_FAIL_THRESHOLD;

/// Nome base do arquivo de configuração (`watchman.yaml`, `.toml`, `.json`...).
pub const DEFAULT_CONFIG_NAME: &str = "watchman";
pub const DEFAULT_EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";
const HOSTNAME_FILE: &str = "/proc/sys/kernel/hostname";

/// Um endpoint a ser checado.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// URL a ser consultada via GET.
    pub url: String,
    /// Routing key da integração no PagerDuty.
    pub pd_api_key: String,
}

/// Configuração operacional do sistema.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Alvos monitorados.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
    /// Intervalo entre ciclos em segundos.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Timeout em segundos para cada checagem (ausente = padrão do cliente HTTP).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Falhas consecutivas para abrir incidente.
    #[serde(default = "default_fail_threshold")]
    pub fail_threshold: usize,
    /// Endpoint da Events API.
    #[serde(default = "default_events_url")]
    pub events_url: String,
    /// Identidade do host enviada como `source` nos triggers.
    #[serde(default)]
    pub source: Option<String>,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_fail_threshold() -> usize {
    DEFAULT_FAIL_THRESHOLD
}

fn default_events_url() -> String {
    DEFAULT_EVENTS_URL.to_string()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("nenhum check configurado")]
    NoChecks,
    #[error("check #{0}: url vazia")]
    EmptyUrl(usize),
    #[error("check #{0}: pd_api_key vazia")]
    EmptyApiKey(usize),
    #[error("interval_secs deve ser maior que zero")]
    ZeroInterval,
    #[error("timeout_secs deve ser maior que zero")]
    ZeroTimeout,
    #[error("fail_threshold deve estar entre 1 e {max} (recebido {got})")]
    FailThreshold { got: usize, max: usize },
}

impl Config {
    /// Carrega do arquivo `name` (extensão detectada pelo crate `config`)
    /// com sobrescrita por variáveis `WATCHMAN_*`.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        let settings = config_crate::Config::builder()
            .add_source(config_crate::File::with_name(name))
            .add_source(config_crate::Environment::with_prefix("WATCHMAN"))
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checks.is_empty() {
            return Err(ConfigError::NoChecks);
        }
        for (idx, check) in self.checks.iter().enumerate() {
            if check.url.trim().is_empty() {
                return Err(ConfigError::EmptyUrl(idx));
            }
            if check.pd_api_key.trim().is_empty() {
                return Err(ConfigError::EmptyApiKey(idx));
            }
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.fail_threshold == 0 || self.fail_threshold > HISTORY_CAPACITY {
            return Err(ConfigError::FailThreshold {
                got: self.fail_threshold,
                max: HISTORY_CAPACITY,
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve a identidade do host: `source` explícito, `$HOSTNAME`,
    /// hostname do kernel, ou "watchman".
    pub fn resolve_source(&self) -> String {
        if let Some(source) = self.source.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return source.to_string();
        }
        if let Ok(host) = std::env::var("HOSTNAME") {
            if !host.trim().is_empty() {
                return host.trim().to_string();
            }
        }
        match std::fs::read_to_string(HOSTNAME_FILE) {
            Ok(host) if !host.trim().is_empty() => host.trim().to_string(),
            _ => DEFAULT_CONFIG_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::{File, FileFormat};

    fn parse(yaml: &str) -> Config {
        ::config::Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .unwrap()
    }

    #[test]
    fn applies_defaults() {
        let config = parse(
            r#"
checks:
  - url: https://example.com/health
    pd_api_key: abc
"#,
        );
        assert_eq!(config.checks.len(), 1);
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert_eq!(config.timeout(), None);
        assert_eq!(config.fail_threshold, 2);
        assert_eq!(config.events_url, DEFAULT_EVENTS_URL);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn reads_overrides() {
        let config = parse(
            r#"
interval_secs: 15
timeout_secs: 5
fail_threshold: 3
source: monitor-01
checks:
  - url: http://a
    pd_api_key: k1
  - url: http://b
    pd_api_key: k2
"#,
        );
        assert_eq!(config.checks[1].url, "http://b");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.fail_threshold, 3);
        assert_eq!(config.resolve_source(), "monitor-01");
    }

    #[test]
    fn missing_api_key_fails_to_parse() {
        let result = ::config::Config::builder()
            .add_source(File::from_str(
                "checks:\n  - url: http://a\n",
                FileFormat::Yaml,
            ))
            .build()
            .and_then(|settings| settings.try_deserialize::<Config>());
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = parse("checks:\n  - url: http://a\n    pd_api_key: k\n");

        config.interval_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
        config.interval_secs = 60;

        config.timeout_secs = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
        config.timeout_secs = None;

        config.fail_threshold = HISTORY_CAPACITY + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FailThreshold { .. })
        ));
        config.fail_threshold = 2;

        config.checks[0].pd_api_key = " ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyApiKey(0)));

        config.checks.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoChecks));
    }

    fn write_config(dir: &tempfile::TempDir, yaml: &str) -> String {
        let path = dir.path().join("watchman.yaml");
        std::fs::write(&path, yaml).unwrap();
        dir.path().join("watchman").to_string_lossy().into_owned()
    }

    #[test]
    fn load_reads_file_and_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let name = write_config(
            &dir,
            "interval_secs: 30\nchecks:\n  - url: http://a\n    pd_api_key: k1\n",
        );

        let config = Config::load(&name).unwrap();
        assert_eq!(config.interval(), Duration::from_secs(30));
        assert_eq!(config.checks[0].pd_api_key, "k1");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.fail_threshold, 2);

        // Único teste que mexe em WATCHMAN_*
        unsafe {
            std::env::set_var("WATCHMAN_TIMEOUT_SECS", "7");
            std::env::set_var("WATCHMAN_FAIL_THRESHOLD", "3");
        }
        let overridden = Config::load(&name);
        unsafe {
            std::env::remove_var("WATCHMAN_TIMEOUT_SECS");
            std::env::remove_var("WATCHMAN_FAIL_THRESHOLD");
        }
        let overridden = overridden.unwrap();
        assert_eq!(overridden.timeout(), Some(Duration::from_secs(7)));
        assert_eq!(overridden.fail_threshold, 3);
        assert_eq!(overridden.interval(), Duration::from_secs(30));
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let name = dir.path().join("nao-existe").to_string_lossy().into_owned();
        assert!(Config::load(&name).is_err());
    }

    #[test]
    fn load_fails_on_empty_checks() {
        let dir = tempfile::tempdir().unwrap();
        let name = write_config(&dir, "interval_secs: 60\nchecks: []\n");
        let err = Config::load(&name).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::NoChecks));
    }
}
