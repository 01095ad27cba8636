//! Telemetry initialization.

use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,api_server=debug,folio_core=debug,folio_infra=debug";

/// Log output settings.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// One JSON object per line instead of the human-readable format.
    pub json_logs: bool,
    pub service_name: String,
}

impl TelemetryConfig {
    /// `LOG_FORMAT=json` switches to JSON; `SERVICE_NAME` overrides `folio-api`.
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            service_name: std::env::var("SERVICE_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "folio-api".to_string()),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer();
        if self.json_logs {
            layer.json().with_current_span(true).boxed()
        } else {
            layer.pretty().boxed()
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(env_filter)
        .init();

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
}
