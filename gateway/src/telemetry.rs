use config::{LogFormat, ObservabilityConfig};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rnd_core::Role;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, fmt::MakeWriter, prelude::*};

use crate::error::GatewayError;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(
    observability: &ObservabilityConfig
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    match observability.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init()
    }
}

/// Plain-text subscriber used while the configuration is still being
/// resolved, before [`init_tracing`] knows the configured level and format.
pub fn bootstrap_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer))
}

pub fn install_metrics_recorder() -> Result<PrometheusHandle, GatewayError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| GatewayError::Server {
            reason: format!("Failed to install metrics recorder: {e}")
        })
}

pub fn record_request(entity: &'static str, operation: &'static str) {
    counter!("rnd_gateway_requests_total", "entity" => entity, "operation" => operation)
        .increment(1);
}

pub fn record_upstream_error(entity: &'static str, kind: &'static str) {
    counter!("rnd_gateway_upstream_errors_total", "entity" => entity, "kind" => kind)
        .increment(1);
}

pub fn record_access_denied(role: Role) {
    counter!("rnd_gateway_access_denied_total", "role" => role.as_str()).increment(1);
}

pub fn record_resolved_roles(count: usize) {
    histogram!("rnd_gateway_resolved_roles").record(count as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::CliOverrides;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'w> MakeWriter<'w> for Captured {
        type Writer = Self;

        fn make_writer(&'w self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_bootstrap_subscriber_captures_config_resolution() {
        let captured = Captured::default();
        let cli = CliOverrides {
            host: None,
            port: Some(9090)
        };

        let config = tracing::subscriber::with_default(bootstrap_subscriber(captured.clone()), || {
            config::resolve_with(None, &cli, |_| None)
        })
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert!(
            captured
                .text()
                .contains("Server port overridden from command line")
        );
    }

    #[test]
    fn test_counters_are_labelled() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_request("model", "create");
            record_request("model", "create");
            record_access_denied(Role::Tester);
        });

        let snapshot = snapshotter.snapshot().into_vec();
        let requests = snapshot
            .iter()
            .find(|(key, ..)| key.key().name() == "rnd_gateway_requests_total")
            .unwrap();
        assert_eq!(requests.3, DebugValue::Counter(2));
        assert!(
            requests
                .0
                .key()
                .labels()
                .any(|label| label.key() == "operation" && label.value() == "create")
        );

        let denied = snapshot
            .iter()
            .find(|(key, ..)| key.key().name() == "rnd_gateway_access_denied_total")
            .unwrap();
        assert!(
            denied
                .0
                .key()
                .labels()
                .any(|label| label.value() == "ROLE_TESTEUR")
        );
    }

    #[test]
    fn test_resolved_roles_histogram() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || record_resolved_roles(2));

        let snapshot = snapshotter.snapshot().into_vec();
        assert!(
            snapshot
                .iter()
                .any(|(key, ..)| key.key().name() == "rnd_gateway_resolved_roles")
        );
    }
}
