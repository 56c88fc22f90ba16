//! Logging and optional `OpenTelemetry` trace export.
//!
//! [`Telemetry`] installs a `tracing` subscriber that logs to stderr. With
//! the `telemetry` feature and `OTEL_EXPORTER_OTLP_*` variables set, spans
//! are also exported over OTLP.

#[cfg(feature = "telemetry")]
use std::env;

#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::{SCHEMA_URL, attribute::SERVICE_VERSION};
#[cfg(feature = "telemetry")]
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Detects OTLP protocol from environment. Returns `None` if OTEL is not configured.
#[cfg(feature = "telemetry")]
fn detect_protocol() -> Option<OtlpProtocol> {
    let is_enabled = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok()
        || env::var("OTEL_EXPORTER_OTLP_HEADERS").is_ok()
        || env::var("OTEL_EXPORTER_OTLP_PROTOCOL").is_ok();
    is_enabled.then(|| {
        env::var("OTEL_EXPORTER_OTLP_PROTOCOL")
            .ok()
            .map_or(OtlpProtocol::Http, |s| match s.as_str() {
                "grpc" => OtlpProtocol::Grpc,
                _ => OtlpProtocol::Http,
            })
    })
}

/// Supported OTLP transport protocols.
#[cfg(feature = "telemetry")]
#[derive(Debug, Clone, Copy)]
enum OtlpProtocol {
    Http,
    Grpc,
}

/// Service identity and log level for the subscriber.
///
/// The identity only labels exported spans; `OTEL_RESOURCE_ATTRIBUTES` is
/// still honoured by the SDK.
#[derive(Debug, Default)]
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
pub struct Telemetry {
    name: Option<String>,
    version: Option<String>,
    log_level: Option<String>,
}

impl Telemetry {
    /// Creates a new, empty [`Telemetry`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the service version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the log level filter used when `RUST_LOG` is not set.
    ///
    /// Accepts any valid [`EnvFilter`] directive string (e.g. `"debug"`,
    /// `"aragon_env=debug"`).
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Span resource carrying the service name and version.
    #[cfg(feature = "telemetry")]
    fn resource(&self) -> Resource {
        let mut builder = Resource::builder();
        if let Some(name) = &self.name {
            builder = builder.with_service_name(name.clone());
        }
        if let Some(version) = &self.version {
            builder =
                builder.with_schema_url([KeyValue::new(SERVICE_VERSION, version.clone())], SCHEMA_URL);
        }
        builder.build()
    }

    /// Builds a batching tracer provider for `protocol`, or `None` if the
    /// exporter cannot be created.
    #[cfg(feature = "telemetry")]
    fn init_tracer(&self, protocol: OtlpProtocol) -> Option<SdkTracerProvider> {
        let builder = opentelemetry_otlp::SpanExporter::builder();
        let exporter = match protocol {
            OtlpProtocol::Http => builder.with_http().build(),
            OtlpProtocol::Grpc => builder.with_tonic().build(),
        }
        .ok()?;

        Some(
            SdkTracerProvider::builder()
                .with_resource(self.resource())
                .with_batch_exporter(exporter)
                .build(),
        )
    }

    /// Registers the global subscriber.
    ///
    /// Logs go to stderr so stdout stays reserved for the resolution output.
    /// Returns a [`TelemetryGuard`] that flushes exporters on drop.
    pub fn register(self) -> TelemetryGuard {
        let fallback = self.log_level.as_deref().unwrap_or("info");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        #[cfg(feature = "telemetry")]
        let tracer_provider = detect_protocol().and_then(|p| self.init_tracer(p));
        #[cfg(feature = "telemetry")]
        let otel_layer = tracer_provider
            .as_ref()
            .map(|tp| OpenTelemetryLayer::new(tp.tracer("aragon-env")));
        #[cfg(not(feature = "telemetry"))]
        let otel_layer: Option<tracing_subscriber::layer::Identity> = None;

        let exporting = otel_layer.is_some();
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();

        if exporting {
            tracing::debug!("OpenTelemetry exporter registered");
        }

        TelemetryGuard {
            #[cfg(feature = "telemetry")]
            tracer_provider,
        }
    }
}

/// Owns the tracer provider; performs graceful shutdown on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    #[cfg(feature = "telemetry")]
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        #[cfg(feature = "telemetry")]
        if let Some(ref tp) = self.tracer_provider
            && let Err(err) = tp.shutdown()
        {
            tracing::error!(?err, "tracer provider shutdown error");
        }
    }
}
