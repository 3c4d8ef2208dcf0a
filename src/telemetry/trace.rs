//! Span export and W3C trace-context propagation.
//!
//! [`Telemetry`] owns the tracer provider and the propagator. Nothing here is
//! installed process-wide: the daemon passes the value to the listener (which
//! extracts incoming context) and to the gateway's outbound interceptor
//! (which injects it). Turning `tracing` spans into OpenTelemetry spans is
//! done by the subscriber layer from [`Telemetry::layer`].

use opentelemetry::Context;
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{BatchSpanProcessor, SdkTracerProvider};
use tonic::metadata::{Ascii, MetadataKey, MetadataMap, MetadataValue};
use tonic::service::Interceptor;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::{GreeterError, Result};

/// Instrumentation scope and `service.name` reported on every span.
pub const INSTRUMENTATION_SCOPE: &str = "greeter";

/// Tracer provider plus propagation format.
///
/// Cloning is cheap; clones share the same provider and span buffer.
#[derive(Clone)]
pub struct Telemetry {
    provider: SdkTracerProvider,
    propagator: TraceContextPropagator,
}

impl Telemetry {
    /// Export spans as human-readable text on stdout through a batching processor.
    pub fn stdout() -> Self {
        let exporter = opentelemetry_stdout::SpanExporter::default();
        let processor = BatchSpanProcessor::builder(exporter).build();
        let provider = SdkTracerProvider::builder()
            .with_span_processor(processor)
            .with_resource(
                Resource::builder()
                    .with_service_name(INSTRUMENTATION_SCOPE)
                    .build(),
            )
            .build();

        Self {
            provider,
            propagator: TraceContextPropagator::new(),
        }
    }

    /// Subscriber layer that records `tracing` spans through this provider.
    pub fn layer<S>(&self) -> impl tracing_subscriber::Layer<S> + Send + Sync + use<S>
    where
        S: tracing::Subscriber
            + for<'span> tracing_subscriber::registry::LookupSpan<'span>
            + Send
            + Sync,
    {
        tracing_opentelemetry::layer().with_tracer(self.provider.tracer(INSTRUMENTATION_SCOPE))
    }

    /// Write `cx` into outgoing gRPC metadata (`traceparent`, `tracestate`).
    pub fn inject(&self, cx: &Context, metadata: &mut MetadataMap) {
        self.propagator.inject_context(cx, &mut MetadataInjector(metadata));
    }

    /// Read the remote parent context from incoming HTTP/2 headers.
    pub fn extract(&self, headers: &http::HeaderMap) -> Context {
        self.propagator.extract(&HeaderExtractor(headers))
    }

    /// Flush buffered spans and stop the exporter.
    pub fn shutdown(&self) -> Result<()> {
        self.provider.shutdown().map_err(|e| {
            GreeterError::Telemetry(format!("failed to shut down tracer provider: {e}"))
        })
    }
}

/// Span for one inbound gRPC request, parented on the caller's trace context.
pub fn request_span(telemetry: Option<&Telemetry>, request: &http::Request<()>) -> tracing::Span {
    let span = tracing::info_span!("grpc.request", rpc.method = %request.uri().path());
    if let Some(telemetry) = telemetry {
        span.set_parent(telemetry.extract(request.headers()));
    }
    span
}

/// Client interceptor that propagates the current span's trace context.
///
/// Without telemetry it passes requests through untouched.
#[derive(Clone, Default)]
pub struct TracePropagation {
    telemetry: Option<Telemetry>,
}

impl TracePropagation {
    pub fn new(telemetry: Option<Telemetry>) -> Self {
        Self { telemetry }
    }
}

impl Interceptor for TracePropagation {
    fn call(
        &mut self,
        mut request: tonic::Request<()>,
    ) -> std::result::Result<tonic::Request<()>, tonic::Status> {
        if let Some(telemetry) = &self.telemetry {
            let cx = tracing::Span::current().context();
            telemetry.inject(&cx, request.metadata_mut());
        }
        Ok(request)
    }
}

struct MetadataInjector<'a>(&'a mut MetadataMap);

impl Injector for MetadataInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        // Propagation keys and values are ASCII; anything else is dropped.
        if let (Ok(key), Ok(value)) = (
            MetadataKey::<Ascii>::from_bytes(key.as_bytes()),
            MetadataValue::try_from(value.as_str()),
        ) {
            self.0.insert(key, value);
        }
    }
}

struct HeaderExtractor<'a>(&'a http::HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}
