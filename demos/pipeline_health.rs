//! # Example: pipeline_health
//!
//! Wires three components into two pipelines, reports a short lifecycle for
//! each, and shows what the built-in listeners observe.
//!
//! ## Flow
//! ```text
//! otlp receiver ──► traces, metrics
//! batch processor ──► traces
//! prometheus exporter ──► metrics   (degrades, recovers, then fails permanently)
//!
//! Aggregator ──► LogReporter (tracing output)
//!            └─► HealthProbe (is_healthy after each phase)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example pipeline_health
//! ```

use std::sync::Arc;

use statusvisor::{
    Aggregator, ComponentId, Config, HealthProbe, InstanceId, Kind, Listener, LogReporter,
    PipelineId, Scope, Signal, Status, StatusEvent,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let probe = Arc::new(HealthProbe::new());
    let reporter: Arc<dyn Listener> = Arc::new(LogReporter::new());
    let listeners = vec![reporter, probe.clone() as Arc<dyn Listener>];
    let agg = Aggregator::builder(Config::default())
        .with_listeners(listeners)
        .build();

    let traces = PipelineId::new(Signal::Traces);
    let metrics = PipelineId::new(Signal::Metrics);

    let otlp = InstanceId::new(ComponentId::new("otlp"), Kind::Receiver, [traces.clone()])?
        .with_pipelines([metrics.clone()]);
    let batch = InstanceId::new(ComponentId::new("batch"), Kind::Processor, [traces.clone()])?;
    let prom = InstanceId::new(
        ComponentId::with_name("prometheus", "remote"),
        Kind::Exporter,
        [metrics.clone()],
    )?;

    for id in [&otlp, &batch, &prom] {
        agg.report(StatusEvent::new(id.clone(), Status::Starting));
    }
    for id in [&otlp, &batch, &prom] {
        agg.report(StatusEvent::new(id.clone(), Status::Ok));
    }
    println!("after startup:  {:?}", status(&agg, &Scope::Process));

    agg.report(StatusEvent::from_error(
        prom.clone(),
        Status::RecoverableError,
        "remote write timed out",
    ));
    println!("metrics:        {:?}", status(&agg, &Scope::Pipeline(metrics.clone())));
    println!("traces:         {:?}", status(&agg, &Scope::Pipeline(traces.clone())));

    agg.report(StatusEvent::new(prom.clone(), Status::Ok));
    agg.report(StatusEvent::from_error(
        prom.clone(),
        Status::PermanentError,
        "authentication rejected",
    ));
    // Discarded: PermanentError is terminal.
    let outcome = agg.report(StatusEvent::new(prom, Status::Ok));
    println!("late recovery:  {outcome:?}");

    agg.shutdown().await;
    println!("probe healthy:  {}", probe.is_healthy());
    for (scope, status) in probe.snapshot() {
        println!("  {scope} => {status}");
    }
    Ok(())
}

fn status(agg: &Aggregator, scope: &Scope) -> Option<Status> {
    agg.current_status(scope).map(|a| a.status)
}
