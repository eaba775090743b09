//! Prometheus text rendering of one collection pass.

use chrono::{DateTime, Utc};
use metrics::{Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::exporter::projection::Collector;

/// Render one pass of `collector` at `now` as Prometheus exposition text.
///
/// Every pass records into a fresh recorder, so series that a previous
/// configuration produced are never carried over into the next scrape.
pub fn render(collector: &Collector<'_>, now: DateTime<Utc>) -> String {
    let recorder = PrometheusBuilder::new().build_recorder();
    let metadata = Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

    for descriptor in collector.describe() {
        recorder.describe_gauge(descriptor.name.into(), None, descriptor.help.into());
    }

    for observation in collector.collect(now) {
        let labels: Vec<Label> = observation
            .labels
            .into_iter()
            .map(|(k, v)| Label::new(k, v))
            .collect();
        let key = Key::from_parts(observation.name, labels);
        recorder.register_gauge(&key, &metadata).set(observation.value);
    }

    recorder.handle().render()
}
