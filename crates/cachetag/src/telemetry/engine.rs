// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Engine telemetry implementation and recording.

use std::time::Duration;

use opentelemetry::{
    KeyValue,
    metrics::{Counter, Gauge, Histogram, Meter, MeterProvider},
};
use thread_aware::Arc;
use tick::Clock;

use crate::{
    engine::EngineName,
    telemetry::{
        EngineActivity, EngineOperation, EngineTelemetry, attributes,
        metrics::{create_cache_size_gauge, create_event_counter, create_operation_duration_histogram},
    },
};

#[derive(Clone, Debug)]
pub(crate) struct EngineTelemetryInner {
    clock: Clock,
    logging_enabled: bool,
    event_counter: Option<Counter<u64>>,
    operation_duration: Option<Histogram<f64>>,
    cache_size: Option<Gauge<u64>>,
}

impl EngineTelemetry {
    /// Creates a new engine telemetry collector.
    ///
    /// # Arguments
    ///
    /// * `logging_enabled` - Whether to emit tracing events for operations
    /// * `meter` - The meter to create metric instruments on, if metrics are wanted
    /// * `clock` - The clock to use for timing events
    #[must_use]
    pub fn new(logging_enabled: bool, meter: Option<&Meter>, clock: Clock) -> Self {
        Self {
            inner: Arc::from_unaware(EngineTelemetryInner {
                logging_enabled,
                clock,
                event_counter: meter.map(create_event_counter),
                operation_duration: meter.map(create_operation_duration_histogram),
                cache_size: meter.map(create_cache_size_gauge),
            }),
        }
    }

    /// Creates a telemetry collector from a meter provider, using the
    /// crate's instrumentation scope for all metric instruments.
    #[must_use]
    pub fn from_provider(logging_enabled: bool, meter_provider: &dyn MeterProvider, clock: Clock) -> Self {
        let meter = crate::telemetry::metrics::create_meter(meter_provider);
        Self::new(logging_enabled, Some(&meter), clock)
    }

    /// Returns a reference to the clock used for timing events.
    #[inline]
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.inner.clock
    }

    /// Records an engine operation.
    #[inline]
    pub(crate) fn record(&self, name: EngineName, operation: EngineOperation, activity: EngineActivity, duration: Option<Duration>) {
        let attrs = [
            KeyValue::new(attributes::CACHE_NAME, name),
            KeyValue::new(attributes::CACHE_OPERATION_NAME, operation.as_str()),
            KeyValue::new(attributes::CACHE_ACTIVITY_NAME, activity.as_str()),
        ];

        if let Some(c) = &self.inner.event_counter {
            c.add(1, &attrs);
        }

        if let (Some(d), Some(h)) = (duration, &self.inner.operation_duration) {
            h.record(d.as_secs_f64(), &attrs);
        }

        #[cfg(any(feature = "logs", test))]
        if self.inner.logging_enabled {
            Self::emit(name, operation, activity, duration);
        }
    }

    /// Records the current store size.
    #[inline]
    pub(crate) fn record_size(&self, name: EngineName, size: u64) {
        let attrs = [KeyValue::new(attributes::CACHE_NAME, name)];
        if let Some(g) = &self.inner.cache_size {
            g.record(size, &attrs);
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn emit(name: EngineName, operation: EngineOperation, activity: EngineActivity, duration: Option<Duration>) {
        use opentelemetry::logs::Severity;

        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = duration.map(|d| d.as_nanos());

        // Tracing level must be constant, so we use a macro to select the appropriate level.
        // Field names must match constants in attributes.rs - see attribute_names_match_tracing_fields test.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    cache.name = name,
                    cache.operation = op,
                    cache.activity = act,
                    cache.duration_ns = ?duration_ns,
                    "cache.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
            _ => {}
        }
    }
}
