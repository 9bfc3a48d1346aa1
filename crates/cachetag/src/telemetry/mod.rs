// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Engine telemetry integration with OpenTelemetry.
//!
//! This module provides telemetry recording for cache engine operations using
//! OpenTelemetry metrics and tracing logs. With the `metrics` feature, every
//! operation emits counters, durations, and a size gauge; with the `logs`
//! feature, structured tracing events.

#[cfg(any(feature = "logs", feature = "metrics", test))]
use engine::EngineTelemetryInner;
#[cfg(any(feature = "logs", test))]
use opentelemetry::logs::Severity;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use thread_aware::{Arc, PerCore};

pub(crate) mod attributes;
#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) mod engine;
pub(crate) mod ext;
#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

/// Engine telemetry provider for OpenTelemetry integration.
///
/// This type wraps an OpenTelemetry meter and a logging switch, enabling
/// automatic recording of engine operations as structured logs and metrics.
///
/// Construct this and pass it to the engine builder via `.telemetry()`.
#[derive(Clone, Debug)]
pub struct EngineTelemetry {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    inner: Arc<EngineTelemetryInner, PerCore>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum EngineOperation {
    Lookup,
    Store,
    Invalidate,
    Sweep,
}

impl EngineOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "cache.lookup",
            Self::Store => "cache.store",
            Self::Invalidate => "cache.invalidate",
            Self::Sweep => "cache.sweep",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum EngineActivity {
    Hit,
    Miss,
    Expired,
    Stored,
    Evicted,
    Swept,
    Error,
}

impl EngineActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "cache.hit",
            Self::Miss => "cache.miss",
            Self::Expired => "cache.expired",
            Self::Stored => "cache.stored",
            Self::Evicted => "cache.evicted",
            Self::Swept => "cache.swept",
            Self::Error => "cache.error",
        }
    }

    #[cfg(any(feature = "logs", test))]
    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss => Severity::Debug,
            Self::Expired | Self::Stored | Self::Evicted | Self::Swept => Severity::Info,
            Self::Error => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_operation_as_str() {
        assert_eq!(EngineOperation::Lookup.as_str(), "cache.lookup");
        assert_eq!(EngineOperation::Store.as_str(), "cache.store");
        assert_eq!(EngineOperation::Invalidate.as_str(), "cache.invalidate");
        assert_eq!(EngineOperation::Sweep.as_str(), "cache.sweep");
    }

    #[test]
    fn engine_activity_as_str() {
        assert_eq!(EngineActivity::Hit.as_str(), "cache.hit");
        assert_eq!(EngineActivity::Miss.as_str(), "cache.miss");
        assert_eq!(EngineActivity::Expired.as_str(), "cache.expired");
        assert_eq!(EngineActivity::Stored.as_str(), "cache.stored");
        assert_eq!(EngineActivity::Evicted.as_str(), "cache.evicted");
        assert_eq!(EngineActivity::Swept.as_str(), "cache.swept");
        assert_eq!(EngineActivity::Error.as_str(), "cache.error");
    }

    #[test]
    fn activity_severity_levels() {
        assert_eq!(EngineActivity::Hit.severity(), Severity::Debug);
        assert_eq!(EngineActivity::Miss.severity(), Severity::Debug);
        assert_eq!(EngineActivity::Expired.severity(), Severity::Info);
        assert_eq!(EngineActivity::Stored.severity(), Severity::Info);
        assert_eq!(EngineActivity::Evicted.severity(), Severity::Info);
        assert_eq!(EngineActivity::Swept.severity(), Severity::Info);
        assert_eq!(EngineActivity::Error.severity(), Severity::Error);
    }
}
