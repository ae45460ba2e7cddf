use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub(crate) const METRIC_REQUESTS_TOTAL: &str = "blogwire_http_requests_total";
pub(crate) const METRIC_REFRESH_TOTAL: &str = "blogwire_auth_refresh_total";
pub(crate) const METRIC_REFRESH_FAILED_TOTAL: &str = "blogwire_auth_refresh_failed_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Events go to stderr so command output on stdout stays machine-readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_REQUESTS_TOTAL,
            Unit::Count,
            "Total number of HTTP requests sent to the API, including refresh calls and retries."
        );
        describe_counter!(
            METRIC_REFRESH_TOTAL,
            Unit::Count,
            "Total number of access-token refresh attempts triggered by 401 responses."
        );
        describe_counter!(
            METRIC_REFRESH_FAILED_TOTAL,
            Unit::Count,
            "Total number of refresh attempts that ended in cleared credentials."
        );
    });
}
