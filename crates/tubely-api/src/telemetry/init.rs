use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str =
    "tubely_api=debug,tubely_storage=debug,tubely_db=debug,tower_http=debug";

/// Initialize tracing.
///
/// `RUST_LOG` overrides the default filter. Production emits one JSON object per
/// event; everywhere else gets the compact console format.
pub fn init_telemetry(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console)
        .try_init()?;

    Ok(())
}
