use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt, fmt::time::UtcTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_DIRECTIVES: &str = "warn";
const VERBOSE_LOG_DIRECTIVES: &str = "warn,carbon_tracker=debug";

/// Install the stderr subscriber once; `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    LOGGER_INIT
        .get_or_try_init(|| {
            let fallback = if verbose {
                VERBOSE_LOG_DIRECTIVES
            } else {
                DEFAULT_LOG_DIRECTIVES
            };
            let env_filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(fallback))
                .map_err(|err| anyhow::anyhow!("invalid log filter: {err}"))?;

            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_timer(UtcTime::rfc_3339()),
                )
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to install logger: {err}"))?;

            Ok(())
        })
        .map(|_| ())
}
