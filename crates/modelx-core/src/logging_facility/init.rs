//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Default directives when `RUST_LOG` is not set
const DEV_DIRECTIVES: &str = "modelx_core=debug,modelx_store=debug";
const PROD_DIRECTIVES: &str = "modelx_core=info,modelx_store=info";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at host startup; later calls are ignored.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Installs nothing; use `init_test_capture()` to record events
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(DEV_DIRECTIVES)),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new(PROD_DIRECTIVES)),
                )
                .init();
        }
        Profile::Test => {
            // The capture subscriber is installed by init_test_capture()
        }
    });
}
