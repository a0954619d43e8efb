//! # test
//! Helpers for tests.
//!

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, registry};

static INIT: Once = Once::new();

/// Set a global logger that writes everything to the test output.
///
/// Safe to call from every test, only the first call installs the logger.
pub fn init_test_logger() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::filter::Targets::new().with_default(Level::TRACE);

        // Std layer
        let std_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_ansi(true)
            .with_target(false);

        // Create registry
        let registry = registry().with(std_layer).with(filter);

        // Another harness may already have set one.
        let _ = tracing::subscriber::set_global_default(registry);
    });
}
