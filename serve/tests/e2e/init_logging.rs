//! Test-only: initializes tracing from `RUST_LOG` when the test binary starts.
//!
//! Declared from `main.rs` so handler and retry logs from the server are printed:
//!
//! ```bash
//! RUST_LOG=serve=debug,citypulse=debug cargo test -p serve -- --nocapture
//! ```

use ctor::ctor;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

#[ctor]
fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_filter(filter),
        )
        .try_init();
}
