//! Tracing subscriber setup for hosts and tests.

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only the first call has any
/// effect. A subscriber installed by the host beforehand is left in place.
///
/// ```text
/// RUST_LOG=clausal_eval=debug              # invoke + selected clause
/// RUST_LOG=clausal_eval=trace              # + per-clause failure reasons
/// RUST_LOG=clausal_parse=debug,clausal_eval=debug
/// ```
pub fn init_tracing() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init();
    });
}
