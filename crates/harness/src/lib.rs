//! Test support: a fault-injecting store wrapper, seeded fixtures, and
//! tracing setup for the integration tests under `tests/`.

mod faulty;
mod fixtures;

pub use faulty::{FaultyStore, Op, ReorderGate};
pub use fixtures::{Fixture, TestStore};

use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
/// Honours `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
