//! Logger setup for embedders. The crate itself only emits through the
//! `log` facade; call [`init`] once at startup (or install your own
//! `log` backend instead).

use log::LevelFilter;

/// Initializes env_logger at `info` level; `RUST_LOG` overrides as
/// usual. Safe to call more than once — later calls are no-ops.
pub fn init() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .try_init();
}
