#![doc(test(attr(deny(warnings))))]

//! Seiva School ties the school-ledger crates together: it owns the unified
//! error type, tracing setup and the `seiva_cli` shell.

pub mod cli;
pub mod errors;
pub mod utils;

pub use seiva_config as config;
pub use seiva_domain as domain;
pub use seiva_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Seiva School tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
