#![doc(test(attr(deny(warnings))))]

//! Daftar Core decides what kind of financial event a ledger entry
//! represents and how payments, cheques, discounts, advances, and
//! write-offs converge on its payment status. It exposes a function-level
//! API for an external UI/persistence layer and stays storage-agnostic
//! through the [`store::TransactionalStore`] port.

pub mod advances;
pub mod cheques;
pub mod classify;
pub mod config;
pub mod domain;
pub mod errors;
pub mod journal;
pub mod settlement;
pub mod storage;
pub mod store;
pub mod taxonomy;
pub mod utils;
pub mod writeoff;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Daftar Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
