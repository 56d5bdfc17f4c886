//! # Simulador de Reintentos
//! src/retry/mod.rs
//!
//! Contrato "falla N veces y después funciona", por clave elegida por el
//! cliente (normalmente el timestamp del primer intento):
//!
//! ```text
//! GET /error/503/{key}/2  → 503
//! GET /error/503/{key}/2  → 503
//! GET /error/503/{key}/2  → 200 "Now it works"
//! ```

pub mod store;

pub use store::{RetryOutcome, RetryRecord, RetryStore, DEFAULT_RETENTION};
