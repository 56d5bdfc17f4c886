//! # Respuestas Demoradas
//! src/handlers/timeouts.rs
//!
//! /read-timeout responde 200 después de una demora fija. Cada conexión
//! tiene su propio thread, así que la espera sólo detiene a ese request.

use crate::http::{Request, Response};
use std::thread;
use std::time::Duration;

/// Demora por defecto de /read-timeout
pub const DEFAULT_READ_TIMEOUT_DELAY: Duration = Duration::from_millis(500);

/// Body que llega cuando el cliente espera lo suficiente
pub const SLOW_RESPONSE_BODY: &str = "long-running operations result";

/// Construye el handler de /read-timeout con la demora dada
pub fn read_timeout_handler(delay: Duration) -> impl Fn(&Request) -> Response + Send + Sync {
    move |req: &Request| {
        tracing::debug!(path = req.path(), delay_ms = delay.as_millis() as u64, "delaying response");
        thread::sleep(delay);
        Response::text(SLOW_RESPONSE_BODY)
    }
}
