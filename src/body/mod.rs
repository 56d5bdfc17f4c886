//! # Captura de Bodies
//! src/body/mod.rs
//!
//! El colector de bytes se compone como pre-etapa delante de los handlers que
//! necesitan el cuerpo:
//!
//! ```text
//! Request → ByteCollector → handler(request, CapturedBody) → Response
//!                 │
//!                 └─ error → 406 (gzip inválido) / 500 (stream)
//! ```

pub mod collector;

pub use collector::{ByteCollector, CapturedBody, CapturedText};

use crate::error::CollectError;
use crate::http::{Request, Response};

/// Envuelve un handler que recibe el body ya capturado
pub fn with_body<F>(collector: ByteCollector, handler: F) -> impl Fn(&Request) -> Response + Send + Sync
where
    F: Fn(&Request, CapturedBody) -> Response + Send + Sync,
{
    move |request: &Request| {
        match collector.collect(request.body_reader(), request.header("Content-Encoding")) {
            Ok(body) => handler(request, body),
            Err(err) => reject(request, &err),
        }
    }
}

/// Igual que `with_body`, con la variante de texto UTF-8
pub fn with_text<F>(collector: ByteCollector, handler: F) -> impl Fn(&Request) -> Response + Send + Sync
where
    F: Fn(&Request, CapturedText) -> Response + Send + Sync,
{
    move |request: &Request| {
        match collector.collect_text(request.body_reader(), request.header("Content-Encoding")) {
            Ok(text) => handler(request, text),
            Err(err) => reject(request, &err),
        }
    }
}

fn reject(request: &Request, err: &CollectError) -> Response {
    tracing::warn!(path = request.path(), error = %err, "body capture failed");
    Response::error(err.status(), &err.to_string())
}
