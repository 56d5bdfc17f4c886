//! # Verificación de Uploads
//! src/handlers/upload.rs
//!
//! - /upload: el body debe ser exactamente 5000 caracteres `@` → 201, si no 500
//! - /upload-compressed: lo mismo tras descomprimir gzip, y además el tamaño
//!   en el cable debe ser menor a 1000 bytes (prueba que el cliente comprimió)

use crate::body::{CapturedBody, CapturedText};
use crate::http::{Request, Response, StatusCode};
use regex::Regex;
use std::sync::OnceLock;

/// Cantidad de `@` que debe traer un upload
pub const UPLOAD_CHAR_COUNT: usize = 5000;

/// Tope (exclusivo) para el tamaño comprimido en el cable
pub const MAX_COMPRESSED_WIRE_BYTES: usize = 1000;

static UPLOAD_PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn matches_upload(text: &str) -> Result<bool, &'static regex::Error> {
    let pattern = UPLOAD_PATTERN
        .get_or_init(|| Regex::new(&format!("^@{{{UPLOAD_CHAR_COUNT}}}$")))
        .as_ref()?;
    Ok(pattern.is_match(text))
}

fn verdict(req: &Request, text: &str, wire_ok: bool) -> Response {
    match matches_upload(text) {
        Ok(true) if wire_ok => Response::new(StatusCode::Created),
        Ok(_) => {
            tracing::warn!(path = req.path(), chars = text.chars().count(), wire_ok, "unexpected upload");
            Response::new(StatusCode::InternalServerError)
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid upload pattern");
            Response::new(StatusCode::InternalServerError)
        }
    }
}

/// Handler para POST /upload
pub fn upload_handler(req: &Request, captured: CapturedText) -> Response {
    verdict(req, &captured.text, true)
}

/// Handler para POST /upload-compressed
///
/// Un gzip inválido ya fue rechazado con 406 por el colector.
pub fn upload_compressed_handler(req: &Request, body: CapturedBody) -> Response {
    let text = String::from_utf8_lossy(&body.bytes);
    let wire_ok = body.byte_length < MAX_COMPRESSED_WIRE_BYTES;

    tracing::debug!(
        wire_bytes = body.byte_length,
        decoded_bytes = body.bytes.len(),
        decoded = body.was_decoded(),
        "compressed upload received"
    );

    verdict(req, &text, wire_ok)
}
