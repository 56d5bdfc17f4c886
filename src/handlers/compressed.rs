//! # Recurso Comprimido
//! src/handlers/compressed.rs
//!
//! /compressed.json sirve un arreglo JSON de 500 copias de la misma frase,
//! comprimido según `Accept-Encoding`. Con el token centinela `unknown` la
//! respuesta anuncia `Content-Encoding: unknown` y va sin comprimir: es una
//! falla inyectada a propósito.

use crate::compression::{negotiate, Encoding};
use crate::fidelity::SIMPLE_ASCII;
use crate::http::response::{APPLICATION_JSON, TEXT_PLAIN};
use crate::http::{Request, Response, StatusCode};
use serde_json::Value;

/// Copias de la frase en el payload
pub const PAYLOAD_COPIES: usize = 500;

/// Mensaje del 400 cuando no se pidió compresión
pub const COMPRESSION_REQUIRED: &str =
    "resource must be requested with gzip/deflate accepted as encoding";

/// `["Hello/World & Co.?", ...]` compacto
pub fn compressed_payload() -> Vec<u8> {
    Value::from(vec![SIMPLE_ASCII; PAYLOAD_COPIES]).to_string().into_bytes()
}

/// Handler para GET /compressed.json
pub fn compressed_json_handler(req: &Request) -> Response {
    let accept_encoding = req.header("Accept-Encoding");
    let Some(encoding) = negotiate(accept_encoding) else {
        tracing::warn!(accept_encoding, "compression not requested");
        return Response::new(StatusCode::BadRequest)
            .with_header("Content-Type", TEXT_PLAIN)
            .with_header("Vary", "Accept-Encoding")
            .with_body(COMPRESSION_REQUIRED);
    };

    let payload = compressed_payload();
    let body = match encoding.encode(&payload) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, encoding = encoding.token(), "compression failed");
            return Response::error(StatusCode::InternalServerError, "compression failed");
        }
    };

    if encoding == Encoding::Unsupported {
        tracing::debug!("serving payload with an undecodable Content-Encoding");
    }

    Response::new(StatusCode::Ok)
        .with_header("Content-Type", APPLICATION_JSON)
        .with_header("Content-Encoding", encoding.token())
        .with_header("Vary", "Accept-Encoding")
        .with_body_bytes(body)
}
