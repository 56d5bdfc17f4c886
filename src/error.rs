//! # Errores del Servidor
//! src/error.rs
//!
//! Tipos de error compartidos por la capa HTTP, el colector de bytes y la
//! configuración. Ningún error sale del request que lo provocó: la conexión
//! los traduce a un código de estado y sigue atendiendo a otros clientes.

use crate::http::StatusCode;
use std::io;
use thiserror::Error;

/// Errores al leer un request del socket
#[derive(Debug, Error)]
pub enum RequestError {
    /// Error de transporte (cliente desconectado, timeout, etc.)
    #[error("stream error: {0}")]
    Io(#[from] io::Error),

    /// La conexión se cerró sin enviar nada
    #[error("connection closed before a request was received")]
    Closed,

    /// El stream terminó a mitad de la cabecera
    #[error("incomplete request head")]
    Incomplete,

    /// Cabecera HTTP malformada
    #[error("malformed request head: {0}")]
    Malformed(#[from] httparse::Error),

    /// Método HTTP no soportado
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// La cabecera supera el límite
    #[error("request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// El cuerpo supera `max_body_bytes`
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    /// Content-Length no numérico
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Framing chunked inválido
    #[error("malformed chunked body: {0}")]
    MalformedChunk(&'static str),
}

impl RequestError {
    /// Código de estado con el que se responde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Io(_) | RequestError::Closed => StatusCode::InternalServerError,
            RequestError::BodyTooLarge(_) | RequestError::HeadTooLarge(_) => {
                StatusCode::PayloadTooLarge
            }
            _ => StatusCode::BadRequest,
        }
    }
}

/// Errores del colector de bytes
#[derive(Debug, Error)]
pub enum CollectError {
    /// Error leyendo el stream del cuerpo
    #[error("failed to read request body: {0}")]
    Stream(#[source] io::Error),

    /// El cuerpo declarado como gzip no se pudo descomprimir
    #[error("failed to decode {encoding} body: {source}")]
    Decode {
        encoding: String,
        #[source]
        source: io::Error,
    },
}

impl CollectError {
    /// Un fallo de descompresión es un 406, un fallo de stream un 500
    pub fn status(&self) -> StatusCode {
        match self {
            CollectError::Stream(_) => StatusCode::InternalServerError,
            CollectError::Decode { .. } => StatusCode::NotAcceptable,
        }
    }
}

/// Errores de validación de la configuración
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid log level: {0}")]
    LogLevel(String),
}
