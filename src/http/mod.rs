//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Lo mínimo de HTTP/1.1 que necesita el servidor de fixtures:
//!
//! - Lectura de requests (cabecera con `httparse`, cuerpo por
//!   `Content-Length` o chunked)
//! - Construcción y serialización de responses
//! - Códigos de estado
//!
//! Todas las respuestas se envían con `Connection: close`: una conexión,
//! un request.

pub mod chunked;
pub mod request;
pub mod response;
pub mod status;

pub use request::{Header, Method, Request};
pub use response::{Framing, Response};
pub use status::StatusCode;
