//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP/1.1 y serializarlas al socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 4\r\n
//! \r\n
//! pong
//! ```
//!
//! `Content-Length` se calcula al serializar, nunca se guarda como header:
//! así un 204/304 sale sin cuerpo y sin longitud aunque alguien le asigne uno.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_fixture_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"message": "Hello"}"#);
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::chunked;
use super::StatusCode;
use std::io::{self, Write};

pub const TEXT_PLAIN: &str = "text/plain; charset=UTF-8";
pub const APPLICATION_JSON: &str = "application/json; charset=UTF-8";

/// Cómo se enmarca el cuerpo en el cable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Con `Content-Length`
    Length,
    /// Con `Transfer-Encoding: chunked`
    Chunked,
}

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de inserción; un nombre aparece una sola vez
    headers: Vec<(String, String)>,

    body: Vec<u8>,

    framing: Framing,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            framing: Framing::Length,
        }
    }

    /// Agrega un header. Si ya existe (sin distinguir mayúsculas) se
    /// sobrescribe.
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Type", "text/plain")
    ///     .with_header("content-type", "application/json");
    ///
    /// assert_eq!(response.header("Content-Type"), Some("application/json"));
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Cambia el código de estado
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Envía el cuerpo con `Transfer-Encoding: chunked`
    pub fn chunked(mut self) -> Self {
        self.framing = Framing::Chunked;
        self
    }

    /// 200 con `text/plain`
    pub fn text(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", TEXT_PLAIN)
            .with_body(body)
    }

    /// Crea una respuesta JSON exitosa (200 OK)
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::http::Response;
    ///
    /// let response = Response::json(r#"{"status": "ok"}"#);
    /// assert!(response.header("Content-Type").unwrap().starts_with("application/json"));
    /// ```
    pub fn json(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", APPLICATION_JSON)
            .with_body(body)
    }

    /// Crea una respuesta de error con mensaje JSON: `{"error": "mensaje"}`
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status)
            .with_header("Content-Type", APPLICATION_JSON)
            .with_body(&body)
    }

    /// Serializa la respuesta completa en memoria
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256 + self.body.len());
        // Escribir en un Vec no falla
        let _ = self.write_to(&mut out, false);
        out
    }

    /// Escribe status line, headers y body (salvo `head_only`, para HEAD)
    pub fn write_to<W: Write>(&self, writer: &mut W, head_only: bool) -> io::Result<()> {
        write!(writer, "HTTP/1.1 {}\r\n", self.status)?;

        for (name, value) in &self.headers {
            writer.write_all(name.as_bytes())?;
            writer.write_all(b": ")?;
            writer.write_all(value.as_bytes())?;
            writer.write_all(b"\r\n")?;
        }

        let send_body = !self.status.forbids_body();
        if send_body {
            match self.framing {
                Framing::Length => write!(writer, "Content-Length: {}\r\n", self.body.len())?,
                Framing::Chunked => writer.write_all(b"Transfer-Encoding: chunked\r\n")?,
            }
        }

        writer.write_all(b"\r\n")?;

        if send_body && !head_only {
            match self.framing {
                Framing::Length => writer.write_all(&self.body)?,
                Framing::Chunked => chunked::write_chunked(writer, &self.body)?,
            }
        }

        Ok(())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Busca un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }
}
