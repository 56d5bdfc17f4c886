//! # Lectura de Requests HTTP/1.1
//! src/http/request.rs
//!
//! La cabecera se parsea con `httparse`; el cuerpo se enmarca según
//! `Transfer-Encoding: chunked` o `Content-Length`.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /upload?file HTTP/1.1\r\n
//! Host: localhost:3003\r\n
//! Content-Length: 5000\r\n
//! \r\n
//! @@@@@@...
//! ```
//!
//! Los valores de las cabeceras se guardan como bytes crudos: las pruebas de
//! fidelidad comparan textos no ASCII byte a byte, así que no se puede
//! normalizar nada al leer.

use super::chunked;
use crate::error::RequestError;
use std::collections::HashMap;
use std::io::{self, BufRead, Cursor, Read, Write};
use std::str::FromStr;

/// Tamaño máximo de la cabecera (request line + headers)
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Número máximo de headers por request
const MAX_HEADERS: usize = 64;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Respuesta provisional a `Expect: 100-continue`
pub const CONTINUE_LINE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// Cómo viene enmarcado el cuerpo del request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFraming {
    Empty,
    Length(usize),
    Chunked,
}

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(RequestError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Un header tal como llegó por el cable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: Vec<u8>,
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path sin query (ej: "/error/503/1700000000000/3")
    path: String,

    /// Query parameters en orden de aparición
    query_params: Vec<(String, String)>,

    /// Campos de un body `application/x-www-form-urlencoded`
    form_params: Vec<(String, String)>,

    /// Parámetros extraídos del patrón de la ruta por el router
    path_params: HashMap<String, String>,

    headers: Vec<Header>,

    /// Versión menor: 0 para HTTP/1.0, 1 para HTTP/1.1
    version: u8,

    /// Body ya sin framing chunked, pero sin decodificar Content-Encoding
    body: Vec<u8>,
}

impl Request {
    /// Parsea un request completo desde un buffer en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_fixture_server::http::Request;
    ///
    /// let raw = b"GET /simple.txt?p1=a&p2=b HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/simple.txt");
    /// assert_eq!(request.query_param("p1"), Some("a"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, RequestError> {
        Self::read_from(&mut Cursor::new(buffer), usize::MAX)
    }

    /// Lee un request del stream: cabecera primero, luego exactamente el
    /// cuerpo que declara el framing.
    pub fn read_from<R: BufRead>(reader: &mut R, max_body: usize) -> Result<Self, RequestError> {
        Self::read_with_interim(reader, max_body, io::sink())
    }

    /// Como [`Request::read_from`], pero si el cliente envía
    /// `Expect: 100-continue` escribe `100 Continue` en `interim` antes de
    /// leer el cuerpo. Un cuerpo declarado demasiado grande se rechaza sin
    /// enviar la respuesta provisional.
    pub fn read_with_interim<R: BufRead, W: Write>(
        reader: &mut R,
        max_body: usize,
        mut interim: W,
    ) -> Result<Self, RequestError> {
        let head = Self::read_head(reader)?;

        let mut raw_headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut parsed = httparse::Request::new(&mut raw_headers);
        if parsed.parse(&head)?.is_partial() {
            return Err(RequestError::Incomplete);
        }

        let method: Method = parsed.method.unwrap_or_default().parse()?;
        let target = parsed.path.unwrap_or("/");
        let version = parsed.version.unwrap_or(1);
        let headers: Vec<Header> = parsed
            .headers
            .iter()
            .map(|h| Header {
                name: h.name.to_string(),
                value: h.value.to_vec(),
            })
            .collect();

        let (path, query_params) = Self::parse_path_and_query(target);

        let mut request = Request {
            method,
            path,
            query_params,
            form_params: Vec::new(),
            path_params: HashMap::new(),
            headers,
            version,
            body: Vec::new(),
        };

        let framing = request.body_framing(max_body)?;
        if framing != BodyFraming::Empty && request.expects_continue() {
            interim.write_all(CONTINUE_LINE)?;
            interim.flush()?;
        }

        request.body = match framing {
            BodyFraming::Empty => Vec::new(),
            BodyFraming::Chunked => chunked::read_chunked(reader, max_body)?,
            BodyFraming::Length(len) => {
                let mut body = vec![0u8; len];
                reader.read_exact(&mut body)?;
                body
            }
        };
        request.form_params = request.parse_form();

        Ok(request)
    }

    /// Lee líneas hasta la línea vacía que cierra la cabecera
    fn read_head<R: BufRead>(reader: &mut R) -> Result<Vec<u8>, RequestError> {
        let mut head = Vec::with_capacity(1024);

        loop {
            let start = head.len();
            let remaining = (MAX_HEAD_BYTES + 1).saturating_sub(start) as u64;
            let read = reader.by_ref().take(remaining).read_until(b'\n', &mut head)?;

            if read == 0 {
                return if head.is_empty() {
                    Err(RequestError::Closed)
                } else {
                    Err(RequestError::Incomplete)
                };
            }
            if head.len() > MAX_HEAD_BYTES {
                return Err(RequestError::HeadTooLarge(MAX_HEAD_BYTES));
            }

            let line = &head[start..];
            if line == b"\r\n" || line == b"\n" {
                // RFC 9112 §2.2: ignorar líneas vacías antes de la request line
                if start == 0 {
                    head.clear();
                    continue;
                }
                return Ok(head);
            }
        }
    }

    fn body_framing(&self, max_body: usize) -> Result<BodyFraming, RequestError> {
        let chunked = self
            .header("Transfer-Encoding")
            .and_then(|te| te.rsplit(',').next())
            .map(|last| last.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false);

        if chunked {
            return Ok(BodyFraming::Chunked);
        }

        let Some(raw_len) = self.header("Content-Length") else {
            return Ok(BodyFraming::Empty);
        };
        let len: usize = raw_len
            .trim()
            .parse()
            .map_err(|_| RequestError::InvalidContentLength(raw_len.to_string()))?;
        if len > max_body {
            return Err(RequestError::BodyTooLarge(max_body));
        }

        Ok(if len == 0 { BodyFraming::Empty } else { BodyFraming::Length(len) })
    }

    /// `Expect: 100-continue` en un request HTTP/1.1 (RFC 9110 §10.1.1: a un
    /// cliente HTTP/1.0 no se le envía 100)
    fn expects_continue(&self) -> bool {
        self.version >= 1
            && self
                .header("Expect")
                .map(|value| value.trim().eq_ignore_ascii_case("100-continue"))
                .unwrap_or(false)
    }

    /// Separa path y query. Ej: "/simple.txt?p1=a" → ("/simple.txt", [("p1", "a")])
    fn parse_path_and_query(target: &str) -> (String, Vec<(String, String)>) {
        match target.split_once('?') {
            Some((path, query)) => (path.to_string(), parse_urlencoded(query.as_bytes())),
            None => (target.to_string(), Vec::new()),
        }
    }

    fn parse_form(&self) -> Vec<(String, String)> {
        let is_form = self
            .header("Content-Type")
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
            .unwrap_or(false);

        if is_form && self.header("Content-Encoding").is_none() {
            parse_urlencoded(&self.body)
        } else {
            Vec::new()
        }
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::http::Request;
    ///
    /// let raw = b"GET /test?lastModified=42 HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.query_param("lastModified"), Some("42"));
    /// assert_eq!(request.query_param("missing"), None);
    /// ```
    pub fn query_param(&self, name: &str) -> Option<&str> {
        lookup(&self.query_params, name)
    }

    pub fn form_param(&self, name: &str) -> Option<&str> {
        lookup(&self.form_params, name)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Busca un parámetro en la ruta, luego en el formulario y por último en
    /// la query
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_param(name)
            .or_else(|| self.form_param(name))
            .or_else(|| self.query_param(name))
    }

    pub(crate) fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = params;
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Valor crudo del primer header con ese nombre (sin distinguir mayúsculas)
    pub fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_slice())
    }

    /// Valor del header como texto; `None` si falta o no es UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_bytes(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    /// "HTTP/1.0" o "HTTP/1.1"
    pub fn version(&self) -> &'static str {
        if self.version == 0 {
            "HTTP/1.0"
        } else {
            "HTTP/1.1"
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Stream de lectura sobre el body, para el colector de bytes
    pub fn body_reader(&self) -> impl Read + '_ {
        self.body.as_slice()
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn parse_urlencoded(input: &[u8]) -> Vec<(String, String)> {
    serde_urlencoded::from_bytes(input).unwrap_or_default()
}
