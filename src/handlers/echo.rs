//! # Ecos
//! src/handlers/echo.rs
//!
//! - /echoText: devuelve el texto recibido (gzip ya descomprimido)
//! - /echoBin: devuelve los bytes tal como llegaron, con framing chunked

use crate::body::CapturedText;
use crate::http::response::TEXT_PLAIN;
use crate::http::{Request, Response, StatusCode};

const OCTET_STREAM: &str = "application/octet-stream";

/// Query param que reemplaza el `Content-Encoding` de la respuesta
pub const FORCE_CONTENT_ENCODING: &str = "force-content-encoding";

/// Handler para POST /echoText
pub fn echo_text_handler(_req: &Request, captured: CapturedText) -> Response {
    Response::new(StatusCode::Ok)
        .with_header("Content-Type", TEXT_PLAIN)
        .with_body(&captured.text)
}

/// Handler para POST /echoBin
///
/// El body no se descomprime: si el cliente mandó gzip, recibe el mismo gzip
/// con el mismo `Content-Encoding`. `?force-content-encoding=X` fuerza otro
/// valor (por ejemplo `identity` o una codificación que el cliente no sabe
/// decodificar).
pub fn echo_bin_handler(req: &Request) -> Response {
    let content_type = req.header("Content-Type").unwrap_or(OCTET_STREAM);
    let encoding = req
        .query_param(FORCE_CONTENT_ENCODING)
        .filter(|e| !e.is_empty())
        .or_else(|| req.header("Content-Encoding"));

    let mut response = Response::new(StatusCode::Ok)
        .with_header("Content-Type", content_type)
        .with_body_bytes(req.body().to_vec())
        .chunked();

    if let Some(encoding) = encoding {
        response.add_header("Content-Encoding", encoding);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{with_text, ByteCollector};
    use crate::handlers::test_support::request;
    use crate::http::Framing;

    #[test]
    fn test_echo_text() {
        let handler = with_text(ByteCollector::new(1024), echo_text_handler);
        let body = "München 1 Maß 10 €";
        let response = handler(&request("POST", "/echoText", &[], body.as_bytes()));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), body.as_bytes());
        assert_eq!(response.header("Content-Type"), Some("text/plain; charset=UTF-8"));
    }

    #[test]
    fn test_echo_bin_binary() {
        let body = [0x00u8, 0xFF, 0x1F, 0x8B, 0x0D, 0x0A];
        let response = echo_bin_handler(&request("POST", "/echoBin", &[], &body));

        assert_eq!(response.body(), &body);
        assert_eq!(response.framing(), Framing::Chunked);
        assert_eq!(response.header("Content-Type"), Some(OCTET_STREAM));
        assert_eq!(response.header("Content-Encoding"), None);
    }

    #[test]
    fn test_echo_bin_keeps_request_encoding() {
        let req = request(
            "POST",
            "/echoBin",
            &[("Content-Type", "application/json"), ("Content-Encoding", "gzip")],
            b"\x1f\x8bnot really",
        );
        let response = echo_bin_handler(&req);

        assert_eq!(response.body(), b"\x1f\x8bnot really");
        assert_eq!(response.header("Content-Encoding"), Some("gzip"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_echo_bin_forced_encoding() {
        let req = request(
            "POST",
            "/echoBin?force-content-encoding=identity",
            &[("Content-Encoding", "gzip")],
            b"abc",
        );
        assert_eq!(echo_bin_handler(&req).header("Content-Encoding"), Some("identity"));
    }
}
