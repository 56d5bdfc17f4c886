//! # Rutas Simples
//! src/handlers/simple.rs
//!
//! - /ping: `pong`, sin caché
//! - /simple.txt: eco de `p1` y `p2` como texto
//! - /simple.json: eco de `p1` y `p2` como JSON (GET), alta (POST), eco del
//!   body (PUT)
//! - /simple: DELETE → 204
//! - /no-content: 204
//! - /parameter-types: verifica cómo serializa el cliente distintos tipos

use crate::body::CapturedBody;
use crate::fidelity::{SIMPLE_ASCII, TEST_INT};
use crate::http::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// URL del recurso "creado" por POST /simple.json
pub const CREATED_RESOURCE_URL: &str = "http://example.com/4711";

/// Eco de /simple.json; un parámetro ausente no se serializa
#[derive(Debug, Serialize)]
struct SimpleParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    p1: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p2: Option<&'a str>,
}

/// Handler para /ping
pub fn ping_handler(_req: &Request) -> Response {
    Response::text("pong").with_header("Cache-Control", "no-cache, must-revalidate")
}

/// Handler para /simple.txt (GET y POST)
///
/// Un parámetro ausente se muestra vacío: `?p1=a` → `a, `
pub fn simple_text_handler(req: &Request) -> Response {
    let p1 = req.param("p1").unwrap_or_default();
    let p2 = req.param("p2").unwrap_or_default();

    Response::text(&format!("{p1}, {p2}"))
}

/// Handler para GET /simple.json
///
/// # Ejemplo de response
/// ```json
/// {"p1":"Hello/World & Co.?","p2":"München 1 Maß 10 €"}
/// ```
pub fn simple_json_handler(req: &Request) -> Response {
    let params = SimpleParams {
        p1: req.param("p1"),
        p2: req.param("p2"),
    };

    match serde_json::to_string(&params) {
        Ok(body) => Response::json(&body),
        Err(e) => Response::error(StatusCode::InternalServerError, &e.to_string()),
    }
}

/// Handler para POST /simple.json: 201 apuntando al recurso creado
pub fn create_json_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Created)
        .with_header("Link", CREATED_RESOURCE_URL)
        .with_header("Location", CREATED_RESOURCE_URL)
}

/// Handler para PUT /simple.json: devuelve el JSON recibido
///
/// Un body vacío cuenta como `{}`; uno que no es JSON → 400.
pub fn echo_json_handler(_req: &Request, body: CapturedBody) -> Response {
    if body.bytes.iter().all(u8::is_ascii_whitespace) {
        return Response::json("{}");
    }

    match serde_json::from_slice::<Value>(&body.bytes) {
        Ok(value) => Response::json(&value.to_string()),
        Err(e) => Response::error(StatusCode::BadRequest, &format!("Invalid JSON body: {e}")),
    }
}

/// Handler para DELETE /simple
pub fn delete_handler(_req: &Request) -> Response {
    Response::new(StatusCode::NoContent)
}

/// Handler para /no-content
pub fn no_content_handler(_req: &Request) -> Response {
    Response::new(StatusCode::NoContent)
}

/// Handler para /parameter-types
///
/// Espera `string=Hello/World & Co.?`, `number=4711`, `null=` y `empty=`.
/// 204 si todo coincide, 400 si no.
pub fn parameter_types_handler(req: &Request) -> Response {
    let number = TEST_INT.to_string();
    let expected = [
        ("string", SIMPLE_ASCII),
        ("number", number.as_str()),
        ("null", ""),
        ("empty", ""),
    ];

    let mismatched: Vec<&str> = expected
        .iter()
        .filter(|(name, value)| req.param(name) != Some(*value))
        .map(|(name, _)| *name)
        .collect();

    if mismatched.is_empty() {
        Response::new(StatusCode::NoContent)
    } else {
        tracing::debug!(?mismatched, "parameter types mismatch");
        Response::error(
            StatusCode::BadRequest,
            &format!("Unexpected parameters: {}", mismatched.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{with_body, ByteCollector};
    use crate::handlers::test_support::{get, request};

    #[test]
    fn test_ping() {
        let response = ping_handler(&get("/ping"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"pong");
        assert_eq!(response.header("Cache-Control"), Some("no-cache, must-revalidate"));
    }

    #[test]
    fn test_simple_text_from_query() {
        let response = simple_text_handler(&get(
            "/simple.txt?p1=Hello%2FWorld+%26+Co.%3F&p2=M%C3%BCnchen",
        ));

        assert_eq!(response.body(), "Hello/World & Co.?, München".as_bytes());
        assert!(response.header("Content-Type").unwrap().starts_with("text/plain"));
    }

    #[test]
    fn test_simple_text_from_form() {
        let req = request(
            "POST",
            "/simple.txt",
            &[("Content-Type", "application/x-www-form-urlencoded")],
            b"p1=a&p2=b",
        );
        assert_eq!(simple_text_handler(&req).body(), b"a, b");
    }

    #[test]
    fn test_simple_text_missing_param() {
        assert_eq!(simple_text_handler(&get("/simple.txt?p1=a")).body(), b"a, ");
    }

    #[test]
    fn test_simple_json() {
        let response = simple_json_handler(&get("/simple.json?p1=x&p2=y"));
        let value: Value = serde_json::from_slice(response.body()).unwrap();

        assert_eq!(value, serde_json::json!({"p1": "x", "p2": "y"}));
    }

    #[test]
    fn test_simple_json_omits_missing() {
        let response = simple_json_handler(&get("/simple.json?p2=y"));
        assert_eq!(response.body(), br#"{"p2":"y"}"#);
    }

    #[test]
    fn test_create_json() {
        let response = create_json_handler(&request("POST", "/simple.json", &[], b""));

        assert_eq!(response.status(), StatusCode::Created);
        assert_eq!(response.header("Link"), Some(CREATED_RESOURCE_URL));
        assert_eq!(response.header("Location"), Some(CREATED_RESOURCE_URL));
    }

    #[test]
    fn test_echo_json_exact() {
        let handler = with_body(ByteCollector::new(1024), echo_json_handler);
        let response = handler(&request("PUT", "/simple.json", &[], br#"{"a":1}"#));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), br#"{"a":1}"#);
    }

    #[test]
    fn test_echo_json_keeps_key_order() {
        let handler = with_body(ByteCollector::new(1024), echo_json_handler);
        let response = handler(&request("PUT", "/simple.json", &[], br#"{ "z": 1, "a": [true, null] }"#));

        assert_eq!(response.body(), br#"{"z":1,"a":[true,null]}"#);
    }

    #[test]
    fn test_echo_json_invalid() {
        let handler = with_body(ByteCollector::new(1024), echo_json_handler);
        let response = handler(&request("PUT", "/simple.json", &[], b"{not json"));

        assert_eq!(response.status(), StatusCode::BadRequest);
    }

    #[test]
    fn test_echo_json_empty_body() {
        let handler = with_body(ByteCollector::new(1024), echo_json_handler);
        assert_eq!(handler(&request("PUT", "/simple.json", &[], b"")).body(), b"{}");
    }

    #[test]
    fn test_no_content_routes() {
        assert_eq!(delete_handler(&request("DELETE", "/simple", &[], b"")).status(), StatusCode::NoContent);
        assert_eq!(no_content_handler(&get("/no-content")).status(), StatusCode::NoContent);
    }

    #[test]
    fn test_parameter_types() {
        let ok = get("/parameter-types?string=Hello%2FWorld+%26+Co.%3F&number=4711&null=&empty=");
        assert_eq!(parameter_types_handler(&ok).status(), StatusCode::NoContent);

        let missing_null = get("/parameter-types?string=Hello%2FWorld+%26+Co.%3F&number=4711&empty=");
        assert_eq!(parameter_types_handler(&missing_null).status(), StatusCode::BadRequest);

        let wrong_number = get("/parameter-types?string=Hello%2FWorld+%26+Co.%3F&number=4712&null=&empty=");
        assert_eq!(parameter_types_handler(&wrong_number).status(), StatusCode::BadRequest);
    }
}
