//! # Cabeceras y GET Condicional
//! src/handlers/headers.rs
//!
//! - /headers/in: verifica las cabeceras de prueba enviadas por el cliente
//! - /headers/out: emite las cabeceras de prueba
//! - /headers/expires: `Expires` = ahora + `offset` ms
//! - /headers/last-modified: `Last-Modified` = `lastModified`
//! - /headers/if-modified-since: 200 si el recurso es más nuevo, si no 304
//!
//! Los instantes que llegan por query (`lastModified`) aceptan milisegundos
//! desde epoch o una fecha HTTP.

use crate::fidelity::{
    self, check_inbound, format_http_date, ParsedInstant, COMPLEX_UTF8, HDR_TEST_DATUM, HDR_TEST_INT,
    HDR_TEST_STRING, SIMPLE_ASCII, TEST_INT,
};
use crate::http::{Request, Response, StatusCode};
use std::time::SystemTime;

/// `offset` por defecto de /headers/expires (1 hora)
pub const DEFAULT_EXPIRES_OFFSET_MS: i64 = 3_600_000;

/// Body de /headers/if-modified-since cuando el recurso cambió
pub const MODIFIED_BODY: &str = "modified";

/// Handler para /headers/in
///
/// 200 si todas las cabeceras coinciden, 403 si falla cualquiera.
pub fn headers_in_handler(req: &Request) -> Response {
    let report = check_inbound(req);
    tracing::debug!(
        string_ok = report.string_ok,
        int_ok = report.int_ok,
        calendar_ok = report.calendar_ok,
        date_ok = report.date_ok,
        user_agent_ok = ?report.user_agent_ok,
        "inbound header check"
    );

    if report.passed() {
        Response::new(StatusCode::Ok)
    } else {
        tracing::warn!(expected = COMPLEX_UTF8, ?report, "inbound header check failed");
        Response::new(StatusCode::Forbidden)
    }
}

/// Handler para /headers/out
pub fn headers_out_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok)
        .with_header(HDR_TEST_STRING, SIMPLE_ASCII)
        .with_header(HDR_TEST_INT, &TEST_INT.to_string())
        .with_header(HDR_TEST_DATUM, &format_http_date(SystemTime::now()))
}

/// Handler para /headers/expires?offset=N
pub fn expires_handler(req: &Request) -> Response {
    let offset = match req.param("offset") {
        None | Some("") => DEFAULT_EXPIRES_OFFSET_MS,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(offset) => offset,
            Err(_) => {
                return Response::error(
                    StatusCode::BadRequest,
                    "Parameter 'offset' must be an integer (milliseconds)",
                );
            }
        },
    };

    let Some(expires) = fidelity::offset_from(SystemTime::now(), offset) else {
        return Response::error(StatusCode::BadRequest, "Parameter 'offset' is out of range");
    };

    Response::new(StatusCode::Ok).with_header("Expires", &format_http_date(expires))
}

/// Handler para /headers/last-modified?lastModified=T
pub fn last_modified_handler(req: &Request) -> Response {
    match last_modified_param(req) {
        Ok(last_modified) => Response::new(StatusCode::Ok)
            .with_header("Last-Modified", &format_http_date(last_modified.time())),
        Err(response) => response,
    }
}

/// Handler para /headers/if-modified-since?lastModified=T
///
/// Sin `If-Modified-Since` (o con uno ilegible) el recurso se considera
/// modificado, como en cualquier GET incondicional.
pub fn if_modified_since_handler(req: &Request) -> Response {
    let last_modified = match last_modified_param(req) {
        Ok(instant) => instant,
        Err(response) => return response,
    };
    let last_modified_header = format_http_date(last_modified.time());

    let validator = req.header("If-Modified-Since").and_then(fidelity::parse_instant);
    let modified = validator.map_or(true, |since| fidelity::is_modified_since(last_modified, since));

    if modified {
        Response::text(MODIFIED_BODY).with_header("Last-Modified", &last_modified_header)
    } else {
        Response::new(StatusCode::NotModified).with_header("Last-Modified", &last_modified_header)
    }
}

fn last_modified_param(req: &Request) -> Result<ParsedInstant, Response> {
    let raw = req.param("lastModified").ok_or_else(|| {
        Response::error(StatusCode::BadRequest, "Missing required parameter: lastModified")
    })?;

    fidelity::parse_instant(raw).ok_or_else(|| {
        Response::error(
            StatusCode::BadRequest,
            "Parameter 'lastModified' must be epoch milliseconds or an HTTP date between 1970 and 9999",
        )
    })
}
