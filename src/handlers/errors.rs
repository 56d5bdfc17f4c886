//! # Errores Simulados
//! src/handlers/errors.rs
//!
//! - /error/{500,400}/no-content: el status con su reason phrase como texto
//! - /error/{500,400}/with-content: el status con un JSON de error
//! - /error/503/{requestTimestamp}/{retryCount}: simulador de reintentos

use crate::http::{Method, Request, Response, StatusCode};
use crate::retry::{RetryOutcome, RetryStore};
use std::sync::Arc;

/// Body de la respuesta exitosa del simulador de reintentos
pub const RETRY_SUCCESS_BODY: &str = "Now it works";

/// Body JSON de las rutas `with-content`
pub const ERROR_MESSAGE: &str = "an error has occurred";

fn without_content(status: StatusCode) -> Response {
    Response::new(status)
        .with_header("Content-Type", crate::http::response::TEXT_PLAIN)
        .with_body(status.reason_phrase())
}

fn with_content(status: StatusCode) -> Response {
    let body = serde_json::json!({ "msg": ERROR_MESSAGE }).to_string();
    Response::json(&body).with_status(status)
}

/// Handler para /error/500/no-content
pub fn server_error_handler(_req: &Request) -> Response {
    without_content(StatusCode::InternalServerError)
}

/// Handler para /error/500/with-content
pub fn server_error_with_content_handler(_req: &Request) -> Response {
    with_content(StatusCode::InternalServerError)
}

/// Handler para /error/400/no-content
pub fn bad_request_handler(_req: &Request) -> Response {
    without_content(StatusCode::BadRequest)
}

/// Handler para /error/400/with-content
pub fn bad_request_with_content_handler(_req: &Request) -> Response {
    with_content(StatusCode::BadRequest)
}

/// Construye el handler de /error/503/{requestTimestamp}/{retryCount}
///
/// Responde 503 mientras la clave `requestTimestamp` tenga menos fallos
/// emitidos que `retryCount`, y 200 después. Un `retryCount` que no es un
/// entero no negativo → 400. HEAD informa el estado sin contar un intento.
pub fn retry_handler(store: Arc<RetryStore>) -> impl Fn(&Request) -> Response + Send + Sync {
    move |req: &Request| {
        let key = req.path_param("requestTimestamp").unwrap_or_default();
        let Some(target) = req.path_param("retryCount").and_then(|c| c.parse::<u32>().ok()) else {
            return Response::error(
                StatusCode::BadRequest,
                "Parameter 'retryCount' must be a non-negative integer",
            );
        };

        let outcome = if req.method() == Method::HEAD {
            store.peek(key, target)
        } else {
            store.simulate(key, target)
        };

        match outcome {
            RetryOutcome::TransientFailure { attempt, target } => {
                tracing::info!(key, attempt, target, "retry simulation: transient failure");
                Response::new(StatusCode::ServiceUnavailable)
            }
            RetryOutcome::Success { .. } => Response::text(RETRY_SUCCESS_BODY),
        }
    }
}
