//! # Redirecciones
//! src/handlers/redirect.rs
//!
//! El servidor sólo garantiza el status y el `Location`; qué método usa el
//! cliente al seguir un 301 o un 303 lo verifica el test del cliente.

use crate::http::{Request, Response, StatusCode};

/// Destino de todas las redirecciones
pub const REDIRECT_TARGET: &str = "/redirect/target";

/// Body del destino
pub const REDIRECT_TARGET_BODY: &str = "redirected to target";

fn redirect(status: StatusCode) -> Response {
    Response::new(status)
        .with_header("Location", REDIRECT_TARGET)
        .with_header("Content-Type", crate::http::response::TEXT_PLAIN)
        .with_body(&format!("{}. Redirecting to {}", status.reason_phrase(), REDIRECT_TARGET))
}

/// Handler para /redirect/301 (cualquier método)
pub fn moved_permanently_handler(_req: &Request) -> Response {
    redirect(StatusCode::MovedPermanently)
}

/// Handler para POST /redirect/303
pub fn see_other_handler(_req: &Request) -> Response {
    redirect(StatusCode::SeeOther)
}

/// Handler para /redirect/target
pub fn redirect_target_handler(_req: &Request) -> Response {
    Response::text(REDIRECT_TARGET_BODY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{get, request};

    #[test]
    fn test_301() {
        let response = moved_permanently_handler(&request("PUT", "/redirect/301", &[], b"x"));

        assert_eq!(response.status(), StatusCode::MovedPermanently);
        assert_eq!(response.header("Location"), Some(REDIRECT_TARGET));
    }

    #[test]
    fn test_303() {
        let response = see_other_handler(&request("POST", "/redirect/303", &[], b""));

        assert_eq!(response.status(), StatusCode::SeeOther);
        assert_eq!(response.header("Location"), Some(REDIRECT_TARGET));
    }

    #[test]
    fn test_target() {
        let response = redirect_target_handler(&get(REDIRECT_TARGET));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), REDIRECT_TARGET_BODY.as_bytes());
    }
}
