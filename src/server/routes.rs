//! # Tabla de Rutas
//! src/server/routes.rs
//!
//! Registra cada simulación en el router. Las rutas que necesitan el body
//! pasan primero por el colector de bytes; las que necesitan estado lo
//! reciben acá.

use crate::body::{with_body, with_text, ByteCollector};
use crate::config::Config;
use crate::handlers;
use crate::http::Method;
use crate::retry::RetryStore;
use crate::router::Router;
use std::sync::Arc;

/// Construye el router con todas las rutas del servidor de fixtures
pub fn build_router(config: &Config, retry_store: Arc<RetryStore>) -> Router {
    let mut router = Router::new();
    let collector = ByteCollector::new(config.max_body_bytes);

    // Rutas simples
    router.get("/ping", handlers::ping_handler);
    router.get("/no-content", handlers::no_content_handler);
    router.get("/parameter-types", handlers::parameter_types_handler);
    router.get("/simple.txt", handlers::simple_text_handler);
    router.post("/simple.txt", handlers::simple_text_handler);
    router.get("/simple.json", handlers::simple_json_handler);
    router.post("/simple.json", handlers::create_json_handler);
    router.register(
        Some(Method::PUT),
        "/simple.json",
        with_body(collector, handlers::echo_json_handler),
    );
    router.register(Some(Method::DELETE), "/simple", handlers::delete_handler);

    // Errores y reintentos
    router.any("/error/500/no-content", handlers::server_error_handler);
    router.any("/error/500/with-content", handlers::server_error_with_content_handler);
    router.get("/error/400/no-content", handlers::bad_request_handler);
    router.get("/error/400/with-content", handlers::bad_request_with_content_handler);
    router.get(
        "/error/503/{requestTimestamp}/{retryCount}",
        handlers::retry_handler(retry_store),
    );

    // Cabeceras
    router.get("/headers/in", handlers::headers_in_handler);
    router.get("/headers/out", handlers::headers_out_handler);
    router.get("/headers/expires", handlers::expires_handler);
    router.get("/headers/if-modified-since", handlers::if_modified_since_handler);
    router.get("/headers/last-modified", handlers::last_modified_handler);

    // Redirecciones
    router.any("/redirect/301", handlers::moved_permanently_handler);
    router.post("/redirect/303", handlers::see_other_handler);
    router.get("/redirect/target", handlers::redirect_target_handler);

    // Timing
    router.any(
        "/read-timeout",
        handlers::read_timeout_handler(config.read_timeout_delay()),
    );

    // Uploads y ecos
    router.post("/upload", with_text(collector, handlers::upload_handler));
    router.post(
        "/upload-compressed",
        with_body(collector, handlers::upload_compressed_handler),
    );
    router.post("/echoText", with_text(collector, handlers::echo_text_handler));
    router.post("/echoBin", handlers::echo_bin_handler);

    // Compresión
    router.get("/compressed.json", handlers::compressed_json_handler);

    tracing::debug!(routes = router.len(), "router built");
    router
}
