//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea método + path a un handler.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Los patrones se comparan segmento a segmento; un segmento `{nombre}`
//! captura cualquier valor no vacío y lo deja en `Request::path_param`:
//!
//! ```text
//! /error/503/{requestTimestamp}/{retryCount}
//! /error/503/1700000000000/3   → requestTimestamp = "1700000000000", retryCount = "3"
//! ```
//!
//! Gana la primera ruta registrada que coincida. Un request HEAD usa las
//! rutas GET. Si nada coincide, se responde 404 Not Found.

use crate::http::{Method, Request, Response, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!("http_fixture_server/", env!("CARGO_PKG_VERSION"));

/// Tipo de función handler
///
/// Un handler recibe un Request y retorna una Response. Puede capturar
/// estado compartido (por eso es un closure y no un `fn`).
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route {
    /// `None` acepta cualquier método
    method: Option<Method>,
    pattern: String,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    fn accepts(&self, method: Method) -> bool {
        match self.method {
            None => true,
            Some(expected) => expected == method || (method == Method::HEAD && expected == Method::GET),
        }
    }

    /// Parámetros capturados si el path coincide con el patrón
    fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.trim_start_matches('/').split('/')
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_path(pattern)
        .map(|part| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(part.to_string()),
        })
        .collect()
}

/// Router que mapea método + patrón de path a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler. `method = None` acepta cualquier
    /// método.
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::router::Router;
    /// use http_fixture_server::http::{Method, Request, Response};
    ///
    /// fn ping_handler(_req: &Request) -> Response {
    ///     Response::text("pong")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Some(Method::GET), "/ping", ping_handler);
    /// router.register(None, "/echo/{word}", |req: &Request| {
    ///     Response::text(req.path_param("word").unwrap_or_default())
    /// });
    /// ```
    pub fn register<F>(&mut self, method: Option<Method>, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            segments: parse_pattern(pattern),
            handler: Arc::new(handler),
        });
    }

    /// Atajo para `register(Some(Method::GET), ...)`
    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.register(Some(Method::GET), pattern, handler);
    }

    /// Atajo para `register(Some(Method::POST), ...)`
    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.register(Some(Method::POST), pattern, handler);
    }

    /// Atajo para `register(None, ...)`
    pub fn any<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.register(None, pattern, handler);
    }

    /// Número de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Si ninguna ruta acepta el método y el path, retorna 404 Not Found.
    pub fn route(&self, request: &mut Request) -> Response {
        let method = request.method();

        let matched = self
            .routes
            .iter()
            .filter(|route| route.accepts(method))
            .find_map(|route| route.captures(request.path()).map(|params| (route, params)));

        let mut response = match matched {
            Some((route, params)) => {
                tracing::trace!(pattern = %route.pattern, ?params, "route matched");
                request.set_path_params(params);
                (route.handler)(&*request)
            }
            None => Response::error(
                StatusCode::NotFound,
                &format!("Route not found: {} {}", method.as_str(), request.path()),
            ),
        };

        self.add_common_headers(&mut response);
        response
    }

    /// Agrega headers comunes a todas las respuestas
    pub(crate) fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Server", SERVER_NAME);
        response.add_header("Connection", "close");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
