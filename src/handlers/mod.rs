//! # Handlers de Simulación
//! src/handlers/mod.rs
//!
//! Un módulo por familia de rutas. Los handlers sin estado son funciones
//! `fn(&Request) -> Response`; los que necesitan estado (store de reintentos,
//! demora configurada, colector de bytes) se construyen como closures que
//! capturan ese estado al registrar la ruta.
//!
//! ## Familias
//!
//! - **simple**: ping, eco de parámetros, CRUD mínimo sobre `/simple*`
//! - **errors**: errores fijos y el simulador de reintentos (`/error/503/...`)
//! - **headers**: fidelidad de cabeceras y GET condicional
//! - **redirect**: 301 / 303 y su destino
//! - **timeouts**: respuesta demorada
//! - **upload**: verificación de bodies subidos (planos y gzip)
//! - **echo**: eco de texto y de binario
//! - **compressed**: negociación de `Accept-Encoding`

pub mod compressed;
pub mod echo;
pub mod errors;
pub mod headers;
pub mod redirect;
pub mod simple;
pub mod timeouts;
pub mod upload;

pub use compressed::*;
pub use echo::*;
pub use errors::*;
pub use headers::*;
pub use redirect::*;
pub use simple::*;
pub use timeouts::*;
pub use upload::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::http::Request;

    /// Parsea un request de prueba; `headers` van sin `\r\n` final
    pub fn request(method: &str, target: &str, headers: &[(&str, &str)], body: &[u8]) -> Request {
        let mut raw = format!("{method} {target} HTTP/1.1\r\n").into_bytes();
        for (name, value) in headers {
            raw.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        raw.extend_from_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
        raw.extend_from_slice(body);
        Request::parse(&raw).unwrap()
    }

    pub fn get(target: &str) -> Request {
        request("GET", target, &[], b"")
    }
}
