//! # HTTP Fixture Server
//! src/lib.rs
//!
//! Servidor HTTP de fixtures: produce condiciones de protocolo controladas y
//! reproducibles para probar un cliente HTTP (errores con reintento,
//! redirecciones, respuestas lentas, bodies comprimidos o chunked, cabeceras
//! con texto no ASCII y fechas, GET condicional).
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Lectura de requests y escritura de responses HTTP/1.1
//! - `server`: Listener TCP, un thread por conexión, tabla de rutas
//! - `router`: Enrutamiento por método y patrón de path
//! - `body`: Colector de bytes (con descompresión gzip)
//! - `retry`: Simulador de reintentos con contadores que expiran
//! - `fidelity`: Valores de cabeceras de prueba, fechas HTTP
//! - `compression`: Negociación de `Accept-Encoding`
//! - `handlers`: Una función por simulación
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http_fixture_server::config::Config;
//! use http_fixture_server::server::Server;
//!
//! let mut config = Config::default();
//! config.port = 0;
//!
//! let mut server = Server::new(config);
//! let addr = server.bind().expect("bind");
//! println!("listening on {addr}");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod body;
pub mod compression;
pub mod config;
pub mod error;
pub mod fidelity;
pub mod handlers;
pub mod http;
pub mod retry;
pub mod router;
pub mod server;
