//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee y parsea un request HTTP por conexión
//! 4. Lo despacha al router y escribe la respuesta
//!
//! La tabla de rutas se arma en `routes.rs`.

mod routes;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use routes::build_router;
pub use tcp::Server;
