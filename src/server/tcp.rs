//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio thread
//! y atiende exactamente un request (`Connection: close`).
//!
//! Cada respuesta lleva `Date` y un `X-Request-Id` único en el proceso, que
//! también aparece en el span de logging del request.

use super::routes::build_router;
use crate::config::Config;
use crate::error::RequestError;
use crate::http::{Method, Request, Response};
use crate::retry::RetryStore;
use crate::router::Router;
use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Genera el siguiente id de request (16 dígitos hex)
fn next_request_id() -> String {
    format!("{:016x}", NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
}

/// Límites que se aplican a cada conexión
#[derive(Debug, Clone, Copy)]
struct ConnectionLimits {
    max_body_bytes: usize,
    io_timeout: Duration,
}

/// Servidor HTTP/1.1 de fixtures
pub struct Server {
    config: Config,
    router: Arc<Router>,
    retry_store: Arc<RetryStore>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let retry_store = Arc::new(RetryStore::new(config.retry_retention()));
        let router = build_router(&config, Arc::clone(&retry_store));

        Self {
            config,
            router: Arc::new(router),
            retry_store,
            listener: None,
        }
    }

    /// Store de reintentos del servidor, para inspeccionarlo o vaciarlo
    pub fn retry_store(&self) -> Arc<RetryStore> {
        Arc::clone(&self.retry_store)
    }

    /// Abre el socket sin empezar a aceptar conexiones. Retorna la dirección
    /// real (útil con `port = 0`).
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.config.address())?;
        let local = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local)
    }

    /// Acepta conexiones hasta que el listener falle. Hace `bind` si hace
    /// falta.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let Some(listener) = self.listener.as_ref() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "listener not bound"));
        };

        tracing::info!(
            address = %listener.local_addr()?,
            retry_retention_secs = self.config.retry_retention_secs,
            read_timeout_delay_ms = self.config.read_timeout_delay_ms,
            "fixture server listening (one thread per connection)"
        );

        let limits = ConnectionLimits {
            max_body_bytes: self.config.max_body_bytes,
            io_timeout: self.config.io_timeout(),
        };

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let spawned = thread::Builder::new()
                        .name("fixture-conn".to_string())
                        .spawn(move || {
                            if let Err(e) = Self::handle_connection(stream, router, limits) {
                                tracing::warn!(error = %e, "connection error");
                            }
                        });

                    if let Err(e) = spawned {
                        tracing::error!(error = %e, "failed to spawn connection thread");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        stream: TcpStream,
        router: Arc<Router>,
        limits: ConnectionLimits,
    ) -> io::Result<()> {
        let start = Instant::now();
        let request_id = next_request_id();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let span = tracing::info_span!("request", id = %request_id, %peer);
        let _guard = span.enter();

        stream.set_read_timeout(Some(limits.io_timeout))?;
        stream.set_write_timeout(Some(limits.io_timeout))?;

        let mut reader = BufReader::new(stream.try_clone()?);

        let read = Request::read_with_interim(&mut reader, limits.max_body_bytes, &stream);
        let (mut response, method, path) = match read {
            Ok(mut request) => {
                let method = request.method();
                let path = request.path().to_string();
                tracing::debug!(method = method.as_str(), %path, version = request.version(), "request received");
                (router.route(&mut request), Some(method), path)
            }
            Err(RequestError::Closed) => {
                tracing::debug!("connection closed without a request");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected request");
                let mut response = Response::error(e.status(), &format!("Invalid request: {e}"));
                router.add_common_headers(&mut response);
                (response, None, "-".to_string())
            }
        };

        response.add_header("Date", &httpdate::fmt_http_date(SystemTime::now()));
        response.add_header("X-Request-Id", &request_id);

        let head_only = method == Some(Method::HEAD);
        let mut writer = BufWriter::new(&stream);
        response.write_to(&mut writer, head_only)?;
        writer.flush()?;
        drop(writer);

        // Sin más requests en esta conexión
        let _ = stream.shutdown(Shutdown::Write);

        tracing::info!(
            method = method.map_or("-", |m| m.as_str()),
            %path,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request completed"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn limits() -> ConnectionLimits {
        ConnectionLimits {
            max_body_bytes: 1024,
            io_timeout: Duration::from_secs(5),
        }
    }

    /// Atiende una conexión con el router de producción y retorna la
    /// respuesta cruda
    fn exchange(raw: &[u8], limits: ConnectionLimits) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(build_router(&Config::default(), Arc::new(RetryStore::default())));

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Server::handle_connection(stream, router, limits).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        t.join().unwrap();

        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_request_ids_are_unique_hex() {
        let a = next_request_id();
        let b = next_request_id();

        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_handle_connection_ping_ok() {
        let text = exchange(b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n", limits());

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("X-Request-Id: "));
        assert!(text.contains("Date: "));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\npong"));
    }

    #[test]
    fn test_handle_connection_head_has_no_body() {
        let text = exchange(b"HEAD /ping HTTP/1.1\r\n\r\n", limits());

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let text = exchange(b"\x00\x01\x02\x03garbage\r\n\r\n", limits());

        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(text.contains("Invalid request:"));
        assert!(text.contains("X-Request-Id: "));
    }

    #[test]
    fn test_handle_connection_body_too_large() {
        let text = exchange(
            b"POST /echoText HTTP/1.1\r\nContent-Length: 2048\r\n\r\n",
            limits(),
        );
        assert!(text.starts_with("HTTP/1.1 413 Payload Too Large\r\n"));
    }

    #[test]
    fn test_handle_connection_expect_continue() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(build_router(&Config::default(), Arc::new(RetryStore::default())));

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Server::handle_connection(stream, router, limits()).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        client
            .write_all(b"POST /echoText HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 5\r\n\r\n")
            .unwrap();

        // El body sólo se envía después de recibir 100 Continue
        let mut interim = [0u8; 25];
        client.read_exact(&mut interim).unwrap();
        assert_eq!(&interim[..], b"HTTP/1.1 100 Continue\r\n\r\n");

        client.write_all(b"hello").unwrap();
        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        t.join().unwrap();

        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_handle_connection_unknown_route() {
        let text = exchange(b"GET /nope HTTP/1.1\r\n\r\n", limits());

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Route not found: GET /nope"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Arc::new(Router::new());

        let t = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            // El peer no envía nada: la función debe terminar Ok(())
            Server::handle_connection(stream, router, limits()).unwrap();
        });

        drop(TcpStream::connect(addr).unwrap());
        t.join().unwrap();
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let mut config = Config::default();
        config.port = 0;
        let mut server = Server::new(config);

        let addr = server.bind().unwrap();
        assert_ne!(addr.port(), 0);
        assert!(server.retry_store().is_empty());
    }
}
