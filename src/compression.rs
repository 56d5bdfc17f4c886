//! # Negociación de Compresión
//! src/compression.rs
//!
//! Lee `Accept-Encoding` como lista de tokens con peso opcional y elige la
//! codificación con la que se sirve `/compressed.json`:
//!
//! ```text
//! Accept-Encoding: gzip;q=1.0, deflate;q=0.5, unknown
//!                  │           │              └─ centinela: gana siempre
//!                  │           └─ zlib (RFC 1950)
//!                  └─ gzip (RFC 1952)
//! ```
//!
//! Un token con `q=0` cuenta como no aceptado.

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{self, Write};

/// Token que ningún decodificador real entiende
pub const UNSUPPORTED_TOKEN: &str = "unknown";

/// Codificaciones que el negociador sabe servir
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
    Deflate,
    /// Se anuncia el centinela y el cuerpo va sin comprimir
    Unsupported,
}

impl Encoding {
    /// Valor de `Content-Encoding` para esta codificación
    pub fn token(&self) -> &'static str {
        match self {
            Encoding::Gzip => "gzip",
            Encoding::Deflate => "deflate",
            Encoding::Unsupported => UNSUPPORTED_TOKEN,
        }
    }

    /// Codifica `payload`. `Unsupported` devuelve los bytes tal cual.
    pub fn encode(&self, payload: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Encoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(payload)?;
                encoder.finish()
            }
            Encoding::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(payload)?;
                encoder.finish()
            }
            Encoding::Unsupported => Ok(payload.to_vec()),
        }
    }
}

/// Elige la codificación de la respuesta. `None` si el cliente no ofreció
/// ninguna utilizable (o no envió la cabecera).
///
/// # Ejemplo
/// ```
/// use http_fixture_server::compression::{negotiate, Encoding};
///
/// assert_eq!(negotiate(Some("deflate, gzip")), Some(Encoding::Gzip));
/// assert_eq!(negotiate(Some("gzip;q=0, deflate")), Some(Encoding::Deflate));
/// assert_eq!(negotiate(Some("identity")), None);
/// assert_eq!(negotiate(None), None);
/// ```
pub fn negotiate(accept_encoding: Option<&str>) -> Option<Encoding> {
    let accepted: Vec<String> = accept_encoding?
        .split(',')
        .filter_map(parse_token)
        .collect();

    let offers = |token: &str| accepted.iter().any(|t| t == token);

    if offers(UNSUPPORTED_TOKEN) {
        Some(Encoding::Unsupported)
    } else if offers("gzip") || offers("x-gzip") {
        Some(Encoding::Gzip)
    } else if offers("deflate") {
        Some(Encoding::Deflate)
    } else {
        None
    }
}

/// `"gzip;q=0.8"` → `Some("gzip")`; `"gzip;q=0"` → `None`
fn parse_token(item: &str) -> Option<String> {
    let mut parts = item.split(';');
    let token = parts.next()?.trim().to_ascii_lowercase();
    if token.is_empty() {
        return None;
    }

    for param in parts {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("q") {
            let weight: f32 = value.trim().parse().unwrap_or(1.0);
            if weight <= 0.0 {
                return None;
            }
        }
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::{GzDecoder, ZlibDecoder};
    use std::io::Read;

    #[test]
    fn test_negotiate_precedence() {
        assert_eq!(negotiate(Some("gzip")), Some(Encoding::Gzip));
        assert_eq!(negotiate(Some("deflate")), Some(Encoding::Deflate));
        assert_eq!(negotiate(Some("deflate, gzip")), Some(Encoding::Gzip));
        assert_eq!(negotiate(Some("gzip, unknown")), Some(Encoding::Unsupported));
        assert_eq!(negotiate(Some("UNKNOWN")), Some(Encoding::Unsupported));
    }

    #[test]
    fn test_negotiate_rejects_unusable() {
        assert_eq!(negotiate(None), None);
        assert_eq!(negotiate(Some("")), None);
        assert_eq!(negotiate(Some("identity")), None);
        assert_eq!(negotiate(Some("br, zstd")), None);
        assert_eq!(negotiate(Some("*")), None);
    }

    #[test]
    fn test_negotiate_quality_zero_excluded() {
        assert_eq!(negotiate(Some("gzip;q=0")), None);
        assert_eq!(negotiate(Some("gzip; q=0.0, deflate;q=0.3")), Some(Encoding::Deflate));
        assert_eq!(negotiate(Some("gzip;q=0.001")), Some(Encoding::Gzip));
    }

    #[test]
    fn test_gzip_encode() {
        let payload = b"Hello/World & Co.?".repeat(100);
        let encoded = Encoding::Gzip.encode(&payload).unwrap();
        assert!(encoded.len() < payload.len());

        let mut decoded = Vec::new();
        GzDecoder::new(encoded.as_slice()).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_deflate_is_zlib_wrapped() {
        let payload = b"Hello/World & Co.?".repeat(100);
        let encoded = Encoding::Deflate.encode(&payload).unwrap();

        // Cabecera zlib: CMF = 0x78
        assert_eq!(encoded[0], 0x78);

        let mut decoded = Vec::new();
        ZlibDecoder::new(encoded.as_slice()).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_unsupported_leaves_bytes_untouched() {
        let payload = b"[\"plain\"]";
        assert_eq!(Encoding::Unsupported.encode(payload).unwrap(), payload);
        assert_eq!(Encoding::Unsupported.token(), "unknown");
    }
}
