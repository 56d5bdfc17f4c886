//! # Colector de Bytes
//! src/body/collector.rs
//!
//! Acumula el cuerpo completo de un request antes de entregarlo al handler,
//! descomprimiendo gzip cuando el cliente lo declara en `Content-Encoding`.
//!
//! `byte_length` siempre es el tamaño que viajó por el cable: el comprimido si
//! hubo descompresión, el recibido si no. Así `/upload-compressed` puede
//! verificar a la vez el contenido decodificado y el tamaño transmitido.

use crate::error::CollectError;
use flate2::read::GzDecoder;
use std::io::Read;

/// El body de un request, ya acumulado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedBody {
    /// Contenido (descomprimido si venía en gzip)
    pub bytes: Vec<u8>,

    /// Valor de `Content-Encoding` tal como llegó
    pub declared_encoding: Option<String>,

    /// Longitud en el cable
    pub byte_length: usize,
}

impl CapturedBody {
    /// `true` si el cuerpo venía en gzip y se descomprimió
    pub fn was_decoded(&self) -> bool {
        self.declared_encoding.as_deref().is_some_and(is_gzip)
    }
}

/// Variante de texto: los bytes se decodifican como UTF-8 de inmediato.
///
/// La conversión es con pérdida (`from_utf8_lossy`): un cliente que envíe
/// otro charset verá caracteres de reemplazo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedText {
    pub text: String,
    pub body: CapturedBody,
}

/// Acumulador de bodies con un tope para la salida descomprimida
#[derive(Debug, Clone, Copy)]
pub struct ByteCollector {
    max_decoded_bytes: usize,
}

impl ByteCollector {
    pub fn new(max_decoded_bytes: usize) -> Self {
        Self { max_decoded_bytes }
    }

    /// Lee todo el stream y, si `content_encoding` es gzip, lo descomprime.
    ///
    /// # Errores
    ///
    /// * `CollectError::Stream` - el stream falló (se responde 500)
    /// * `CollectError::Decode` - el gzip es inválido o excede el tope (406)
    pub fn collect<R: Read>(
        &self,
        mut stream: R,
        content_encoding: Option<&str>,
    ) -> Result<CapturedBody, CollectError> {
        let mut wire = Vec::new();
        stream.read_to_end(&mut wire).map_err(CollectError::Stream)?;

        let byte_length = wire.len();
        let declared_encoding = content_encoding.map(|e| e.trim().to_string());

        let bytes = match declared_encoding.as_deref() {
            Some(encoding) if is_gzip(encoding) => self.gunzip(&wire, encoding)?,
            _ => wire,
        };

        Ok(CapturedBody {
            bytes,
            declared_encoding,
            byte_length,
        })
    }

    /// Igual que `collect`, pero entrega también el texto UTF-8
    pub fn collect_text<R: Read>(
        &self,
        stream: R,
        content_encoding: Option<&str>,
    ) -> Result<CapturedText, CollectError> {
        let body = self.collect(stream, content_encoding)?;
        let text = String::from_utf8_lossy(&body.bytes).into_owned();
        Ok(CapturedText { text, body })
    }

    fn gunzip(&self, wire: &[u8], encoding: &str) -> Result<Vec<u8>, CollectError> {
        let decode_error = |source| CollectError::Decode {
            encoding: encoding.to_string(),
            source,
        };

        let limit = self.max_decoded_bytes as u64;
        let mut decoded = Vec::new();
        GzDecoder::new(wire)
            .take(limit.saturating_add(1))
            .read_to_end(&mut decoded)
            .map_err(decode_error)?;

        if decoded.len() as u64 > limit {
            return Err(decode_error(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("decoded body exceeds {limit} bytes"),
            )));
        }

        Ok(decoded)
    }
}

fn is_gzip(encoding: &str) -> bool {
    encoding.trim().eq_ignore_ascii_case("gzip")
}
