//! # Transfer-Encoding: chunked
//! src/http/chunked.rs
//!
//! Lectura de cuerpos chunked en requests y escritura chunked en responses.
//!
//! ```text
//! 5\r\n
//! hello\r\n
//! 0\r\n
//! \r\n
//! ```

use crate::error::RequestError;
use std::io::{BufRead, Read, Write};

/// Tamaño de cada chunk al escribir
pub const WRITE_CHUNK_SIZE: usize = 8 * 1024;

/// Longitud máxima de una línea de tamaño / trailer
const MAX_LINE: usize = 4 * 1024;

/// Lee un cuerpo chunked completo y retorna los bytes ya sin el framing.
///
/// Las extensiones de chunk (`;name=value`) se ignoran y los trailers se
/// descartan.
pub fn read_chunked<R: BufRead>(reader: &mut R, max_body: usize) -> Result<Vec<u8>, RequestError> {
    let mut body = Vec::new();

    loop {
        let line = read_line(reader)?;
        let size_str = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_str, 16)
            .map_err(|_| RequestError::MalformedChunk("invalid chunk size"))?;

        if size == 0 {
            break;
        }
        if body.len().saturating_add(size) > max_body {
            return Err(RequestError::BodyTooLarge(max_body));
        }

        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..])?;

        if !read_line(reader)?.is_empty() {
            return Err(RequestError::MalformedChunk("missing CRLF after chunk data"));
        }
    }

    // Trailers hasta la línea vacía
    while !read_line(reader)?.is_empty() {}

    Ok(body)
}

/// Escribe `body` como una secuencia de chunks terminada en `0\r\n\r\n`
pub fn write_chunked<W: Write>(writer: &mut W, body: &[u8]) -> std::io::Result<()> {
    for chunk in body.chunks(WRITE_CHUNK_SIZE) {
        write!(writer, "{:x}\r\n", chunk.len())?;
        writer.write_all(chunk)?;
        writer.write_all(b"\r\n")?;
    }
    writer.write_all(b"0\r\n\r\n")
}

/// Lee una línea terminada en CRLF (o LF) sin el terminador
fn read_line<R: BufRead>(reader: &mut R) -> Result<String, RequestError> {
    let mut line = Vec::new();
    let read = reader.by_ref().take(MAX_LINE as u64).read_until(b'\n', &mut line)?;

    if read == 0 {
        return Err(RequestError::Io(std::io::ErrorKind::UnexpectedEof.into()));
    }
    if line.last() != Some(&b'\n') {
        return Err(RequestError::MalformedChunk("line too long"));
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }

    String::from_utf8(line).map_err(|_| RequestError::MalformedChunk("non UTF-8 framing"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_chunked_simple() {
        let mut raw = Cursor::new(b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n".to_vec());
        let body = read_chunked(&mut raw, 1024).unwrap();
        assert_eq!(body, b"hello world");
    }

    #[test]
    fn test_read_chunked_with_extensions_and_trailers() {
        let mut raw = Cursor::new(b"3;name=x\r\nabc\r\n0\r\nX-Trailer: 1\r\n\r\n".to_vec());
        let body = read_chunked(&mut raw, 1024).unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn test_read_chunked_too_large() {
        let mut raw = Cursor::new(b"a\r\n0123456789\r\n0\r\n\r\n".to_vec());
        let result = read_chunked(&mut raw, 5);
        assert!(matches!(result, Err(RequestError::BodyTooLarge(5))));
    }

    #[test]
    fn test_read_chunked_invalid_size() {
        let mut raw = Cursor::new(b"zz\r\nabc\r\n0\r\n\r\n".to_vec());
        assert!(matches!(
            read_chunked(&mut raw, 1024),
            Err(RequestError::MalformedChunk(_))
        ));
    }

    #[test]
    fn test_read_chunked_truncated_stream() {
        let mut raw = Cursor::new(b"a\r\n01234".to_vec());
        assert!(matches!(read_chunked(&mut raw, 1024), Err(RequestError::Io(_))));
    }

    #[test]
    fn test_write_then_read_large_body() {
        let body: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let mut wire = Vec::new();
        write_chunked(&mut wire, &body).unwrap();

        assert!(wire.starts_with(b"2000\r\n"));
        assert!(wire.ends_with(b"0\r\n\r\n"));

        let decoded = read_chunked(&mut Cursor::new(wire), usize::MAX).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_write_chunked_empty() {
        let mut wire = Vec::new();
        write_chunked(&mut wire, b"").unwrap();
        assert_eq!(wire, b"0\r\n\r\n");
    }
}
