//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Los códigos que emite el servidor de fixtures. Son parte del contrato con
//! los clientes bajo prueba: cada simulación responde siempre con el mismo
//! código literal.
//!
//! - **2xx**: 200, 201, 204
//! - **3xx**: 301, 303, 304
//! - **4xx**: 400, 403, 404, 406, 413
//! - **5xx**: 500, 503

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 201 Created - Recurso creado (POST /simple.json, uploads)
    Created = 201,

    /// 204 No Content - Petición exitosa sin contenido en el body
    NoContent = 204,

    /// 301 Moved Permanently
    MovedPermanently = 301,

    /// 303 See Other - El cliente debe seguir con GET
    SeeOther = 303,

    /// 304 Not Modified - GET condicional sin cambios
    NotModified = 304,

    /// 400 Bad Request - Parámetros inválidos o malformados
    BadRequest = 400,

    /// 403 Forbidden - Falló alguna verificación de cabeceras
    Forbidden = 403,

    /// 404 Not Found - Ruta o recurso no encontrado
    NotFound = 404,

    /// 406 Not Acceptable - Cuerpo comprimido que no se pudo decodificar
    NotAcceptable = 406,

    /// 413 Payload Too Large - Cuerpo por encima del límite configurado
    PayloadTooLarge = 413,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError = 500,

    /// 503 Service Unavailable - Fallo transitorio simulado
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::http::StatusCode;
    /// assert_eq!(StatusCode::SeeOther.reason_phrase(), "See Other");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::SeeOther => "See Other",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Respuestas que nunca llevan cuerpo (RFC 9110 §6.4.1)
    pub fn forbids_body(&self) -> bool {
        matches!(self, StatusCode::NoContent | StatusCode::NotModified)
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
        assert_eq!(StatusCode::SeeOther.as_u16(), 303);
        assert_eq!(StatusCode::NotModified.as_u16(), 304);
        assert_eq!(StatusCode::Forbidden.as_u16(), 403);
        assert_eq!(StatusCode::NotAcceptable.as_u16(), 406);
        assert_eq!(StatusCode::ServiceUnavailable.as_u16(), 503);
    }

    #[test]
    fn test_is_success() {
        assert!(StatusCode::Ok.is_success());
        assert!(StatusCode::Created.is_success());
        assert!(StatusCode::NoContent.is_success());
        assert!(!StatusCode::NotModified.is_success());
        assert!(!StatusCode::ServiceUnavailable.is_success());
    }

    #[test]
    fn test_error_classes() {
        assert!(StatusCode::NotAcceptable.is_client_error());
        assert!(!StatusCode::NotAcceptable.is_server_error());
        assert!(StatusCode::ServiceUnavailable.is_server_error());
    }

    #[test]
    fn test_forbids_body() {
        assert!(StatusCode::NoContent.forbids_body());
        assert!(StatusCode::NotModified.forbids_body());
        assert!(!StatusCode::SeeOther.forbids_body());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::SeeOther.to_string(), "303 See Other");
        assert_eq!(StatusCode::NotModified.to_string(), "304 Not Modified");
    }
}
