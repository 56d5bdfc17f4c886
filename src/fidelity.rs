//! # Fidelidad de Cabeceras
//! src/fidelity.rs
//!
//! Valores fijos que viajan en cabeceras y las comparaciones que verifican
//! que un cliente los preserva: texto no ASCII byte a byte, enteros en su
//! forma decimal canónica y fechas como instantes (no como strings, porque
//! cliente y servidor pueden reformatear una fecha HTTP).
//!
//! Todas las fechas que emite el servidor usan IMF-fixdate:
//!
//! ```text
//! Sun, 24 Nov 2013 23:59:33 GMT
//! ```

use crate::http::Request;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Texto ASCII con caracteres reservados de URL
pub const SIMPLE_ASCII: &str = "Hello/World & Co.?";

/// Texto con caracteres fuera de ASCII (ü, ß, €)
pub const COMPLEX_UTF8: &str = "München 1 Maß 10 €";

/// Entero que se envía y se espera en `x-test-int`
pub const TEST_INT: i64 = 4711;

/// 2013-11-24T23:59:33Z en segundos desde epoch
pub const TEST_CALENDAR_SECS: u64 = 1_385_337_573;

pub const HDR_TEST_STRING: &str = "x-test-string";
pub const HDR_TEST_INT: &str = "x-test-int";
pub const HDR_TEST_CALENDAR: &str = "x-test-calendar";
pub const HDR_TEST_DATE: &str = "x-test-date";
pub const HDR_TEST_DATUM: &str = "x-test-datum";

/// Instante esperado en `x-test-calendar` y `x-test-date`
pub fn test_calendar() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(TEST_CALENDAR_SECS)
}

/// 9999-12-31T23:59:59Z, el último instante que cabe en una fecha HTTP
pub const MAX_HTTP_DATE_SECS: u64 = 253_402_300_799;

/// Último instante representable como fecha HTTP
pub fn max_http_date() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(MAX_HTTP_DATE_SECS)
}

/// Un instante leído de un query param o de una cabecera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedInstant {
    /// Milisegundos desde epoch (precisión de ms)
    EpochMillis(SystemTime),
    /// Fecha HTTP (precisión de segundos)
    HttpDate(SystemTime),
}

impl ParsedInstant {
    pub fn time(&self) -> SystemTime {
        match self {
            ParsedInstant::EpochMillis(t) | ParsedInstant::HttpDate(t) => *t,
        }
    }

    /// `true` si el valor sólo tiene resolución de segundos
    pub fn is_second_precision(&self) -> bool {
        matches!(self, ParsedInstant::HttpDate(_))
    }
}

/// Parsea milisegundos desde epoch o cualquier formato de fecha HTTP
/// (IMF-fixdate, RFC 850, asctime). Los milisegundos fuera del rango de
/// fechas HTTP (antes de 1970 o después de 9999) se rechazan.
///
/// # Ejemplo
/// ```
/// use http_fixture_server::fidelity::{parse_instant, test_calendar};
///
/// let a = parse_instant("Sun, 24 Nov 2013 23:59:33 GMT").unwrap();
/// let b = parse_instant("1385337573000").unwrap();
/// assert_eq!(a.time(), test_calendar());
/// assert_eq!(a.time(), b.time());
/// ```
pub fn parse_instant(value: &str) -> Option<ParsedInstant> {
    let value = value.trim();

    if let Ok(millis) = value.parse::<i64>() {
        return epoch_millis(millis).map(ParsedInstant::EpochMillis);
    }

    httpdate::parse_http_date(value).ok().map(ParsedInstant::HttpDate)
}

fn epoch_millis(millis: i64) -> Option<SystemTime> {
    offset_from(UNIX_EPOCH, millis)
}

/// `now + offset_ms`, admitiendo offsets negativos. `None` si el resultado
/// no se puede expresar como fecha HTTP.
pub fn offset_from(now: SystemTime, offset_ms: i64) -> Option<SystemTime> {
    let offset = Duration::from_millis(offset_ms.unsigned_abs());
    let time = if offset_ms >= 0 {
        now.checked_add(offset)
    } else {
        now.checked_sub(offset)
    };

    time.filter(|time| is_http_date_range(*time))
}

/// `true` entre 1970-01-01 y 9999-12-31 (ambos inclusive)
pub fn is_http_date_range(time: SystemTime) -> bool {
    time >= UNIX_EPOCH && time <= max_http_date()
}

/// Serializa un instante como IMF-fixdate. Los instantes fuera de rango se
/// acotan a los extremos (1970 / 9999).
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time.clamp(UNIX_EPOCH, max_http_date()))
}

/// Trunca a segundos enteros (lo que sobrevive a una fecha HTTP)
pub fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => UNIX_EPOCH + Duration::from_secs(since.as_secs()),
        Err(_) => time,
    }
}

/// `true` si el recurso (modificado en `last_modified`) es estrictamente más
/// nuevo que el validador `If-Modified-Since`. Instantes iguales ⇒ no
/// modificado.
///
/// Si el validador es una fecha HTTP, el recurso se compara truncado a
/// segundos: es el valor que el cliente pudo haber recibido en
/// `Last-Modified`.
pub fn is_modified_since(last_modified: ParsedInstant, if_modified_since: ParsedInstant) -> bool {
    let resource = if if_modified_since.is_second_precision() {
        truncate_to_seconds(last_modified.time())
    } else {
        last_modified.time()
    };

    resource > if_modified_since.time()
}

/// Resultado de la verificación de cabeceras entrantes. Cada campo es una
/// comparación independiente; todas se evalúan siempre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundReport {
    pub string_ok: bool,
    pub int_ok: bool,
    pub calendar_ok: bool,
    pub date_ok: bool,
    /// `None` si el request no pidió verificar el User-Agent
    pub user_agent_ok: Option<bool>,
}

impl InboundReport {
    /// Todo o nada
    pub fn passed(&self) -> bool {
        self.string_ok
            && self.int_ok
            && self.calendar_ok
            && self.date_ok
            && self.user_agent_ok.unwrap_or(true)
    }
}

/// Compara las cabeceras de prueba de un request contra los valores fijos
pub fn check_inbound(request: &Request) -> InboundReport {
    let string_ok = request.header_bytes(HDR_TEST_STRING) == Some(COMPLEX_UTF8.as_bytes());

    let int_ok = request.header(HDR_TEST_INT).map(str::trim) == Some(TEST_INT.to_string().as_str());

    let expected = test_calendar();
    let same_instant = |name: &str| {
        request
            .header(name)
            .and_then(parse_instant)
            .is_some_and(|instant| instant.time() == expected)
    };
    let calendar_ok = same_instant(HDR_TEST_CALENDAR);
    let date_ok = same_instant(HDR_TEST_DATE);

    let user_agent_ok = request
        .query_param("User-Agent")
        .filter(|ua| !ua.is_empty())
        .map(|expected| request.header("User-Agent") == Some(expected));

    InboundReport {
        string_ok,
        int_ok,
        calendar_ok,
        date_ok,
        user_agent_ok,
    }
}
