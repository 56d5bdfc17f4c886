//! # Contadores de Reintentos
//! src/retry/store.rs
//!
//! Tabla en memoria `RetryKey → RetryRecord` con ventana de retención.
//!
//! La limpieza es perezosa: antes de cada consulta se borran los registros
//! cuyo `first_seen_at` quedó fuera de la ventana. No hay thread de limpieza.
//! Un solo `Mutex` cubre limpieza + búsqueda + incremento, así que dos
//! requests con la misma clave nunca ven el mismo intento.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Retención por defecto de un contador (1 hora)
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Estado de una secuencia de reintentos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryRecord {
    /// Fallos ya emitidos para esta clave
    pub attempts_seen: u32,

    /// Momento del primer request con esta clave
    pub first_seen_at: Instant,
}

/// Resultado de una simulación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Todavía faltan fallos: responder 503. `attempt` empieza en 1.
    TransientFailure { attempt: u32, target: u32 },

    /// Se alcanzó el objetivo: responder 200
    Success { attempts_seen: u32 },
}

/// Store de contadores, inyectable y propiedad del servidor
#[derive(Debug)]
pub struct RetryStore {
    retention: Duration,
    records: Mutex<HashMap<String, RetryRecord>>,
}

impl RetryStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Simula un request con la clave `key` que debe fallar `target` veces
    pub fn simulate(&self, key: &str, target: u32) -> RetryOutcome {
        self.simulate_at(key, target, Instant::now())
    }

    /// `simulate` con un reloj explícito
    ///
    /// # Ejemplo
    /// ```
    /// use http_fixture_server::retry::{RetryOutcome, RetryStore};
    /// use std::time::{Duration, Instant};
    ///
    /// let store = RetryStore::new(Duration::from_secs(3600));
    /// let now = Instant::now();
    ///
    /// assert!(matches!(store.simulate_at("k", 1, now), RetryOutcome::TransientFailure { .. }));
    /// assert!(matches!(store.simulate_at("k", 1, now), RetryOutcome::Success { .. }));
    /// ```
    pub fn simulate_at(&self, key: &str, target: u32, now: Instant) -> RetryOutcome {
        let mut records = self.lock();
        Self::sweep(&mut records, self.retention, now);

        let record = records.entry(key.to_string()).or_insert(RetryRecord {
            attempts_seen: 0,
            first_seen_at: now,
        });

        let current = record.attempts_seen;
        if current < target {
            record.attempts_seen = current + 1;
            tracing::debug!(key, attempt = current + 1, target, "simulated transient failure");
            RetryOutcome::TransientFailure {
                attempt: current + 1,
                target,
            }
        } else {
            tracing::debug!(key, attempts_seen = current, target, "retry target reached");
            RetryOutcome::Success {
                attempts_seen: current,
            }
        }
    }

    /// Lo que respondería `simulate` ahora mismo, sin contar un intento.
    /// Sirve para métodos seguros (HEAD) sobre la misma ruta.
    pub fn peek(&self, key: &str, target: u32) -> RetryOutcome {
        self.peek_at(key, target, Instant::now())
    }

    /// `peek` con un reloj explícito
    pub fn peek_at(&self, key: &str, target: u32, now: Instant) -> RetryOutcome {
        let mut records = self.lock();
        Self::sweep(&mut records, self.retention, now);

        let current = records.get(key).map_or(0, |record| record.attempts_seen);
        if current < target {
            RetryOutcome::TransientFailure {
                attempt: current + 1,
                target,
            }
        } else {
            RetryOutcome::Success {
                attempts_seen: current,
            }
        }
    }

    /// Borra los registros fuera de la ventana de retención
    fn sweep(records: &mut HashMap<String, RetryRecord>, retention: Duration, now: Instant) {
        let before = records.len();
        records.retain(|_, record| now.saturating_duration_since(record.first_seen_at) <= retention);

        let removed = before - records.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = records.len(), "expired retry counters swept");
        }
    }

    /// Registro actual de una clave (sin limpiar)
    pub fn get(&self, key: &str) -> Option<RetryRecord> {
        self.lock().get(key).copied()
    }

    /// Número de claves vivas
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Vacía la tabla
    pub fn reset(&self) {
        self.lock().clear();
    }

    // Un panic dentro del lock no deja la tabla a medio escribir
    fn lock(&self) -> MutexGuard<'_, HashMap<String, RetryRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RetryStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn is_failure(outcome: RetryOutcome) -> bool {
        matches!(outcome, RetryOutcome::TransientFailure { .. })
    }

    #[test]
    fn test_fails_n_times_then_succeeds() {
        for target in 0..6 {
            let store = RetryStore::default();
            let now = Instant::now();

            for attempt in 1..=target {
                assert_eq!(
                    store.simulate_at("key", target, now),
                    RetryOutcome::TransientFailure { attempt, target }
                );
            }
            assert_eq!(
                store.simulate_at("key", target, now),
                RetryOutcome::Success { attempts_seen: target }
            );
        }
    }

    #[test]
    fn test_peek_reports_without_counting() {
        let store = RetryStore::default();
        let now = Instant::now();

        assert_eq!(
            store.peek_at("k", 1, now),
            RetryOutcome::TransientFailure { attempt: 1, target: 1 }
        );
        assert!(store.is_empty());

        assert!(is_failure(store.simulate_at("k", 1, now)));
        assert_eq!(store.peek_at("k", 1, now), RetryOutcome::Success { attempts_seen: 1 });
        assert_eq!(store.get("k").unwrap().attempts_seen, 1);
    }

    #[test]
    fn test_success_is_sticky() {
        let store = RetryStore::default();
        let now = Instant::now();

        assert!(is_failure(store.simulate_at("k", 2, now)));
        assert!(is_failure(store.simulate_at("k", 2, now)));
        assert!(!is_failure(store.simulate_at("k", 2, now)));
        assert!(!is_failure(store.simulate_at("k", 2, now)));

        // Un objetivo menor al ya alcanzado sigue teniendo éxito
        assert_eq!(
            store.simulate_at("k", 1, now),
            RetryOutcome::Success { attempts_seen: 2 }
        );
        assert_eq!(store.get("k").unwrap().attempts_seen, 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = RetryStore::default();
        let now = Instant::now();

        assert!(is_failure(store.simulate_at("a", 1, now)));
        assert!(is_failure(store.simulate_at("b", 1, now)));
        assert!(!is_failure(store.simulate_at("a", 1, now)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_key_starts_over() {
        let store = RetryStore::new(Duration::from_secs(60));
        let start = Instant::now();

        assert!(is_failure(store.simulate_at("k", 1, start)));
        assert!(!is_failure(store.simulate_at("k", 1, start)));

        let later = start + Duration::from_secs(61);
        assert_eq!(
            store.simulate_at("k", 1, later),
            RetryOutcome::TransientFailure { attempt: 1, target: 1 }
        );
        assert_eq!(store.get("k").unwrap().first_seen_at, later);
    }

    #[test]
    fn test_record_inside_window_survives() {
        let store = RetryStore::new(Duration::from_secs(60));
        let start = Instant::now();

        store.simulate_at("k", 3, start);
        store.simulate_at("k", 3, start + Duration::from_secs(60));

        assert_eq!(store.get("k").unwrap().attempts_seen, 2);
    }

    #[test]
    fn test_sweep_removes_only_stale_keys() {
        let store = RetryStore::new(Duration::from_secs(60));
        let start = Instant::now();

        store.simulate_at("old", 5, start);
        store.simulate_at("young", 5, start + Duration::from_secs(30));
        assert_eq!(store.len(), 2);

        store.simulate_at("new", 5, start + Duration::from_secs(61));
        assert!(store.get("old").is_none());
        assert!(store.get("young").is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reset() {
        let store = RetryStore::default();
        store.simulate("k", 1);
        assert!(!store.is_empty());

        store.reset();
        assert!(store.is_empty());
        assert!(is_failure(store.simulate("k", 1)));
    }

    #[test]
    fn test_concurrent_requests_count_each_attempt_once() {
        let store = Arc::new(RetryStore::default());
        let target = 40;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..10)
                        .filter(|_| is_failure(store.simulate("shared", target)))
                        .count()
                })
            })
            .collect();

        let failures: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(failures, target as usize);
        assert_eq!(store.get("shared").unwrap().attempts_seen, target);
    }
}
