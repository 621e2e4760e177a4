use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use tracing::warn;

pub(crate) const INSERTED: &str = "inserted";

/// Post-insert notifications for a collection.
pub(crate) struct InsertEvents {
    emitter: Mutex<EventEmitter>,
}

impl InsertEvents {
    pub(crate) fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    pub(crate) fn on<F>(&self, listener: F) -> Option<String>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self.emitter.lock().ok()?;
        Some(emitter.on(INSERTED, listener))
    }

    /// Fire listeners and wait for them to finish.
    pub(crate) fn emit(&self, payload: String) {
        let handles = match self.emitter.lock() {
            Ok(mut emitter) => emitter.emit(INSERTED, payload),
            Err(_) => {
                warn!("insert emitter lock poisoned, dropping event");
                return;
            }
        };

        for handle in handles {
            if handle.join().is_err() {
                warn!("insert listener panicked");
            }
        }
    }
}
