use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use souq_common::StorageError;

use crate::SlotStorage;

/// Resultado de uma carga. `intact` é falso quando algo do slot não pôde
/// ser lido; nesse caso a cópia durável não deve ser sobrescrita na carga.
pub(crate) struct Loaded<T> {
    pub(crate) items: Vec<T>,
    pub(crate) intact: bool,
}

impl<T> Loaded<T> {
    fn intact(items: Vec<T>) -> Self {
        Self {
            items,
            intact: true,
        }
    }

    fn degraded(items: Vec<T>) -> Self {
        Self {
            items,
            intact: false,
        }
    }
}

/// Espelho durável de uma coleção em um único slot.
///
/// Escritas são best-effort: uma falha fica registrada como pendente e é
/// refeita na próxima gravação.
pub(crate) struct SlotMirror<S> {
    storage: S,
    slot: &'static str,
    pending: bool,
    last_error: Option<String>,
}

impl<S: SlotStorage> SlotMirror<S> {
    pub(crate) fn new(storage: S, slot: &'static str) -> Self {
        Self {
            storage,
            slot,
            pending: false,
            last_error: None,
        }
    }

    /// Slot ausente, ilegível ou corrompido vira coleção vazia. Registros
    /// individuais inválidos são pulados, sem descartar o resto do array.
    pub(crate) fn load<T: DeserializeOwned>(&self) -> Loaded<T> {
        let raw = match self.storage.read(self.slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("slot '{}' vazio", self.slot);
                return Loaded::intact(Vec::new());
            }
            Err(e) => {
                warn!("falha ao ler slot '{}', iniciando vazio: {e}", self.slot);
                return Loaded::degraded(Vec::new());
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("slot '{}' corrompido, iniciando vazio: {e}", self.slot);
                return Loaded::degraded(Vec::new());
            }
        };

        let total = records.len();
        let mut items = Vec::with_capacity(total);
        for (idx, record) in records.into_iter().enumerate() {
            match serde_json::from_value(record) {
                Ok(item) => items.push(item),
                Err(e) => warn!("slot '{}': registro {idx} ignorado: {e}", self.slot),
            }
        }

        if items.len() == total {
            Loaded::intact(items)
        } else {
            Loaded::degraded(items)
        }
    }

    /// Grava a coleção (ou remove o slot se ela estiver vazia).
    pub(crate) fn save<T: Serialize>(&mut self, items: &[T]) -> Result<(), StorageError> {
        let result = self.write(items);
        match &result {
            Ok(()) => {
                self.pending = false;
                self.last_error = None;
            }
            Err(e) => {
                warn!("falha ao gravar slot '{}': {e}", self.slot);
                self.pending = true;
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Como `save`, mas a falha só é registrada.
    pub(crate) fn persist<T: Serialize>(&mut self, items: &[T]) {
        let _ = self.save(items);
    }

    fn write<T: Serialize>(&mut self, items: &[T]) -> Result<(), StorageError> {
        if items.is_empty() {
            return self.storage.remove(self.slot);
        }
        let data = serde_json::to_string(items)?;
        self.storage.write(self.slot, &data)
    }

    pub(crate) fn has_pending_write(&self) -> bool {
        self.pending
    }

    pub(crate) fn last_write_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
