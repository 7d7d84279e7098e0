use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use souq_common::StorageError;

/// Meio de armazenamento local: slots nomeados com um documento cada.
pub trait SlotStorage {
    /// Conteúdo do slot, ou `None` se ele não existe.
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, slot: &str, data: &str) -> Result<(), StorageError>;
    /// Remover um slot inexistente não é erro.
    fn remove(&mut self, slot: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

/// Slots em memória, com cota opcional em bytes (somando todos os slots).
///
/// Clones compartilham o mesmo conteúdo.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        let storage = Self::new();
        storage.set_quota(Some(quota));
        storage
    }

    pub fn set_quota(&self, quota: Option<usize>) {
        self.lock().quota = quota;
    }

    /// Bytes ocupados por todos os slots.
    #[cfg(test)]
    fn used(&self) -> usize {
        self.lock().slots.values().map(String::len).sum()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // Não há invariante que um panic possa quebrar no meio de uma escrita
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, data: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if let Some(quota) = inner.quota {
            let others: usize = inner
                .slots
                .iter()
                .filter(|(name, _)| name.as_str() != slot)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + data.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    slot: slot.to_string(),
                    needed,
                    quota,
                });
            }
        }
        inner.slots.insert(slot.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StorageError> {
        self.lock().slots.remove(slot);
        Ok(())
    }
}

/// Um arquivo `<dir>/<slot>.json` por slot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Cria o diretório se necessário.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("armazenamento em {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: &str) -> Result<PathBuf, StorageError> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidSlot(slot.to_string()));
        }
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(slot)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, slot: &str, data: &str) -> Result<(), StorageError> {
        let path = self.path(slot)?;
        // Escreve ao lado e renomeia: um leitor nunca vê o arquivo pela metade
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(slot)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
