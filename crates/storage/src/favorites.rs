use tracing::debug;

use souq_common::{FAVORITES_SLOT, StorageError};
use souq_model::Listing;

use crate::SlotStorage;
use crate::mirror::SlotMirror;

/// Anúncios salvos pelo usuário, como cópias independentes da coleção
/// principal: um favorito sobrevive à expiração ou remoção do original.
pub struct FavoritesStore<S> {
    favorites: Vec<Listing>,
    mirror: SlotMirror<S>,
}

impl<S: SlotStorage> FavoritesStore<S> {
    pub fn open(storage: S) -> Self {
        let mirror = SlotMirror::new(storage, FAVORITES_SLOT);
        let favorites = mirror.load::<Listing>().items;
        Self { favorites, mirror }
    }

    /// Retorna `false` se já havia um favorito com o mesmo id.
    pub fn add(&mut self, listing: Listing) -> bool {
        if self.is_favorite(&listing.id) {
            return false;
        }
        debug!("favorito adicionado: {}", listing.id);
        self.favorites.push(listing);
        self.mirror.persist(&self.favorites);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|l| l.id != id);
        if self.favorites.len() == before {
            return false;
        }
        self.mirror.persist(&self.favorites);
        true
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|l| l.id == id)
    }

    pub fn list(&self) -> &[Listing] {
        &self.favorites
    }

    pub fn has_pending_write(&self) -> bool {
        self.mirror.has_pending_write()
    }

    pub fn last_write_error(&self) -> Option<&str> {
        self.mirror.last_write_error()
    }

    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.mirror.save(&self.favorites)
    }
}
