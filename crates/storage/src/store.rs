use tracing::{debug, info};

use souq_common::{PRODUCTS_SLOT, StorageError, ValidationError};
use souq_model::{FilterQuery, Listing, ListingDraft};

use crate::clock::{Clock, SystemClock};
use crate::expiry::retain_fresh;
use crate::mirror::SlotMirror;
use crate::SlotStorage;

/// Dono da coleção de anúncios e único escritor do slot de produtos.
///
/// Cada leitura via [`get_all`](Self::get_all) refaz a expiração de 30 dias;
/// [`filter`](Self::filter) consulta o estado atual sem efeitos colaterais.
pub struct ProductStore<S, C = SystemClock> {
    products: Vec<Listing>,
    mirror: SlotMirror<S>,
    clock: C,
}

impl<S: SlotStorage> ProductStore<S> {
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: SlotStorage, C: Clock> ProductStore<S, C> {
    /// Carrega o slot, remove expirados e grava o resultado de volta.
    ///
    /// Se parte do slot não pôde ser lida, a gravação de volta é pulada para
    /// preservar a cópia durável; a próxima mutação regrava a coleção.
    pub fn with_clock(storage: S, clock: C) -> Self {
        let mirror = SlotMirror::new(storage, PRODUCTS_SLOT);
        let loaded = mirror.load::<Listing>();
        let mut products = loaded.items;
        let count = products.len();
        let removed = retain_fresh(&mut products, clock.now());

        let mut store = Self {
            products,
            mirror,
            clock,
        };
        if loaded.intact {
            store.mirror.persist(&store.products);
        }
        info!("{count} anúncios carregados, {removed} expirados");
        store
    }

    /// Coleção atual em ordem de inserção, sem anúncios expirados.
    pub fn get_all(&mut self) -> &[Listing] {
        let removed = self.expire();
        if removed > 0 || self.mirror.has_pending_write() {
            self.mirror.persist(&self.products);
        }
        &self.products
    }

    /// Sem validação: o chamador monta o anúncio completo.
    pub fn add(&mut self, listing: Listing) -> &Listing {
        debug!("anúncio adicionado: {}", listing.id);
        let idx = self.products.len();
        self.products.push(listing);
        self.mirror.persist(&self.products);
        &self.products[idx]
    }

    /// Valida o rascunho, carimba id e data com o relógio da store e adiciona.
    pub fn publish(&mut self, draft: ListingDraft) -> Result<&Listing, ValidationError> {
        let listing = draft.into_listing(self.clock.now())?;
        Ok(self.add(listing))
    }

    /// Remove todos os anúncios com este id. Retorna se algum saiu.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|l| l.id != id);
        let removed = before - self.products.len();
        if removed == 0 {
            return false;
        }
        if removed > 1 {
            debug!("id duplicado '{id}': {removed} anúncios removidos");
        }
        self.mirror.persist(&self.products);
        true
    }

    /// Expiração explícita. Retorna quantos anúncios foram removidos.
    pub fn cleanup(&mut self) -> usize {
        let removed = self.expire();
        if removed > 0 || self.mirror.has_pending_write() {
            self.mirror.persist(&self.products);
        }
        removed
    }

    pub fn filter(&self, query: &FilterQuery) -> Vec<Listing> {
        query.run(&self.products)
    }

    /// Uma gravação falhou e ainda não foi refeita.
    pub fn has_pending_write(&self) -> bool {
        self.mirror.has_pending_write()
    }

    pub fn last_write_error(&self) -> Option<&str> {
        self.mirror.last_write_error()
    }

    /// Regrava a coleção agora, devolvendo o erro ao chamador.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.mirror.save(&self.products)
    }

    fn expire(&mut self) -> usize {
        let removed = retain_fresh(&mut self.products, self.clock.now());
        if removed > 0 {
            info!("{removed} anúncios expirados removidos");
        }
        removed
    }
}
