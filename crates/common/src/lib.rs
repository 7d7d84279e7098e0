#![forbid(unsafe_code)]

mod error;

pub use error::*;

/// Slot que guarda a coleção de anúncios.
pub const PRODUCTS_SLOT: &str = "marketplace_products";
/// Slot que guarda os favoritos do usuário.
pub const FAVORITES_SLOT: &str = "marketplace_favorites";

/// Idade máxima de um anúncio antes de ser removido automaticamente.
pub const LISTING_MAX_AGE_DAYS: i64 = 30;

/// Maior inteiro representável sem perda em um f64 (2^53 - 1).
pub const MAX_SAFE_PRICE: f64 = 9_007_199_254_740_991.0;

pub const MAX_IMAGES: usize = 5;
pub const MAX_VIDEOS: usize = 2;
pub const MAX_AUDIOS: usize = 3;

pub const DEFAULT_DATA_DIR: &str = ".souq";
