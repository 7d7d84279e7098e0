#![forbid(unsafe_code)]

mod clock;
pub mod expiry;
mod favorites;
mod mirror;
mod slot;
mod store;

pub use clock::{Clock, MockClock, SystemClock};
pub use favorites::FavoritesStore;
pub use slot::{FileStorage, MemoryStorage, SlotStorage};
pub use store::ProductStore;
