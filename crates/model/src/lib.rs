#![forbid(unsafe_code)]

mod draft;
mod listing;
mod query;

pub use draft::ListingDraft;
pub use listing::{Availability, Condition, ContactInfo, ContactMethod, Listing, parse_timestamp};
pub use query::{FieldFilter, FilterQuery, MissingField, SortMode};
