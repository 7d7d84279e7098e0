use chrono::{DateTime, Duration, Utc};

use souq_common::LISTING_MAX_AGE_DAYS;
use souq_model::Listing;

/// Anúncios criados até este instante (inclusive) estão expirados.
pub fn cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(LISTING_MAX_AGE_DAYS)
}

/// Data ilegível conta como expirada.
pub fn is_expired(listing: &Listing, now: DateTime<Utc>) -> bool {
    let cutoff = cutoff(now);
    listing.created_at().is_none_or(|t| t <= cutoff)
}

/// Remove os expirados preservando a ordem. Retorna quantos saíram.
pub fn retain_fresh(listings: &mut Vec<Listing>, now: DateTime<Utc>) -> usize {
    let before = listings.len();
    listings.retain(|l| !is_expired(l, now));
    before - listings.len()
}
