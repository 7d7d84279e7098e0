use chrono::{DateTime, Utc};

use souq_common::{MAX_AUDIOS, MAX_IMAGES, MAX_VIDEOS, MediaKind, ValidationError};

use crate::listing::format_timestamp;
use crate::{Availability, Condition, ContactInfo, ContactMethod, Listing};

/// Dados digitados pelo usuário antes de virar um `Listing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: String,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub audios: Vec<String>,
    pub condition: Option<Condition>,
    pub location: Option<String>,
    pub seller_id: Option<String>,
    pub seller_type: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_contact_method: Option<ContactMethod>,
    pub availability: Option<Availability>,
    pub show_publicly: Option<bool>,
    pub profile_url: Option<String>,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn filled(field: &Option<String>) -> Option<String> {
    field.as_deref().filter(|s| !blank(s)).map(str::to_string)
}

impl ListingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if blank(&self.title) {
            return Err(ValidationError::MissingField("title"));
        }
        if blank(&self.description) {
            return Err(ValidationError::MissingField("description"));
        }
        let price = self.price.ok_or(ValidationError::MissingField("price"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidPrice(price));
        }
        if blank(&self.category) {
            return Err(ValidationError::MissingField("category"));
        }

        if self.images.is_empty() && self.videos.is_empty() && self.audios.is_empty() {
            return Err(ValidationError::NoMedia);
        }
        for (kind, count, max) in [
            (MediaKind::Image, self.images.len(), MAX_IMAGES),
            (MediaKind::Video, self.videos.len(), MAX_VIDEOS),
            (MediaKind::Audio, self.audios.len(), MAX_AUDIOS),
        ] {
            if count > max {
                return Err(ValidationError::TooManyMedia { kind, max });
            }
        }

        if filled(&self.phone).is_none() && filled(&self.email).is_none() {
            return Err(ValidationError::NoContact);
        }
        Ok(())
    }

    /// Valida e monta o anúncio. O id é o instante de criação em
    /// milissegundos.
    pub fn into_listing(self, now: DateTime<Utc>) -> Result<Listing, ValidationError> {
        self.validate()?;

        let contact = ContactInfo {
            phone: filled(&self.phone),
            email: filled(&self.email),
            preferred_contact_method: Some(self.preferred_contact_method.unwrap_or_default()),
            availability_hours: Some(self.availability.unwrap_or_default()),
            show_publicly: Some(self.show_publicly.unwrap_or(true)),
            profile_url: filled(&self.profile_url),
        };

        Ok(Listing {
            id: now.timestamp_millis().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            // validate() garante Some
            price: self.price.unwrap_or_default(),
            category: self.category,
            images: self.images,
            videos: self.videos,
            audios: self.audios,
            created_at: format_timestamp(now),
            condition: Some(self.condition.unwrap_or(Condition::New)),
            location: filled(&self.location),
            contact_info: Some(contact),
            seller_id: self.seller_id,
            seller_type: self.seller_type,
        })
    }
}
