use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Estado de conservação do item.
///
/// Valores fora dos cinco conhecidos são preservados em `Other`, para que um
/// registro gravado por outra versão não seja descartado nem reescrito.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Used,
    Damaged,
    Other(String),
}

impl Condition {
    /// Nome usado no JSON e nos filtros.
    pub fn as_str(&self) -> &str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Good => "good",
            Condition::Used => "used",
            Condition::Damaged => "damaged",
            Condition::Other(s) => s,
        }
    }

    /// Só os valores conhecidos.
    pub fn parse(s: &str) -> Option<Condition> {
        match s {
            "new" => Some(Condition::New),
            "like-new" => Some(Condition::LikeNew),
            "good" => Some(Condition::Good),
            "used" => Some(Condition::Used),
            "damaged" => Some(Condition::Damaged),
            _ => None,
        }
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Condition::parse(&s).unwrap_or(Condition::Other(s))
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        match c {
            Condition::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Phone,
    Email,
    Platform,
}

/// Janela de horário em que o vendedor aceita contato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Morning,
    Afternoon,
    Evening,
    Night,
    #[default]
    Anytime,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact_method: Option<ContactMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_hours: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_publicly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Um anúncio do marketplace.
///
/// O layout serializado é o mesmo array de objetos camelCase gravado no slot
/// de produtos, então dados antigos continuam legíveis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub audios: Vec<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_type: Option<String>,
}

impl Listing {
    /// Anúncio mínimo, sem mídia nem campos opcionais.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price,
            category: category.into(),
            images: Vec::new(),
            videos: Vec::new(),
            audios: Vec::new(),
            created_at: format_timestamp(created_at),
            condition: None,
            location: None,
            contact_info: None,
            seller_id: None,
            seller_type: None,
        }
    }

    /// Instante de criação, se `created_at` for uma data reconhecível.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Título ou descrição contém `needle` (já em minúsculas).
    pub fn mentions(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Aceita RFC 3339 (`2024-05-01T10:00:00.000Z`) ou só a data (`2024-05-01`,
/// meia-noite UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Formato ISO-8601 com milissegundos e sufixo `Z`.
pub(crate) fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
