use std::cmp::Reverse;

use souq_common::MAX_SAFE_PRICE;

use crate::{Condition, Listing};

/// Valor reservado que desativa um filtro.
const ALL: &str = "all";

/// Restrição sobre um campo textual do anúncio.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldFilter {
    /// Sem restrição.
    #[default]
    Any,
    /// Igualdade exata.
    Exact(String),
}

impl FieldFilter {
    /// `"all"` desativa o filtro (condition, location, seller type).
    pub fn from_sentinel(value: &str) -> Self {
        if value == ALL {
            FieldFilter::Any
        } else {
            FieldFilter::Exact(value.to_string())
        }
    }

    /// String vazia desativa o filtro (category).
    pub fn from_category(value: &str) -> Self {
        if value.is_empty() {
            FieldFilter::Any
        } else {
            FieldFilter::Exact(value.to_string())
        }
    }

    fn accepts(&self, field: Option<&str>, missing: MissingField) -> bool {
        match (self, field) {
            (FieldFilter::Any, _) => true,
            (FieldFilter::Exact(_), None) => missing == MissingField::Match,
            (FieldFilter::Exact(want), Some(have)) => want == have,
        }
    }
}

/// O que fazer quando o anúncio não tem o campo filtrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingField {
    /// Campo ausente passa em qualquer filtro.
    #[default]
    Match,
    /// Campo ausente só passa quando o filtro é `"all"`.
    Exclude,
}

/// Ordenação aplicada ao resultado filtrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ordem de inserção.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::Newest => "newest",
        }
    }

    /// Ordena in place. Todas as ordenações são estáveis: empates mantêm a
    /// ordem de inserção.
    pub fn apply(&self, listings: &mut [Listing]) {
        match self {
            SortMode::Default => {}
            SortMode::PriceAsc => listings.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortMode::PriceDesc => listings.sort_by(|a, b| b.price.total_cmp(&a.price)),
            // Datas ilegíveis (None) ficam por último
            SortMode::Newest => listings.sort_by_cached_key(|l| Reverse(l.created_at())),
        }
    }
}

/// Qualquer valor desconhecido cai em `Default`.
impl From<&str> for SortMode {
    fn from(s: &str) -> Self {
        match s {
            "price_asc" => SortMode::PriceAsc,
            "price_desc" => SortMode::PriceDesc,
            "newest" => SortMode::Newest,
            _ => SortMode::Default,
        }
    }
}

/// Consulta sobre a coleção de anúncios.
///
/// Os defaults equivalem a "sem filtro": busca vazia, qualquer categoria,
/// preço em `[0, MAX_SAFE_PRICE]`, ordem de inserção e `"all"` nos demais.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub search: String,
    pub category: FieldFilter,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: SortMode,
    pub condition: FieldFilter,
    pub location: FieldFilter,
    pub seller_type: FieldFilter,
    pub missing_field: MissingField,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: FieldFilter::Any,
            min_price: 0.0,
            max_price: MAX_SAFE_PRICE,
            sort: SortMode::Default,
            condition: FieldFilter::Any,
            location: FieldFilter::Any,
            seller_type: FieldFilter::Any,
            missing_field: MissingField::Match,
        }
    }
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = FieldFilter::from_category(category);
        self
    }

    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sort(mut self, sort: impl Into<SortMode>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn condition(mut self, condition: &str) -> Self {
        self.condition = FieldFilter::from_sentinel(condition);
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = FieldFilter::from_sentinel(location);
        self
    }

    pub fn seller_type(mut self, seller_type: &str) -> Self {
        self.seller_type = FieldFilter::from_sentinel(seller_type);
        self
    }

    pub fn missing_field(mut self, policy: MissingField) -> Self {
        self.missing_field = policy;
        self
    }

    /// Avalia todos os predicados (AND) contra um anúncio.
    pub fn matches(&self, listing: &Listing) -> bool {
        let matches_search =
            self.search.is_empty() || listing.mentions(&self.search.to_lowercase());
        let matches_category = match &self.category {
            FieldFilter::Any => true,
            FieldFilter::Exact(c) => *c == listing.category,
        };
        let matches_price = listing.price >= self.min_price && listing.price <= self.max_price;

        let missing = self.missing_field;
        let condition = listing.condition.as_ref().map(Condition::as_str);
        matches_search
            && matches_category
            && matches_price
            && self.condition.accepts(condition, missing)
            && self.location.accepts(listing.location.as_deref(), missing)
            && self.seller_type.accepts(listing.seller_type.as_deref(), missing)
    }

    /// Filtra e ordena uma cópia; `listings` não é alterado.
    pub fn run<'a, I>(&self, listings: I) -> Vec<Listing>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        let mut out: Vec<Listing> = listings
            .into_iter()
            .filter(|l| self.matches(l))
            .cloned()
            .collect();
        self.sort.apply(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn listing(id: &str, price: f64) -> Listing {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Listing::new(id, format!("item {id}"), price, "Electronics", at)
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn sort_mode_from_str() {
        assert_eq!(SortMode::from("price_asc"), SortMode::PriceAsc);
        assert_eq!(SortMode::from("price_desc"), SortMode::PriceDesc);
        assert_eq!(SortMode::from("newest"), SortMode::Newest);
        assert_eq!(SortMode::from("default"), SortMode::Default);
        assert_eq!(SortMode::from("popular"), SortMode::Default);
    }

    #[test]
    fn empty_query_matches_everything() {
        let q = FilterQuery::new();
        assert!(q.matches(&listing("a", 0.0)));
        assert!(q.matches(&listing("b", MAX_SAFE_PRICE)));
    }

    #[test]
    fn search_matches_title_or_description() {
        let mut l = listing("a", 1.0);
        l.title = "Bicicleta Caloi".into();
        l.description = "Aro 29, pouco uso".into();
        assert!(FilterQuery::new().search("CALOI").matches(&l));
        assert!(FilterQuery::new().search("aro 29").matches(&l));
        assert!(!FilterQuery::new().search("moto").matches(&l));
    }

    #[test]
    fn category_is_exact() {
        let l = listing("a", 1.0);
        assert!(FilterQuery::new().category("Electronics").matches(&l));
        assert!(!FilterQuery::new().category("electronics").matches(&l));
        assert!(FilterQuery::new().category("").matches(&l));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let q = FilterQuery::new().price_range(10.0, 20.0);
        assert!(q.matches(&listing("min", 10.0)));
        assert!(q.matches(&listing("max", 20.0)));
        assert!(!q.matches(&listing("below", 9.0)));
        assert!(!q.matches(&listing("above", 21.0)));
    }

    #[test]
    fn missing_fields_match_by_default() {
        let bare = listing("a", 1.0);
        let q = FilterQuery::new()
            .condition("used")
            .location("giza")
            .seller_type("verified");
        assert!(q.matches(&bare));

        let mut set = listing("b", 1.0);
        set.condition = Some(Condition::New);
        assert!(!q.matches(&set));
        set.condition = Some(Condition::Used);
        set.location = Some("giza".into());
        set.seller_type = Some("verified".into());
        assert!(q.matches(&set));
    }

    #[test]
    fn missing_fields_excluded_when_strict() {
        let bare = listing("a", 1.0);
        let strict = FilterQuery::new().missing_field(MissingField::Exclude);
        assert!(strict.matches(&bare));
        assert!(!strict.clone().condition("new").matches(&bare));
        assert!(!strict.clone().location("cairo").matches(&bare));
        assert!(!strict.seller_type("top").matches(&bare));
    }

    #[test]
    fn condition_compares_wire_name() {
        let mut l = listing("a", 1.0);
        l.condition = Some(Condition::LikeNew);
        assert!(FilterQuery::new().condition("like-new").matches(&l));
        assert!(!FilterQuery::new().condition("LikeNew").matches(&l));

        l.condition = Some(Condition::Other("refurbished".into()));
        assert!(FilterQuery::new().condition("refurbished").matches(&l));
        assert!(!FilterQuery::new().condition("new").matches(&l));
    }

    #[test]
    fn price_sorts_are_stable() {
        let items = vec![listing("a", 10.0), listing("b", 5.0), listing("c", 10.0)];
        let asc = FilterQuery::new().sort("price_asc").run(&items);
        assert_eq!(ids(&asc), ["b", "a", "c"]);
        let desc = FilterQuery::new().sort("price_desc").run(&items);
        assert_eq!(ids(&desc), ["a", "c", "b"]);
    }

    #[test]
    fn newest_sort_puts_unparseable_last() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut old = listing("old", 1.0);
        old.created_at = base.to_rfc3339();
        let mut new = listing("new", 1.0);
        new.created_at = (base + Duration::days(2)).to_rfc3339();
        let mut broken = listing("broken", 1.0);
        broken.created_at = "???".into();

        let items = vec![broken, old, new];
        let sorted = FilterQuery::new().sort(SortMode::Newest).run(&items);
        assert_eq!(ids(&sorted), ["new", "old", "broken"]);
    }

    #[test]
    fn run_does_not_touch_source() {
        let items = vec![listing("a", 3.0), listing("b", 1.0)];
        let _ = FilterQuery::new().sort("price_asc").run(&items);
        assert_eq!(ids(&items), ["a", "b"]);
    }
}
