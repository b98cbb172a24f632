//! Translation of raw list query parameters into a catalog predicate.
//!
//! Nothing here fails: values that cannot be interpreted are treated as if
//! they had not been sent.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LikeExpr, Query};
use sea_orm::{ColumnTrait, Condition};
use std::collections::HashMap;

use crate::domain::ProviderId;
use crate::entities::{catalog_item_genres, catalog_items};
use crate::models::Season;

/// Query string of `GET /api/v1/animes`, kept as raw strings so that bad
/// values can be dropped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub is_ongoing: Option<String>,
    pub in_library: Option<String>,
    pub is_favorite: Option<String>,
    /// Also read from `studioId`.
    pub provider_id: Option<String>,
    pub season: Option<String>,
    pub year: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    /// Builds the parameters from decoded query pairs. A key sent more than
    /// once is treated as absent, as is an unknown key.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values: HashMap<String, Option<String>> = HashMap::new();
        for (key, value) in pairs {
            let key = if key == "studioId" {
                "providerId".to_string()
            } else {
                key
            };
            values
                .entry(key)
                .and_modify(|seen| *seen = None)
                .or_insert(Some(value));
        }

        let mut take = |key: &str| values.remove(key).flatten();
        Self {
            search: take("search"),
            genre: take("genre"),
            is_ongoing: take("isOngoing"),
            in_library: take("inLibrary"),
            is_favorite: take("isFavorite"),
            provider_id: take("providerId"),
            season: take("season"),
            year: take("year"),
            min_rating: take("minRating"),
            max_rating: take("maxRating"),
            page: take("page"),
            limit: take("limit"),
            sort_by: take("sortBy"),
            order: take("order"),
        }
    }
}

/// Conjunction of optional clauses over catalog items. An empty filter
/// matches every item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    /// Lowercased substring of the title.
    pub search: Option<String>,
    pub genre: Option<String>,
    pub is_ongoing: Option<bool>,
    pub in_library: Option<bool>,
    pub is_favorite: Option<bool>,
    pub provider_id: Option<ProviderId>,
    pub season: Option<Season>,
    pub year: Option<i32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub released_on_or_before: Option<DateTime<Utc>>,
    pub released_after: Option<DateTime<Utc>>,
}

impl CatalogFilter {
    #[must_use]
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            search: trimmed(params.search.as_deref()).map(str::to_lowercase),
            genre: trimmed(params.genre.as_deref()).map(str::to_string),
            is_ongoing: parse_flag(params.is_ongoing.as_deref()),
            in_library: parse_flag(params.in_library.as_deref()),
            is_favorite: parse_flag(params.is_favorite.as_deref()),
            provider_id: params.provider_id.as_deref().and_then(ProviderId::parse),
            season: params.season.as_deref().and_then(Season::from_synonym),
            year: params.year.as_deref().and_then(parse_int_prefix),
            min_rating: params.min_rating.as_deref().and_then(parse_number),
            max_rating: params.max_rating.as_deref().and_then(parse_number),
            released_on_or_before: None,
            released_after: None,
        }
    }

    #[must_use]
    pub fn ongoing() -> Self {
        Self {
            is_ongoing: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn released_by(now: DateTime<Utc>) -> Self {
        Self {
            released_on_or_before: Some(now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn upcoming_after(now: DateTime<Utc>) -> Self {
        Self {
            released_after: Some(now),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn into_condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like(search));
            condition = condition.add(
                Expr::col((
                    catalog_items::Entity,
                    catalog_items::Column::TitleNormalized,
                ))
                .like(LikeExpr::new(pattern).escape('\\')),
            );
        }

        if let Some(genre) = &self.genre {
            condition = condition.add(
                catalog_items::Column::Id.in_subquery(
                    Query::select()
                        .column(catalog_item_genres::Column::ItemId)
                        .from(catalog_item_genres::Entity)
                        .and_where(catalog_item_genres::Column::Genre.eq(genre.as_str()))
                        .to_owned(),
                ),
            );
        }

        if let Some(value) = self.is_ongoing {
            condition = condition.add(catalog_items::Column::IsOngoing.eq(value));
        }
        if let Some(value) = self.in_library {
            condition = condition.add(catalog_items::Column::InLibrary.eq(value));
        }
        if let Some(value) = self.is_favorite {
            condition = condition.add(catalog_items::Column::IsFavorite.eq(value));
        }
        if let Some(id) = self.provider_id {
            condition = condition.add(catalog_items::Column::ProviderId.eq(id.value()));
        }
        if let Some(season) = self.season {
            condition = condition.add(catalog_items::Column::Season.eq(season));
        }
        if let Some(year) = self.year {
            condition = condition.add(catalog_items::Column::Year.eq(year));
        }
        if let Some(min) = self.min_rating {
            condition = condition.add(catalog_items::Column::Rating.gte(min));
        }
        if let Some(max) = self.max_rating {
            condition = condition.add(catalog_items::Column::Rating.lte(max));
        }
        if let Some(now) = self.released_on_or_before {
            condition = condition.add(catalog_items::Column::ReleaseDate.lte(now));
        }
        if let Some(now) = self.released_after {
            condition = condition.add(catalog_items::Column::ReleaseDate.gt(now));
        }

        condition
    }
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Only the exact literals `true` and `false` are flags.
fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Parses the leading integer of `raw`, ignoring trailing garbage
/// (`"2014abc"` is 2014). Returns `None` when there are no leading digits.
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i32> {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['-', '+']));
    let digits = raw[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    raw[..sign_len + digits].parse().ok()
}

/// Parses a page number or size from its leading digits. Negative values
/// read as 0 and values past `u64::MAX` saturate.
#[must_use]
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits: Vec<u64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|d| u64::from(d - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }

    Some(digits.into_iter().fold(0_u64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(digit)
    }))
}

/// Parses a whole-string finite number. Empty input is absent.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
