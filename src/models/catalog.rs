use chrono::{DateTime, Datelike, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::input::{Violations, is_http_url, non_empty, nullable, parse_date};
use super::provider::Provider;
use crate::domain::{CatalogItemId, ProviderId};

/// Airing season. Serialized with its canonical catalog spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Season {
    #[sea_orm(string_value = "Invierno")]
    #[serde(rename = "Invierno")]
    Winter,
    #[sea_orm(string_value = "Primavera")]
    #[serde(rename = "Primavera")]
    Spring,
    #[sea_orm(string_value = "Verano")]
    #[serde(rename = "Verano")]
    Summer,
    #[sea_orm(string_value = "Otoño")]
    #[serde(rename = "Otoño")]
    Fall,
}

impl Season {
    /// Maps English or Spanish season names, in any case, to a season.
    #[must_use]
    pub fn from_synonym(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "winter" | "invierno" => Some(Self::Winter),
            "spring" | "primavera" => Some(Self::Spring),
            "summer" | "verano" => Some(Self::Summer),
            "fall" | "otoño" => Some(Self::Fall),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "Invierno",
            Self::Spring => "Primavera",
            Self::Summer => "Verano",
            Self::Fall => "Otoño",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AgeRating {
    #[sea_orm(string_value = "G")]
    #[serde(rename = "G")]
    G,
    #[sea_orm(string_value = "PG")]
    #[serde(rename = "PG")]
    Pg,
    #[sea_orm(string_value = "PG-13")]
    #[serde(rename = "PG-13")]
    Pg13,
    #[sea_orm(string_value = "R")]
    #[serde(rename = "R")]
    R,
    #[sea_orm(string_value = "R+")]
    #[serde(rename = "R+")]
    RPlus,
    #[sea_orm(string_value = "RX")]
    #[serde(rename = "RX")]
    Rx,
}

impl AgeRating {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::G => "G",
            Self::Pg => "PG",
            Self::Pg13 => "PG-13",
            Self::R => "R",
            Self::RPlus => "R+",
            Self::Rx => "RX",
        }
    }
}

impl FromStr for AgeRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G" => Ok(Self::G),
            "PG" => Ok(Self::Pg),
            "PG-13" => Ok(Self::Pg13),
            "R" => Ok(Self::R),
            "R+" => Ok(Self::RPlus),
            "RX" => Ok(Self::Rx),
            other => Err(format!("Unknown age rating: {other}")),
        }
    }
}

/// A catalog item as returned to clients, with its provider resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub title: String,
    pub description: String,
    pub poster_url: String,
    pub banner_url: Option<String>,
    pub trailer_url: Option<String>,
    pub episodes: i32,
    pub duration_minutes: Option<i32>,
    pub release_date: DateTime<Utc>,
    pub year: i32,
    pub season: Option<Season>,
    pub age_rating: Option<AgeRating>,
    pub is_ongoing: bool,
    pub in_library: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub genres: Vec<String>,
    pub provider: Option<Provider>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/patch payload for a catalog item.
///
/// Every field is optional so that missing required fields can be reported
/// together. Clearable fields use `Option<Option<_>>` so an explicit `null`
/// in a patch clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub banner_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub trailer_url: Option<Option<String>>,
    pub episodes: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub duration_minutes: Option<Option<i32>>,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub season: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub age_rating: Option<Option<String>>,
    pub is_ongoing: Option<bool>,
    pub in_library: Option<bool>,
    pub is_favorite: Option<bool>,
    pub rating: Option<f64>,
    pub genres: Option<Vec<String>>,
    #[serde(default, alias = "studio", deserialize_with = "nullable")]
    pub provider: Option<Option<String>>,
}

/// A normalized, validated catalog item ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemRecord {
    pub title: String,
    pub title_normalized: String,
    pub description: String,
    pub poster_url: String,
    pub banner_url: Option<String>,
    pub trailer_url: Option<String>,
    pub episodes: i32,
    pub duration_minutes: Option<i32>,
    pub release_date: DateTime<Utc>,
    pub year: i32,
    pub season: Option<Season>,
    pub age_rating: Option<AgeRating>,
    pub is_ongoing: bool,
    pub in_library: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub genres: Vec<String>,
    pub provider_id: Option<ProviderId>,
}

impl CatalogItemInput {
    /// Applies `self` as a shallow patch over `base`: supplied fields win,
    /// absent fields keep the stored value.
    #[must_use]
    pub fn merge_onto(self, base: Self) -> Self {
        Self {
            title: self.title.or(base.title),
            description: self.description.or(base.description),
            poster_url: self.poster_url.or(base.poster_url),
            banner_url: self.banner_url.or(base.banner_url),
            trailer_url: self.trailer_url.or(base.trailer_url),
            episodes: self.episodes.or(base.episodes),
            duration_minutes: self.duration_minutes.or(base.duration_minutes),
            release_date: self.release_date.or(base.release_date),
            year: self.year.or(base.year),
            season: self.season.or(base.season),
            age_rating: self.age_rating.or(base.age_rating),
            is_ongoing: self.is_ongoing.or(base.is_ongoing),
            in_library: self.in_library.or(base.in_library),
            is_favorite: self.is_favorite.or(base.is_favorite),
            rating: self.rating.or(base.rating),
            genres: self.genres.or(base.genres),
            provider: self.provider.or(base.provider),
        }
    }

    /// Normalizes and validates the payload. This is the only way to obtain
    /// a [`CatalogItemRecord`], so derived fields are recomputed on every
    /// write.
    ///
    /// # Errors
    ///
    /// Returns every violated constraint, in field order.
    pub fn into_record(self) -> Result<CatalogItemRecord, Vec<String>> {
        let mut v = Violations::default();

        let title = v.required(non_empty(self.title), "Anime title is required");

        let description = v.required(non_empty(self.description), "Description is required");
        if let Some(description) = &description {
            v.check(
                description.chars().count() >= 10,
                "Description must be at least 10 characters",
            );
        }

        let poster_url = v.required(non_empty(self.poster_url), "Poster URL is required");
        if let Some(url) = &poster_url {
            v.check(
                is_http_url(url),
                "Poster URL must start with http:// or https://",
            );
        }

        let banner_url = non_empty(self.banner_url.flatten());
        if let Some(url) = &banner_url {
            v.check(
                is_http_url(url),
                "Banner URL must start with http:// or https://",
            );
        }

        let trailer_url = non_empty(self.trailer_url.flatten());
        if let Some(url) = &trailer_url {
            v.check(
                is_http_url(url),
                "Trailer URL must start with http:// or https://",
            );
        }

        let episodes = v.required(self.episodes, "Episodes is required");
        if let Some(episodes) = episodes {
            v.check(episodes >= 1, "Episodes must be at least 1");
        }

        let duration_minutes = self.duration_minutes.flatten();
        if let Some(minutes) = duration_minutes {
            v.check(minutes >= 1, "Duration must be at least 1 minute");
        }

        let release_date = match non_empty(self.release_date) {
            None => {
                v.push("Release date is required");
                None
            }
            Some(raw) => {
                let parsed = parse_date(&raw);
                v.check(parsed.is_some(), "Release date must be a valid date");
                parsed
            }
        };

        let year = self
            .year
            .flatten()
            .or_else(|| release_date.map(|date| date.year()));
        if let Some(year) = year {
            v.check(year >= 1950, "Year must be at least 1950");
            v.check(year <= 2100, "Year must be at most 2100");
        }

        // Unknown spellings are dropped rather than rejected.
        let season = self
            .season
            .flatten()
            .as_deref()
            .and_then(Season::from_synonym);

        let age_rating = match non_empty(self.age_rating.flatten()) {
            None => None,
            Some(raw) => {
                let parsed = raw.parse::<AgeRating>().ok();
                v.check(
                    parsed.is_some(),
                    "Age rating must be one of G, PG, PG-13, R, R+, RX",
                );
                parsed
            }
        };

        let is_ongoing = v.required(self.is_ongoing, "isOngoing is required");

        let rating = v.required(self.rating, "Rating is required");
        if let Some(rating) = rating {
            v.check(rating >= 0.0, "Rating must be at least 0");
            v.check(rating <= 10.0, "Rating must be at most 10");
        }

        let genres = match self.genres {
            None => {
                v.push("Genres are required");
                None
            }
            Some(raw) => {
                let genres = normalize_genres(raw);
                v.check(!genres.is_empty(), "At least one genre is required");
                Some(genres)
            }
        };

        let provider_id = match non_empty(self.provider.flatten()) {
            None => None,
            Some(raw) => {
                let id = ProviderId::parse(&raw);
                v.check(id.is_some(), "Invalid provider identifier");
                id
            }
        };

        let (
            Some(title),
            Some(description),
            Some(poster_url),
            Some(episodes),
            Some(release_date),
            Some(year),
            Some(is_ongoing),
            Some(rating),
            Some(genres),
        ) = (
            title,
            description,
            poster_url,
            episodes,
            release_date,
            year,
            is_ongoing,
            rating,
            genres,
        )
        else {
            return Err(v.into_vec());
        };

        if !v.is_empty() {
            return Err(v.into_vec());
        }

        Ok(CatalogItemRecord {
            title_normalized: normalize_key(&title),
            title,
            description,
            poster_url,
            banner_url,
            trailer_url,
            episodes,
            duration_minutes,
            release_date,
            year,
            season,
            age_rating,
            is_ongoing,
            in_library: self.in_library.unwrap_or(false),
            is_favorite: self.is_favorite.unwrap_or(false),
            rating,
            genres,
            provider_id,
        })
    }
}

impl From<CatalogItemRecord> for CatalogItemInput {
    fn from(record: CatalogItemRecord) -> Self {
        Self {
            title: Some(record.title),
            description: Some(record.description),
            poster_url: Some(record.poster_url),
            banner_url: Some(record.banner_url),
            trailer_url: Some(record.trailer_url),
            episodes: Some(record.episodes),
            duration_minutes: Some(record.duration_minutes),
            release_date: Some(record.release_date.to_rfc3339()),
            year: Some(Some(record.year)),
            season: Some(record.season.map(|s| s.as_str().to_string())),
            age_rating: Some(record.age_rating.map(|r| r.as_str().to_string())),
            is_ongoing: Some(record.is_ongoing),
            in_library: Some(record.in_library),
            is_favorite: Some(record.is_favorite),
            rating: Some(record.rating),
            genres: Some(record.genres),
            provider: Some(record.provider_id.map(|id| id.to_string())),
        }
    }
}

/// Lowercased, trimmed form used for uniqueness checks.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trims entries, drops empty ones and removes case-insensitive duplicates.
/// The first spelling seen is kept.
#[must_use]
pub fn normalize_genres(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|genre| genre.trim().to_string())
        .filter(|genre| !genre.is_empty())
        .filter(|genre| seen.insert(genre.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CatalogItemInput {
        serde_json::from_value(serde_json::json!({
            "title": "  Zankyou no Terror ",
            "description": "Two enigmatic teens challenge Tokyo with cryptic attacks.",
            "posterUrl": "https://example.com/zankyou.jpg",
            "episodes": 11,
            "releaseDate": "2014-07-11",
            "isOngoing": false,
            "rating": 7.8,
            "genres": ["Psychological", "Thriller"]
        }))
        .unwrap()
    }

    #[test]
    fn derives_normalized_title_and_year() {
        let record = valid_input().into_record().unwrap();
        assert_eq!(record.title, "Zankyou no Terror");
        assert_eq!(record.title_normalized, "zankyou no terror");
        assert_eq!(record.year, 2014);
        assert!(!record.in_library);
        assert!(!record.is_favorite);
    }

    #[test]
    fn explicit_year_wins_over_release_date() {
        let mut input = valid_input();
        input.year = Some(Some(2015));
        assert_eq!(input.into_record().unwrap().year, 2015);
    }

    #[test]
    fn genres_are_trimmed_and_deduplicated() {
        let genres = vec![
            "Action".to_string(),
            "action".to_string(),
            " Action ".to_string(),
            "  ".to_string(),
            "Drama".to_string(),
        ];
        assert_eq!(normalize_genres(genres), vec!["Action", "Drama"]);
    }

    #[test]
    fn blank_genres_are_rejected() {
        let mut input = valid_input();
        input.genres = Some(vec![" ".to_string()]);
        let errors = input.into_record().unwrap_err();
        assert_eq!(errors, vec!["At least one genre is required"]);
    }

    #[test]
    fn collects_every_violation() {
        let input: CatalogItemInput = serde_json::from_value(serde_json::json!({
            "description": "short",
            "posterUrl": "not a url",
            "episodes": 0,
            "releaseDate": "1900-01-01",
            "rating": 11
        }))
        .unwrap();

        let errors = input.into_record().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Anime title is required",
                "Description must be at least 10 characters",
                "Poster URL must start with http:// or https://",
                "Episodes must be at least 1",
                "Year must be at least 1950",
                "isOngoing is required",
                "Rating must be at most 10",
                "Genres are required",
            ]
        );
    }

    #[test]
    fn season_synonyms_normalize_and_unknown_is_dropped() {
        assert_eq!(Season::from_synonym("SUMMER"), Some(Season::Summer));
        assert_eq!(Season::from_synonym(" otoño "), Some(Season::Fall));
        assert_eq!(Season::from_synonym("Invierno"), Some(Season::Winter));
        assert_eq!(Season::from_synonym("monsoon"), None);

        let mut input = valid_input();
        input.season = Some(Some("monsoon".to_string()));
        assert_eq!(input.into_record().unwrap().season, None);
    }

    #[test]
    fn age_rating_must_be_known() {
        let mut input = valid_input();
        input.age_rating = Some(Some("NC-17".to_string()));
        assert_eq!(
            input.into_record().unwrap_err(),
            vec!["Age rating must be one of G, PG, PG-13, R, R+, RX"]
        );
        assert_eq!("PG-13".parse::<AgeRating>(), Ok(AgeRating::Pg13));
    }

    #[test]
    fn patch_overrides_only_supplied_fields() {
        let stored = CatalogItemInput::from(valid_input().into_record().unwrap());
        let patch: CatalogItemInput = serde_json::from_value(serde_json::json!({
            "title": "Terror in Resonance",
            "bannerUrl": "https://example.com/banner.jpg",
            "isFavorite": true
        }))
        .unwrap();

        let record = patch.merge_onto(stored).into_record().unwrap();
        assert_eq!(record.title_normalized, "terror in resonance");
        assert_eq!(record.banner_url.as_deref(), Some("https://example.com/banner.jpg"));
        assert!(record.is_favorite);
        assert_eq!(record.episodes, 11);
        assert_eq!(record.genres, vec!["Psychological", "Thriller"]);
    }

    #[test]
    fn patch_null_clears_optional_field() {
        let mut base = valid_input();
        base.duration_minutes = Some(Some(24));
        let stored = CatalogItemInput::from(base.into_record().unwrap());

        let patch: CatalogItemInput =
            serde_json::from_value(serde_json::json!({ "durationMinutes": null })).unwrap();
        let record = patch.merge_onto(stored).into_record().unwrap();
        assert_eq!(record.duration_minutes, None);
    }

    #[test]
    fn studio_alias_sets_provider() {
        let id = ProviderId::generate();
        let mut json = serde_json::json!({
            "title": "Mob Psycho 100",
            "description": "A powerful esper tries to live a normal life.",
            "posterUrl": "https://example.com/mob.jpg",
            "episodes": 37,
            "releaseDate": "2016-07-12",
            "isOngoing": false,
            "rating": 8.7,
            "genres": ["Action"]
        });
        json["studio"] = serde_json::Value::String(id.to_string());

        let input: CatalogItemInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.into_record().unwrap().provider_id, Some(id));
    }

    #[test]
    fn malformed_provider_reference_is_rejected() {
        let mut input = valid_input();
        input.provider = Some(Some("abc".to_string()));
        assert_eq!(
            input.into_record().unwrap_err(),
            vec!["Invalid provider identifier"]
        );
    }
}
