use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::normalize_key;
use super::input::{Violations, non_empty, nullable, parse_date};
use crate::domain::ProviderId;

/// A studio that catalog items may reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub country: Option<String>,
    pub founded_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub founded_date: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub name: String,
    pub name_normalized: String,
    pub country: Option<String>,
    pub founded_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl ProviderInput {
    #[must_use]
    pub fn merge_onto(self, base: Self) -> Self {
        Self {
            name: self.name.or(base.name),
            country: self.country.or(base.country),
            founded_date: self.founded_date.or(base.founded_date),
            is_active: self.is_active.or(base.is_active),
        }
    }

    /// # Errors
    ///
    /// Returns every violated constraint.
    pub fn into_record(self) -> Result<ProviderRecord, Vec<String>> {
        let mut v = Violations::default();

        let name = v.required(non_empty(self.name), "Studio name is required");

        let founded_date = match non_empty(self.founded_date.flatten()) {
            None => None,
            Some(raw) => {
                let parsed = parse_date(&raw);
                v.check(parsed.is_some(), "Founded date must be a valid date");
                parsed
            }
        };

        match name {
            Some(name) if v.is_empty() => Ok(ProviderRecord {
                name_normalized: normalize_key(&name),
                name,
                country: non_empty(self.country.flatten()),
                founded_date,
                is_active: self.is_active.unwrap_or(true),
            }),
            _ => Err(v.into_vec()),
        }
    }
}

impl From<ProviderRecord> for ProviderInput {
    fn from(record: ProviderRecord) -> Self {
        Self {
            name: Some(record.name),
            country: Some(record.country),
            founded_date: Some(record.founded_date.map(|d| d.to_rfc3339())),
            is_active: Some(record.is_active),
        }
    }
}
