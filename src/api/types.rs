use serde::Serialize;

use crate::models::CatalogItem;

/// Body of every error response: `{"error": {"message", "statusCode"}}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                status_code,
            },
        }
    }
}

/// One page of catalog items plus the paging that produced it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub sort_by: &'static str,
    pub order: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub hero: Option<CatalogItem>,
    pub top_rated: Vec<CatalogItem>,
    pub trending: Vec<CatalogItem>,
    pub ongoing: Vec<CatalogItem>,
    pub upcoming: Vec<CatalogItem>,
    pub genres: Vec<String>,
    pub stats: DiscoveryStats,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub total: u64,
    pub ongoing: u64,
    pub upcoming: u64,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub ok: bool,
    pub message: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ok: bool,
    pub database: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let json = serde_json::to_value(ErrorEnvelope::new("Anime not found", 404)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": {"message": "Anime not found", "statusCode": 404}})
        );
    }

    #[test]
    fn page_uses_camel_case_keys() {
        let page = CatalogPage {
            items: Vec::new(),
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 1,
            sort_by: "createdAt",
            order: "desc",
        };
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["sortBy"], "createdAt");
    }
}
