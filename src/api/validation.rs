use super::ApiError;
use crate::domain::{CatalogItemId, ProviderId};

const INVALID_ID: &str = "Invalid id";

pub fn parse_item_id(raw: &str) -> Result<CatalogItemId, ApiError> {
    CatalogItemId::parse(raw).ok_or_else(|| ApiError::validation(INVALID_ID))
}

pub fn parse_provider_id(raw: &str) -> Result<ProviderId, ApiError> {
    ProviderId::parse(raw).ok_or_else(|| ApiError::validation(INVALID_ID))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        let id = CatalogItemId::generate();
        assert_eq!(parse_item_id(&id.to_string()).unwrap(), id);
        assert!(parse_item_id("42").is_err());
        assert!(parse_item_id("").is_err());
    }

    #[test]
    fn test_parse_provider_id() {
        assert!(parse_provider_id("not-a-uuid").is_err());
        assert!(parse_provider_id(&ProviderId::generate().to_string()).is_ok());
    }

    #[test]
    fn test_invalid_id_message() {
        let err = parse_item_id("zzz").unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(ref msg) if msg == "Invalid id"));
    }
}
