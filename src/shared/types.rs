use serde::Deserialize;
use utoipa::IntoParams;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Standard limit/offset query parameters for list endpoints.
///
/// Both fields are accepted as raw strings so an unparseable value falls
/// back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Maximum items to return (default: 20, max: 100)
    pub limit: Option<String>,

    /// Number of items to skip (default: 0)
    pub offset: Option<String>,
}

impl PageQuery {
    /// Effective LIMIT: default 20 when absent or unparseable, clamped to [0, 100]
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(0, MAX_PAGE_SIZE)
    }

    /// Effective OFFSET: default 0 when absent, unparseable, or negative
    pub fn offset(&self) -> i64 {
        self.offset
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0)
            .max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> PageQuery {
        PageQuery {
            limit: limit.map(String::from),
            offset: offset.map(String::from),
        }
    }

    #[test]
    fn limit_defaults_when_absent() {
        assert_eq!(query(None, None).limit(), 20);
    }

    #[test]
    fn limit_defaults_when_unparseable() {
        assert_eq!(query(Some("abc"), None).limit(), 20);
        assert_eq!(query(Some(""), None).limit(), 20);
    }

    #[test]
    fn limit_clamps_to_max() {
        assert_eq!(query(Some("1000"), None).limit(), 100);
    }

    #[test]
    fn limit_clamps_negative_to_zero() {
        assert_eq!(query(Some("-5"), None).limit(), 0);
    }

    #[test]
    fn limit_zero_is_honored() {
        assert_eq!(query(Some("0"), None).limit(), 0);
    }

    #[test]
    fn offset_defaults_and_floors() {
        assert_eq!(query(None, None).offset(), 0);
        assert_eq!(query(None, Some("garbage")).offset(), 0);
        assert_eq!(query(None, Some("-10")).offset(), 0);
        assert_eq!(query(None, Some("40")).offset(), 40);
    }
}
