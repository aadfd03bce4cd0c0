use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::IntoParams;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number (default 1)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    pub page: Option<u64>,
    /// Items per page (default 10)
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Input {
    Number(u64),
    Text(String),
}

/// Query values arrive as strings from some clients and numbers from others;
/// accept both.
pub fn deserialize_optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<U64Input>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(U64Input::Number(number)) => Ok(Some(number)),
        Some(U64Input::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(DeError::custom),
    }
}

const MAX_PAGE_LIMIT: u64 = 500;

impl PageParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata block returned alongside every page slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    /// `total_items` is the pre-pagination match count;
    /// `total_pages = ceil(total_items / limit)`.
    pub fn compute(page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(limit);
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_info_math() {
        let info = PageInfo::compute(1, 10, 3);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next_page);
        assert!(!info.has_prev_page);

        let info = PageInfo::compute(2, 10, 31);
        assert_eq!(info.total_pages, 4);
        assert!(info.has_next_page);
        assert!(info.has_prev_page);

        let info = PageInfo::compute(1, 10, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
    }

    #[test]
    fn defaults_and_clamping() {
        let params = PageParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);

        let params = PageParams {
            page: Some(0),
            limit: Some(100_000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn lenient_numeric_parsing() {
        #[derive(Deserialize)]
        struct Q {
            #[serde(default, deserialize_with = "deserialize_optional_u64")]
            page: Option<u64>,
        }
        let q: Q = serde_json::from_str(r#"{"page":"3"}"#).unwrap();
        assert_eq!(q.page, Some(3));
        let q: Q = serde_json::from_str(r#"{"page":3}"#).unwrap();
        assert_eq!(q.page, Some(3));
        assert!(serde_json::from_str::<Q>(r#"{"page":"x"}"#).is_err());
    }
}
