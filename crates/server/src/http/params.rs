use domain::SortOrder;
use serde::Deserialize;

use crate::config::PaginationSettings;

pub const DEFAULT_POPULAR_LIMIT: i64 = 10;
pub const MAX_POPULAR_LIMIT: i64 = 50;

/// Raw query string of a comment page request. Values stay strings so that
/// garbage input falls back to defaults instead of rejecting the request.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub sort: SortOrder,
}

impl PageQuery {
    pub fn normalize(&self, settings: PaginationSettings) -> PageRequest {
        let max_limit = settings.max_limit.max(1);
        let limit = positive(self.limit.as_deref())
            .unwrap_or(settings.default_limit)
            .clamp(1, max_limit);
        // page * limit 必须落在 i64 内
        let page = positive(self.page.as_deref())
            .unwrap_or(1)
            .min(i64::MAX / max_limit);
        let sort = self
            .sort
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        PageRequest { page, limit, sort }
    }
}

#[derive(Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn popular_limit(&self) -> i64 {
        positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_POPULAR_LIMIT)
            .min(MAX_POPULAR_LIMIT)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_name: Option<String>,
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}
