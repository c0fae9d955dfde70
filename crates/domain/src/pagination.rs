use serde::{Deserialize, Serialize};

const MAX_LIMIT: i64 = 100;

/// Raw `?page=&limit=` query input, clamped by [`PageQuery::normalize`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp to `page >= 1`, `1 <= limit <= 100`, returning
    /// `(page, limit, offset)` ready to feed into a query. The offset
    /// saturates so an absurd client-supplied page cannot overflow.
    pub fn normalize(self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        let offset = page.saturating_sub(1).saturating_mul(limit);
        (page, limit, offset)
    }
}

/// Uniform pagination envelope for all listing endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub limit: i64,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(total: i64, page: i64, limit: i64, items: Vec<T>) -> Self {
        // ceil(total / limit), but never below one page
        let total_pages = ((total + limit - 1) / limit).max(1);
        Self {
            total,
            page,
            total_pages,
            limit,
            items,
        }
    }
}
