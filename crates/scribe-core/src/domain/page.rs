/// Owner-scoped listing criteria for posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Substring the title must contain. `None` lists everything.
    pub keyword: Option<String>,
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

impl PostQuery {
    pub fn new(keyword: Option<&str>, page: u64, per_page: u64) -> Self {
        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);

        Self {
            keyword,
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip before this page starts. Saturates for pages
    /// far past any real total.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of results together with the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
