use serde::{Deserialize, Serialize};

/// Position and size metadata for one page of a server-side collection.
///
/// Values are copied from the server as sent, without range checks. A field
/// the server omitted is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items in this page.
    #[serde(default)]
    pub count: Option<i64>,
    /// Size of the full collection on the server.
    #[serde(default)]
    pub total: Option<i64>,
    /// One-based page number.
    #[serde(default)]
    pub page: Option<i64>,
    /// Requested page size.
    #[serde(default)]
    pub per_page: Option<i64>,
    /// Query the page was filtered with.
    #[serde(default)]
    pub query: Option<String>,
}

/// One slice of a server-side collection.
///
/// `count == list.len()` and `list.len() <= per_page` are guaranteed by the
/// server, not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    list: Vec<T>,
    pagination: Pagination,
}

impl<T> Page<T> {
    /// Creates a page from decoded items and metadata.
    #[must_use]
    pub fn new(list: Vec<T>, pagination: Pagination) -> Self {
        Self { list, pagination }
    }

    /// Returns items in server order.
    #[must_use]
    pub fn list(&self) -> &[T] {
        self.list.as_slice()
    }

    /// Returns pagination metadata.
    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Iterates items in server order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.list.iter()
    }

    /// Converts every item while keeping pagination metadata.
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            list: self.list.into_iter().map(transform).collect(),
            pagination: self.pagination,
        }
    }

    /// Splits the page into items and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Pagination) {
        (self.list, self.pagination)
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
