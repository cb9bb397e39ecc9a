//! Collection query modifiers and their wire serialization.

/// Filter, sort, and include modifiers for a collection load.
///
/// Modifiers serialize in the fixed order filter, sort, include. The
/// first appended modifier gets a leading `?`, every later one a
/// leading `&`. Filters keep their insertion order.
#[derive(Clone, Debug, Default)]
pub struct Query {
    filters: Vec<(String, String)>,
    sort: Vec<String>,
    include: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Default::default()
    }

    /// Exact-match filter on a field, serialized as `filter{field}=value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Sort by a field, serialized as `sort[]=field`. A leading `-`
    /// (descending marker) is passed through verbatim.
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort.push(field.into());
        self
    }

    /// Expand a related field inline, serialized as `include[]=field.*`.
    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.include.push(field.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sort.is_empty() && self.include.is_empty()
    }

    /// The query-string path tail, or `""` when no modifiers are set.
    pub(crate) fn to_tail(&self) -> String {
        let mut tail = String::new();
        for (field, value) in &self.filters {
            tail.push(if tail.is_empty() { '?' } else { '&' });
            tail.push_str(&format!("filter{{{}}}={}", field, value));
        }
        for field in &self.sort {
            tail.push(if tail.is_empty() { '?' } else { '&' });
            tail.push_str(&format!("sort[]={}", field));
        }
        for field in &self.include {
            tail.push(if tail.is_empty() { '?' } else { '&' });
            tail.push_str(&format!("include[]={}.*", field));
        }
        tail
    }
}
