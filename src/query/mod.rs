//! Query-string mini-DSL for filtering, searching, sorting, pagination,
//! time-boxing, and relation population.
//!
//! A [`Query`] holds up to six independent sub-intents. Each renders a
//! `key=value&` fragment sequence; the fragments concatenate in a fixed
//! order (populate, timebox, filter, search, sort, paginate) behind a `?`
//! prefix, and a query with no populated sub-intents renders as the empty
//! string.
//!
//! # Truthiness
//!
//! Fields are emitted only when set and non-empty: zero, the empty string,
//! and `false` are all treated as absent. Callers rely on omitting
//! zero-valued filters, so this holds even where a zero would be
//! meaningful (`page = 0` is never sent).
//!
//! # Example
//!
//! ```rust
//! use portico::query::{Filter, Paginate, Query};
//!
//! let query = Query::new()
//!     .filter(Filter::new().prop("status").value("open"))
//!     .paginate(Paginate::new().limit(25).page(2));
//!
//! assert_eq!(
//!     query.to_query_string(),
//!     "?filter_prop=status&filter_val=open&limit=25&page=2"
//! );
//! ```

mod serialize;

pub use serialize::serialize;

use chrono::{DateTime, Utc};
use serde_json::Value;

use serialize::scalar;

/// Relation-population intent: which linked records to expand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Populate {
    /// The relation paths to expand, as a structured value.
    pub paths: Value,
}

impl Populate {
    /// Creates a populate intent for the given paths.
    #[must_use]
    pub const fn new(paths: Value) -> Self {
        Self { paths }
    }

    /// Renders the `populate=...&` fragment.
    #[must_use]
    pub fn fragment(&self) -> String {
        format!("populate={}&", serialize(&self.paths, None))
    }
}

/// Time-boxing intent: bound results by creation or update time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timebox {
    /// Lower bound on creation time.
    pub created_after: Option<String>,
    /// Upper bound on creation time.
    pub created_before: Option<String>,
    /// The property holding the creation timestamp, when not the default.
    pub created_prop: Option<String>,
    /// Lower bound on update time.
    pub updated_after: Option<String>,
    /// Upper bound on update time.
    pub updated_before: Option<String>,
    /// The property holding the update timestamp, when not the default.
    pub updated_prop: Option<String>,
}

impl Timebox {
    /// Creates an empty timebox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds creation time to the given window, rendered as RFC 3339.
    #[must_use]
    pub fn created_between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            created_after: Some(after.to_rfc3339()),
            created_before: Some(before.to_rfc3339()),
            ..Self::default()
        }
    }

    /// Bounds update time to the given window, rendered as RFC 3339.
    #[must_use]
    pub fn updated_between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            updated_after: Some(after.to_rfc3339()),
            updated_before: Some(before.to_rfc3339()),
            ..Self::default()
        }
    }

    /// Renders the timebox fragment, one `key=value&` pair per set field.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut q = String::new();
        push_field(&mut q, "created_after", self.created_after.as_deref());
        push_field(&mut q, "created_before", self.created_before.as_deref());
        push_field(&mut q, "created_prop", self.created_prop.as_deref());
        push_field(&mut q, "updated_after", self.updated_after.as_deref());
        push_field(&mut q, "updated_before", self.updated_before.as_deref());
        push_field(&mut q, "updated_prop", self.updated_prop.as_deref());
        q
    }
}

/// Filtering intent: match a property against a value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    /// The property to filter on.
    pub prop: Option<String>,
    /// The value to compare against.
    pub value: Option<Value>,
    /// The comparison function (e.g. `eq`, `gt`).
    pub function: Option<String>,
}

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the property to filter on.
    #[must_use]
    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    /// Sets the value to compare against.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the comparison function.
    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Renders the `filter_prop=`, `filter_val=`, `filter_fn=` fragment.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut q = String::new();
        push_field(&mut q, "filter_prop", self.prop.as_deref());
        if let Some(value) = self.value.as_ref().filter(|v| truthy(v)) {
            q.push_str(&format!("filter_val={}&", scalar(value)));
        }
        push_field(&mut q, "filter_fn", self.function.as_deref());
        q
    }
}

/// Search intent: free-text match over one or more properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Search {
    /// The property to search.
    pub prop: Option<String>,
    /// The search text.
    pub value: Option<String>,
    /// Structured paths to search across, serialized with bracket notation.
    pub paths: Option<Value>,
    /// Whether the match is case sensitive; emitted only when `true`.
    pub case_sensitive: bool,
}

impl Search {
    /// Creates an empty search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the property to search.
    #[must_use]
    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    /// Sets the search text.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the structured paths to search across.
    #[must_use]
    pub fn paths(mut self, paths: Value) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Makes the match case sensitive.
    #[must_use]
    pub const fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Renders the search fragment.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut q = String::new();
        push_field(&mut q, "search_prop", self.prop.as_deref());
        push_field(&mut q, "search_query", self.value.as_deref());
        if let Some(paths) = &self.paths {
            q.push_str(&format!("search_paths={}&", serialize(paths, None)));
        }
        if self.case_sensitive {
            q.push_str("search_case_sensitive=true&");
        }
        q
    }
}

/// Sorting intent: order results by a property.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sort {
    /// The property to sort by.
    pub prop: Option<String>,
    /// The sort direction (e.g. `asc`, `desc`).
    pub direction: Option<String>,
    /// The comparison function applied while sorting.
    pub function: Option<String>,
}

impl Sort {
    /// Creates an empty sort.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the property to sort by.
    #[must_use]
    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Sets the comparison function.
    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Renders the `sort_prop=`, `sort_dir=`, `sort_fn=` fragment.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut q = String::new();
        push_field(&mut q, "sort_prop", self.prop.as_deref());
        push_field(&mut q, "sort_dir", self.direction.as_deref());
        push_field(&mut q, "sort_fn", self.function.as_deref());
        q
    }
}

/// Pagination intent: page size and page number.
///
/// A zero `limit` or `page` is omitted, like every other falsy field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paginate {
    /// Maximum records per page.
    pub limit: Option<u64>,
    /// The page number to fetch.
    pub page: Option<u64>,
}

impl Paginate {
    /// Creates an empty paginate intent.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limit: None,
            page: None,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Renders the `limit=`, `page=` fragment.
    #[must_use]
    pub fn fragment(&self) -> String {
        let mut q = String::new();
        if let Some(limit) = self.limit.filter(|&n| n != 0) {
            q.push_str(&format!("limit={limit}&"));
        }
        if let Some(page) = self.page.filter(|&n| n != 0) {
            q.push_str(&format!("page={page}&"));
        }
        q
    }
}

/// A full query intent: up to six independent, optional sub-intents.
///
/// Sub-intents compose by concatenation and need no cross-validation: a
/// sort without a filter is valid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    /// Relation population.
    pub populate: Option<Populate>,
    /// Time bounds.
    pub timebox: Option<Timebox>,
    /// Property filter.
    pub filter: Option<Filter>,
    /// Free-text search.
    pub search: Option<Search>,
    /// Result ordering.
    pub sort: Option<Sort>,
    /// Pagination.
    pub paginate: Option<Paginate>,
}

impl Query {
    /// Creates a query with every sub-intent absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the populate sub-intent.
    #[must_use]
    pub fn populate(mut self, populate: Populate) -> Self {
        self.populate = Some(populate);
        self
    }

    /// Sets the timebox sub-intent.
    #[must_use]
    pub fn timebox(mut self, timebox: Timebox) -> Self {
        self.timebox = Some(timebox);
        self
    }

    /// Sets the filter sub-intent.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the search sub-intent.
    #[must_use]
    pub fn search(mut self, search: Search) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the sort sub-intent.
    #[must_use]
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the paginate sub-intent.
    #[must_use]
    pub fn paginate(mut self, paginate: Paginate) -> Self {
        self.paginate = Some(paginate);
        self
    }

    /// Renders the full query string.
    ///
    /// Fragments concatenate in the fixed order populate, timebox, filter,
    /// search, sort, paginate behind a `?` prefix; the trailing `&` is
    /// trimmed. With every sub-intent absent the result is the empty
    /// string, with no leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut q = String::from("?");

        if let Some(populate) = &self.populate {
            q.push_str(&populate.fragment());
        }
        if let Some(timebox) = &self.timebox {
            q.push_str(&timebox.fragment());
        }
        if let Some(filter) = &self.filter {
            q.push_str(&filter.fragment());
        }
        if let Some(search) = &self.search {
            q.push_str(&search.fragment());
        }
        if let Some(sort) = &self.sort {
            q.push_str(&sort.fragment());
        }
        if let Some(paginate) = &self.paginate {
            q.push_str(&paginate.fragment());
        }

        q.pop();
        q
    }
}

/// Appends `key=value&` when the value is set and non-empty.
fn push_field(q: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        q.push_str(&format!("{key}={value}&"));
    }
}

/// Host-language truthiness over JSON values: null, `false`, zero, and the
/// empty string are all falsy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
