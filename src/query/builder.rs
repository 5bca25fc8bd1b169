//! # Query Builder
//!
//! Accumulates the selected fields, filter tree, sort keys and paging of an
//! items query, and turns them into Directus query parameters.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::explain::Explain;
use super::filter::Filter;
use crate::schema::Field;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parse a comma-separated list such as `-rating,title`
    pub fn parse_list(keys: &str) -> QueryResult<Vec<SortKey>> {
        keys.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    /// `field` sorts ascending, `-field` descending
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Descending),
            None => (s, SortDirection::Ascending),
        };
        if field.is_empty() || field.contains(char::is_whitespace) {
            return Err(QueryError::InvalidSort(s.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortKey {
    /// Wire form: `-field` for descending
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// An items query against one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: String,
    fields: Vec<String>,
    filter: Option<Filter>,
    sort: Vec<SortKey>,
    limit: Option<i64>,
    offset: Option<u64>,
    page: Option<u64>,
    search: Option<String>,
}

impl Query {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            fields: Vec::new(),
            filter: None,
            sort: Vec::new(),
            limit: None,
            offset: None,
            page: None,
            search: None,
        }
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Add fields to the selection
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for f in fields {
            let f = f.into();
            if !self.fields.contains(&f) {
                self.fields.push(f);
            }
        }
        self
    }

    /// AND a filter with the current one
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        let filter = filter.into();
        self.filter = Some(match self.filter.take() {
            Some(root) => root.and(filter),
            None => filter,
        });
        self
    }

    /// OR a filter with the current one
    pub fn or_filter(mut self, filter: impl Into<Filter>) -> Self {
        let filter = filter.into();
        self.filter = Some(match self.filter.take() {
            Some(root) => root.or(filter),
            None => filter,
        });
        self
    }

    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort_by(SortKey::asc(field))
    }

    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort_by(SortKey::desc(field))
    }

    /// Add a sort key; a key on an already sorted field replaces it
    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.retain(|k| k.field != key.field);
        self.sort.push(key);
        self
    }

    /// Add sort keys from `-a,b` notation, skipping malformed parts
    pub fn sort(self, keys: &str) -> Self {
        keys.split(',')
            .filter_map(|part| part.parse::<SortKey>().ok())
            .fold(self, Query::sort_by)
    }

    /// Maximum items; `-1` returns all
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// 1-based page, used together with `limit`
    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    /// Full-text search across the collection's string fields
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn selected_fields(&self) -> &[String] {
        &self.fields
    }

    pub fn filter_tree(&self) -> Option<&Filter> {
        self.filter.as_ref().filter(|f| !f.is_empty())
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn page_value(&self) -> Option<u64> {
        self.page
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The filter object; `{}` when nothing is filtered
    pub fn to_filter_json(&self) -> Value {
        match self.filter_tree() {
            Some(f) => f.to_json(),
            None => Value::Object(Default::default()),
        }
    }

    /// Pretty-printed filter object
    pub fn to_json(&self) -> String {
        format!("{:#}", self.to_filter_json())
    }

    /// Query string parameters, in a stable order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        if let Some(f) = self.filter_tree() {
            params.push(("filter".to_string(), f.to_json().to_string()));
        }
        if !self.sort.is_empty() {
            let sort: Vec<String> = self.sort.iter().map(SortKey::to_string).collect();
            params.push(("sort".to_string(), sort.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }

        params
    }

    /// Check the query against a collection's fields.
    ///
    /// Every selected, filtered and sorted field must exist. Dotted
    /// relational paths are checked on their first segment only.
    pub fn validate(&self, fields: &[Field]) -> QueryResult<()> {
        let known: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();

        let mut referenced: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        if let Some(filter) = self.filter_tree() {
            referenced.extend(filter.conditions().into_iter().map(|c| c.field()));
        }
        referenced.extend(self.sort.iter().map(|k| k.field.as_str()));

        for name in referenced {
            let root = root_field(name);
            if root != "*" && !known.contains(root) {
                return Err(QueryError::UnknownField {
                    collection: self.collection.clone(),
                    field: name.to_string(),
                });
            }
        }

        if let Some(filter) = self.filter_tree() {
            filter.validate_operands()?;
        }

        match self.limit {
            Some(limit) if limit < -1 => Err(QueryError::InvalidLimit(limit)),
            _ => Ok(()),
        }
    }

    /// Native, SQL-like and English renderings of the query
    pub fn explain(&self) -> Explain {
        Explain::from_query(self)
    }
}

/// Field a path starts from: `author.name` -> `author`, `year(date)` -> `date`
fn root_field(path: &str) -> &str {
    let inner = match (path.find('('), path.strip_suffix(')')) {
        (Some(open), Some(stripped)) => &stripped[open + 1..],
        _ => path,
    };
    inner.split('.').next().unwrap_or(inner).trim()
}
