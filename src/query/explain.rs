//! # Query Explain
//!
//! Renders a query three ways: the native Directus filter object, an
//! equivalent SQL-like statement, and a plain-English sentence. Output is
//! deterministic for a given query.

use std::fmt;

use serde_json::Value;

use super::builder::{Query, SortDirection};
use super::filter::{Condition, Filter};
use super::operator::{Logic, Operator};

/// Explain output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explain {
    /// Pretty-printed filter object
    pub native: String,
    pub sql: String,
    pub english: String,
}

impl Explain {
    pub fn from_query(query: &Query) -> Self {
        Self {
            native: query.to_json(),
            sql: sql_statement(query),
            english: english_sentence(query),
        }
    }
}

impl fmt::Display for Explain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN QUERY ===")?;
        writeln!(f, "Directus filter:")?;
        writeln!(f, "{}", self.native)?;
        writeln!(f)?;
        writeln!(f, "SQL:")?;
        writeln!(f, "{}", self.sql)?;
        writeln!(f)?;
        writeln!(f, "English:")?;
        writeln!(f, "{}", self.english)
    }
}

// =============================================================================
// SQL
// =============================================================================

fn sql_statement(query: &Query) -> String {
    let fields = query.selected_fields();
    let select = if fields.is_empty() {
        "*".to_string()
    } else {
        fields.join(", ")
    };

    let mut lines = vec![
        format!("SELECT {}", select),
        format!("FROM {}", query.collection()),
    ];

    if let Some(filter) = query.filter_tree() {
        lines.push(format!("WHERE {}", sql_filter(filter, None)));
    }

    if !query.sort_keys().is_empty() {
        let order: Vec<String> = query
            .sort_keys()
            .iter()
            .map(|k| match k.direction {
                SortDirection::Ascending => format!("{} ASC", k.field),
                SortDirection::Descending => format!("{} DESC", k.field),
            })
            .collect();
        lines.push(format!("ORDER BY {}", order.join(", ")));
    }

    let limit = query.limit_value().filter(|l| *l >= 0);
    if let Some(limit) = limit {
        lines.push(format!("LIMIT {}", limit));
    }

    let offset = query.offset_value().or_else(|| {
        let page = query.page_value()?;
        let limit = u64::try_from(limit?).ok()?;
        Some(page.saturating_sub(1).saturating_mul(limit))
    });
    if let Some(offset) = offset.filter(|o| *o > 0) {
        lines.push(format!("OFFSET {}", offset));
    }

    lines.join("\n")
}

fn sql_filter(filter: &Filter, parent: Option<Logic>) -> String {
    match filter {
        Filter::Condition(c) => {
            let parts = sql_condition(c);
            if parts.len() > 1 && parent == Some(Logic::Or) {
                format!("({})", parts.join(" AND "))
            } else {
                parts.join(" AND ")
            }
        }
        Filter::Group { logic, filters } => {
            let members: Vec<String> = filters
                .iter()
                .filter(|f| !f.is_empty())
                .map(|f| sql_filter(f, Some(*logic)))
                .collect();
            let joined = members.join(&format!(" {} ", logic.keyword()));
            let nested = parent.is_some_and(|p| p != *logic);
            if *logic == Logic::Or || nested {
                format!("({})", joined)
            } else {
                joined
            }
        }
    }
}

fn sql_condition(c: &Condition) -> Vec<String> {
    let f = c.field();
    c.ops()
        .iter()
        .map(|(op, value)| sql_predicate(f, *op, value))
        .collect()
}

fn sql_predicate(f: &str, op: Operator, value: &Value) -> String {
    use Operator::*;
    match op {
        Eq => format!("{} = {}", f, sql_literal(value)),
        Neq => format!("{} <> {}", f, sql_literal(value)),
        Lt => format!("{} < {}", f, sql_literal(value)),
        Lte => format!("{} <= {}", f, sql_literal(value)),
        Gt => format!("{} > {}", f, sql_literal(value)),
        Gte => format!("{} >= {}", f, sql_literal(value)),
        Contains => like(f, "LIKE", "%", value, "%"),
        Icontains => like(f, "ILIKE", "%", value, "%"),
        Ncontains => like(f, "NOT LIKE", "%", value, "%"),
        StartsWith => like(f, "LIKE", "", value, "%"),
        IstartsWith => like(f, "ILIKE", "", value, "%"),
        NstartsWith => like(f, "NOT LIKE", "", value, "%"),
        NistartsWith => like(f, "NOT ILIKE", "", value, "%"),
        EndsWith => like(f, "LIKE", "%", value, ""),
        IendsWith => like(f, "ILIKE", "%", value, ""),
        NendsWith => like(f, "NOT LIKE", "%", value, ""),
        NiendsWith => like(f, "NOT ILIKE", "%", value, ""),
        In => format!("{} IN ({})", f, sql_list(value)),
        Nin => format!("{} NOT IN ({})", f, sql_list(value)),
        Between | Nbetween => {
            let keyword = if op == Between { "BETWEEN" } else { "NOT BETWEEN" };
            match value.as_array().map(Vec::as_slice) {
                Some([low, high]) => format!(
                    "{} {} {} AND {}",
                    f,
                    keyword,
                    sql_literal(low),
                    sql_literal(high)
                ),
                _ => format!("{} {} {}", f, keyword, sql_literal(value)),
            }
        }
        Null | Nnull => {
            let is_null = (op == Null) == flag(value);
            if is_null {
                format!("{} IS NULL", f)
            } else {
                format!("{} IS NOT NULL", f)
            }
        }
        Empty | Nempty => {
            let is_empty = (op == Empty) == flag(value);
            if is_empty {
                format!("({} IS NULL OR {} = '')", f, f)
            } else {
                format!("({} IS NOT NULL AND {} <> '')", f, f)
            }
        }
        Intersects => format!("ST_Intersects({}, {})", f, sql_literal(value)),
        Nintersects => format!("NOT ST_Intersects({}, {})", f, sql_literal(value)),
        IntersectsBbox => format!(
            "ST_Intersects(ST_Envelope({}), ST_Envelope({}))",
            f,
            sql_literal(value)
        ),
        NintersectsBbox => format!(
            "NOT ST_Intersects(ST_Envelope({}), ST_Envelope({}))",
            f,
            sql_literal(value)
        ),
        Regex => format!("{} REGEXP {}", f, sql_literal(value)),
    }
}

fn like(f: &str, keyword: &str, prefix: &str, value: &Value, suffix: &str) -> String {
    format!(
        "{} {} '{}{}{}'",
        f,
        keyword,
        prefix,
        escape(&plain_text(value)),
        suffix
    )
}

fn flag(value: &Value) -> bool {
    value.as_bool().unwrap_or(true)
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape(s)),
        other => format!("'{}'", escape(&other.to_string())),
    }
}

fn sql_list(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(sql_literal).collect::<Vec<_>>().join(", "),
        single => sql_literal(single),
    }
}

// =============================================================================
// English
// =============================================================================

fn english_sentence(query: &Query) -> String {
    let fields = query.selected_fields();
    let mut sentence = if fields.is_empty() || fields.iter().any(|f| f == "*") {
        format!("Select all fields from {}", query.collection())
    } else {
        format!("Select {} from {}", fields.join(", "), query.collection())
    };

    if let Some(filter) = query.filter_tree() {
        sentence.push_str(" where ");
        sentence.push_str(&english_filter(filter, None));
    }

    if let Some(term) = query.search_term() {
        sentence.push_str(&format!(", matching \"{}\"", term));
    }

    if !query.sort_keys().is_empty() {
        let keys: Vec<String> = query
            .sort_keys()
            .iter()
            .map(|k| format!("{} {}", k.field, k.direction.as_str()))
            .collect();
        sentence.push_str(", sorted by ");
        sentence.push_str(&keys.join(", then "));
    }

    match query.limit_value() {
        Some(-1) => sentence.push_str(", returning all items"),
        Some(1) => sentence.push_str(", limited to 1 item"),
        Some(n) if n >= 0 => sentence.push_str(&format!(", limited to {} items", n)),
        _ => {}
    }

    if let Some(offset) = query.offset_value() {
        sentence.push_str(&format!(", skipping the first {}", offset));
    }

    if let Some(page) = query.page_value() {
        sentence.push_str(&format!(", page {}", page));
    }

    sentence.push('.');
    sentence
}

fn english_filter(filter: &Filter, parent: Option<Logic>) -> String {
    match filter {
        Filter::Condition(c) => {
            let text = english_condition(c);
            if c.ops().len() > 1 && parent == Some(Logic::Or) {
                format!("({})", text)
            } else {
                text
            }
        }
        Filter::Group { logic, filters } => {
            let word = match logic {
                Logic::And => " and ",
                Logic::Or => " or ",
            };
            let joined = filters
                .iter()
                .filter(|f| !f.is_empty())
                .map(|f| english_filter(f, Some(*logic)))
                .collect::<Vec<_>>()
                .join(word);
            if parent.is_some() {
                format!("({})", joined)
            } else {
                joined
            }
        }
    }
}

fn english_condition(c: &Condition) -> String {
    c.ops()
        .iter()
        .map(|(op, value)| format!("{} {}", c.field(), english_predicate(*op, value)))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn english_predicate(op: Operator, value: &Value) -> String {
    use Operator::*;
    let v = english_value(value);
    match op {
        Eq => format!("is {}", v),
        Neq => format!("is not {}", v),
        Lt => format!("is less than {}", v),
        Lte => format!("is at most {}", v),
        Gt => format!("is greater than {}", v),
        Gte => format!("is at least {}", v),
        In => format!("is one of {}", english_list(value)),
        Nin => format!("is none of {}", english_list(value)),
        Null | Nnull if (op == Null) == flag(value) => "is null".to_string(),
        Null | Nnull => "is not null".to_string(),
        Empty | Nempty if (op == Empty) == flag(value) => "is empty".to_string(),
        Empty | Nempty => "is not empty".to_string(),
        Contains => format!("contains {}", v),
        Icontains => format!("contains {} (ignoring case)", v),
        Ncontains => format!("does not contain {}", v),
        StartsWith => format!("starts with {}", v),
        IstartsWith => format!("starts with {} (ignoring case)", v),
        NstartsWith => format!("does not start with {}", v),
        NistartsWith => format!("does not start with {} (ignoring case)", v),
        EndsWith => format!("ends with {}", v),
        IendsWith => format!("ends with {} (ignoring case)", v),
        NendsWith => format!("does not end with {}", v),
        NiendsWith => format!("does not end with {} (ignoring case)", v),
        Between | Nbetween => {
            let verb = if op == Between { "is between" } else { "is not between" };
            match value.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    format!("{} {} and {}", verb, english_value(low), english_value(high))
                }
                _ => format!("{} {}", verb, v),
            }
        }
        Intersects => format!("intersects {}", v),
        Nintersects => format!("does not intersect {}", v),
        IntersectsBbox => format!("intersects the bounding box of {}", v),
        NintersectsBbox => format!("does not intersect the bounding box of {}", v),
        Regex => format!("matches the pattern {}", v),
    }
}

fn english_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

fn english_list(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(english_value).collect::<Vec<_>>().join(", "),
        single => english_value(single),
    }
}
