//! # Filter Tree
//!
//! A filter is either a condition on one field or a logical group of
//! filters. It serializes to the Directus filter object:
//!
//! ```text
//! {"title": {"_contains": "Robots"}}
//! {"_and": [{"rating": {"_gte": 4}}, {"_or": [...]}]}
//! ```
//!
//! Joining rules:
//! - joining into a group of the same logic appends, flattening
//! - otherwise a new group wraps both sides
//! - in an `_and` group, a condition on a field already present merges
//!   into it unless both set the same operator to different values
//! - `_or` groups never merge
//! - empty conditions are dropped and single-member groups collapse

use serde_json::{Map, Value};

use super::errors::{QueryError, QueryResult};
use super::operator::{Logic, Operator};

/// Start a condition on a field
pub fn field(name: impl Into<String>) -> Condition {
    Condition::new(name)
}

/// Ordered operators applied to one field
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    ops: Vec<(Operator, Value)>,
}

macro_rules! value_ops {
    ($($(#[$doc:meta])* $method:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(self, value: impl Into<Value>) -> Self {
                self.op(Operator::$op, value)
            }
        )*
    };
}

macro_rules! flag_ops {
    ($($method:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $method(self) -> Self {
                self.op(Operator::$op, true)
            }
        )*
    };
}

impl Condition {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ops: Vec::new(),
        }
    }

    /// Apply an operator; re-applying one replaces its value
    pub fn op(mut self, op: Operator, value: impl Into<Value>) -> Self {
        self.set(op, value.into());
        self
    }

    fn set(&mut self, op: Operator, value: Value) {
        match self.ops.iter_mut().find(|(existing, _)| *existing == op) {
            Some(slot) => slot.1 = value,
            None => self.ops.push((op, value)),
        }
    }

    value_ops! {
        eq => Eq,
        neq => Neq,
        lt => Lt,
        lte => Lte,
        gt => Gt,
        gte => Gte,
        contains => Contains,
        /// Case-insensitive `contains`
        icontains => Icontains,
        ncontains => Ncontains,
        starts_with => StartsWith,
        istarts_with => IstartsWith,
        nstarts_with => NstartsWith,
        nistarts_with => NistartsWith,
        ends_with => EndsWith,
        iends_with => IendsWith,
        nends_with => NendsWith,
        niends_with => NiendsWith,
        /// GeoJSON geometry operand
        intersects => Intersects,
        nintersects => Nintersects,
        intersects_bbox => IntersectsBbox,
        nintersects_bbox => NintersectsBbox,
        regex => Regex,
    }

    flag_ops! {
        null => Null,
        nnull => Nnull,
        empty => Empty,
        nempty => Nempty,
    }

    /// `_in` with a list of values
    pub fn in_<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.op(Operator::In, collect_array(values))
    }

    pub fn nin<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.op(Operator::Nin, collect_array(values))
    }

    /// Inclusive range
    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.op(Operator::Between, Value::Array(vec![low.into(), high.into()]))
    }

    pub fn nbetween(self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.op(Operator::Nbetween, Value::Array(vec![low.into(), high.into()]))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn ops(&self) -> &[(Operator, Value)] {
        &self.ops
    }

    /// Value set for an operator
    pub fn get(&self, op: Operator) -> Option<&Value> {
        self.ops.iter().find(|(o, _)| *o == op).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// AND this condition with another filter
    pub fn and(self, other: impl Into<Filter>) -> Filter {
        Filter::from(self).and(other)
    }

    /// OR this condition with another filter
    pub fn or(self, other: impl Into<Filter>) -> Filter {
        Filter::from(self).or(other)
    }

    /// Merge another condition's operators into this one; later values win
    pub fn merge(&mut self, other: Condition) {
        for (op, value) in other.ops {
            self.set(op, value);
        }
    }

    pub fn to_json(&self) -> Value {
        if self.ops.is_empty() {
            return Value::Object(Map::new());
        }
        let ops: Map<String, Value> = self
            .ops
            .iter()
            .map(|(op, v)| (op.symbol().to_string(), v.clone()))
            .collect();
        let mut obj = Map::new();
        obj.insert(self.field.clone(), Value::Object(ops));
        Value::Object(obj)
    }

    /// Check operand shapes
    pub fn validate_operands(&self) -> QueryResult<()> {
        for (op, value) in &self.ops {
            let fail = |reason: &str| QueryError::invalid_operand(&self.field, op.symbol(), reason);
            match op {
                Operator::In | Operator::Nin if !value.is_array() => {
                    return Err(fail("expected an array of values"));
                }
                Operator::Between | Operator::Nbetween
                    if value.as_array().map_or(true, |a| a.len() != 2) =>
                {
                    return Err(fail("expected an array of two values"));
                }
                op if op.is_flag() && !value.is_boolean() => {
                    return Err(fail("expected a boolean"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn collect_array<I, V>(values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Value::Array(values.into_iter().map(Into::into).collect())
}

/// A filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Condition(Condition),
    Group { logic: Logic, filters: Vec<Filter> },
}

impl From<Condition> for Filter {
    fn from(condition: Condition) -> Self {
        Filter::Condition(condition)
    }
}

impl Filter {
    /// An AND group of filters
    pub fn all<I, F>(filters: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        Self::collect(Logic::And, filters)
    }

    /// An OR group of filters
    pub fn any<I, F>(filters: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        Self::collect(Logic::Or, filters)
    }

    fn collect<I, F>(logic: Logic, filters: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Filter>,
    {
        let mut members = Vec::new();
        for f in filters {
            push_member(logic, &mut members, f.into());
        }
        Self::group(logic, members)
    }

    pub fn and(self, other: impl Into<Filter>) -> Self {
        self.join(Logic::And, other.into())
    }

    pub fn or(self, other: impl Into<Filter>) -> Self {
        self.join(Logic::Or, other.into())
    }

    fn join(self, logic: Logic, other: Filter) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        let mut members = Vec::new();
        push_member(logic, &mut members, self);
        push_member(logic, &mut members, other);
        Self::group(logic, members)
    }

    fn group(logic: Logic, mut members: Vec<Filter>) -> Self {
        if members.len() == 1 {
            if let Some(only) = members.pop() {
                return only;
            }
        }
        Filter::Group {
            logic,
            filters: members,
        }
    }

    /// True when the filter constrains nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Condition(c) => c.is_empty(),
            Filter::Group { filters, .. } => filters.iter().all(Filter::is_empty),
        }
    }

    /// The Directus filter object; `{}` when empty
    pub fn to_json(&self) -> Value {
        match self {
            Filter::Condition(c) => c.to_json(),
            Filter::Group { logic, filters } => {
                let members: Vec<Value> = filters
                    .iter()
                    .filter(|f| !f.is_empty())
                    .map(Filter::to_json)
                    .collect();
                if members.is_empty() {
                    return Value::Object(Map::new());
                }
                let mut obj = Map::new();
                obj.insert(logic.symbol().to_string(), Value::Array(members));
                Value::Object(obj)
            }
        }
    }

    /// Parse a Directus filter object.
    ///
    /// An object with several field keys becomes an AND group. `{}` parses
    /// to an empty filter.
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| QueryError::InvalidFilter("expected a JSON object".into()))?;

        let mut members = Vec::new();
        for (key, inner) in obj {
            let member = match Logic::from_symbol(key) {
                Some(logic) => {
                    let items = inner.as_array().ok_or_else(|| {
                        QueryError::InvalidFilter(format!("{} expects an array", key))
                    })?;
                    let parsed = items
                        .iter()
                        .map(Filter::from_json)
                        .collect::<QueryResult<Vec<_>>>()?;
                    Filter::collect(logic, parsed)
                }
                None => Filter::Condition(parse_condition(key, inner)?),
            };
            members.push(member);
        }

        Ok(Filter::collect(Logic::And, members))
    }

    /// Every condition in the tree, depth first
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Filter::Condition(c) => out.push(c),
            Filter::Group { filters, .. } => {
                for f in filters {
                    f.collect_conditions(out);
                }
            }
        }
    }

    /// Check operand shapes of every condition
    pub fn validate_operands(&self) -> QueryResult<()> {
        self.conditions()
            .into_iter()
            .try_for_each(Condition::validate_operands)
    }
}

fn push_member(logic: Logic, members: &mut Vec<Filter>, filter: Filter) {
    match filter {
        Filter::Group { logic: inner, filters } if inner == logic => {
            for f in filters {
                push_member(logic, members, f);
            }
        }
        Filter::Condition(c) if c.is_empty() => {}
        Filter::Condition(c) if logic == Logic::And => {
            let existing = members.iter_mut().find_map(|m| match m {
                Filter::Condition(e) if e.field == c.field => Some(e),
                _ => None,
            });
            match existing {
                Some(e) => e.merge(c),
                None => members.push(Filter::Condition(c)),
            }
        }
        f if f.is_empty() => {}
        f => members.push(f),
    }
}

fn parse_condition(field: &str, ops: &Value) -> QueryResult<Condition> {
    let obj = ops.as_object().ok_or_else(|| {
        QueryError::InvalidFilter(format!("'{}' expects an object of operators", field))
    })?;
    let mut condition = Condition::new(field);
    for (symbol, value) in obj {
        let op: Operator = symbol.parse()?;
        condition.set(op, value.clone());
    }
    Ok(condition)
}
