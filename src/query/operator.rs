//! # Filter Operators
//!
//! Every operator of the Directus filter grammar, plus the two logical
//! connectives used to group conditions.

use std::fmt;
use std::str::FromStr;

use super::errors::QueryError;

/// Operator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Equality,
    Comparison,
    Range,
    String,
    Array,
    Special,
    Geometric,
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
    Null,
    Nnull,
    Contains,
    Icontains,
    Ncontains,
    StartsWith,
    IstartsWith,
    NstartsWith,
    NistartsWith,
    EndsWith,
    IendsWith,
    NendsWith,
    NiendsWith,
    Between,
    Nbetween,
    Empty,
    Nempty,
    Intersects,
    Nintersects,
    IntersectsBbox,
    NintersectsBbox,
    Regex,
}

impl Operator {
    /// All operators, in documentation order
    pub const ALL: [Operator; 30] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
        Operator::Nin,
        Operator::Null,
        Operator::Nnull,
        Operator::Contains,
        Operator::Icontains,
        Operator::Ncontains,
        Operator::StartsWith,
        Operator::IstartsWith,
        Operator::NstartsWith,
        Operator::NistartsWith,
        Operator::EndsWith,
        Operator::IendsWith,
        Operator::NendsWith,
        Operator::NiendsWith,
        Operator::Between,
        Operator::Nbetween,
        Operator::Empty,
        Operator::Nempty,
        Operator::Intersects,
        Operator::Nintersects,
        Operator::IntersectsBbox,
        Operator::NintersectsBbox,
        Operator::Regex,
    ];

    /// Short name, e.g. `starts_with`
    pub fn name(&self) -> &'static str {
        &self.symbol()[1..]
    }

    /// Wire symbol, e.g. `_starts_with`
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "_eq",
            Operator::Neq => "_neq",
            Operator::Lt => "_lt",
            Operator::Lte => "_lte",
            Operator::Gt => "_gt",
            Operator::Gte => "_gte",
            Operator::In => "_in",
            Operator::Nin => "_nin",
            Operator::Null => "_null",
            Operator::Nnull => "_nnull",
            Operator::Contains => "_contains",
            Operator::Icontains => "_icontains",
            Operator::Ncontains => "_ncontains",
            Operator::StartsWith => "_starts_with",
            Operator::IstartsWith => "_istarts_with",
            Operator::NstartsWith => "_nstarts_with",
            Operator::NistartsWith => "_nistarts_with",
            Operator::EndsWith => "_ends_with",
            Operator::IendsWith => "_iends_with",
            Operator::NendsWith => "_nends_with",
            Operator::NiendsWith => "_niends_with",
            Operator::Between => "_between",
            Operator::Nbetween => "_nbetween",
            Operator::Empty => "_empty",
            Operator::Nempty => "_nempty",
            Operator::Intersects => "_intersects",
            Operator::Nintersects => "_nintersects",
            Operator::IntersectsBbox => "_intersects_bbox",
            Operator::NintersectsBbox => "_nintersects_bbox",
            Operator::Regex => "_regex",
        }
    }

    pub fn kind(&self) -> OperatorKind {
        use Operator::*;
        match self {
            Eq | Neq => OperatorKind::Equality,
            Lt | Lte | Gt | Gte => OperatorKind::Comparison,
            In | Nin => OperatorKind::Array,
            Between | Nbetween => OperatorKind::Range,
            Contains | Icontains | Ncontains | StartsWith | IstartsWith | NstartsWith
            | NistartsWith | EndsWith | IendsWith | NendsWith | NiendsWith => OperatorKind::String,
            Null | Nnull | Empty | Nempty | Regex => OperatorKind::Special,
            Intersects | Nintersects | IntersectsBbox | NintersectsBbox => OperatorKind::Geometric,
        }
    }

    /// Operators whose operand is an implicit boolean flag
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Operator::Null | Operator::Nnull | Operator::Empty | Operator::Nempty
        )
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    /// Parse from the short name (`eq`) or the wire symbol (`_eq`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        let name = symbol.strip_prefix('_').unwrap_or(symbol);
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| QueryError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Logical connective of a filter group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logic {
    And,
    Or,
}

impl Logic {
    pub fn symbol(&self) -> &'static str {
        match self {
            Logic::And => "_and",
            Logic::Or => "_or",
        }
    }

    /// SQL keyword
    pub fn keyword(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "_and" => Some(Logic::And),
            "_or" => Some(Logic::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_symbols_are_unique() {
        let symbols: HashSet<_> = Operator::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols.len(), Operator::ALL.len());
    }

    #[test]
    fn test_name_strips_underscore() {
        assert_eq!(Operator::StartsWith.name(), "starts_with");
        assert_eq!(Operator::NintersectsBbox.name(), "nintersects_bbox");
    }

    #[test]
    fn test_parse_name_or_symbol() {
        assert_eq!("eq".parse::<Operator>().unwrap(), Operator::Eq);
        assert_eq!("_icontains".parse::<Operator>().unwrap(), Operator::Icontains);
        assert_eq!(
            "_like".parse::<Operator>().unwrap_err(),
            QueryError::UnknownOperator("_like".into())
        );
    }

    #[test]
    fn test_every_operator_parses_back() {
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>().unwrap(), op);
            assert_eq!(op.name().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Operator::Gte.kind(), OperatorKind::Comparison);
        assert_eq!(Operator::Nin.kind(), OperatorKind::Array);
        assert_eq!(Operator::Nbetween.kind(), OperatorKind::Range);
        assert_eq!(Operator::Regex.kind(), OperatorKind::Special);
        assert_eq!(Operator::IntersectsBbox.kind(), OperatorKind::Geometric);
        assert!(Operator::Nempty.is_flag());
        assert!(!Operator::Eq.is_flag());
    }

    #[test]
    fn test_logic() {
        assert_eq!(Logic::from_symbol("_or"), Some(Logic::Or));
        assert_eq!(Logic::from_symbol("_not"), None);
        assert_eq!(Logic::And.keyword(), "AND");
    }
}
