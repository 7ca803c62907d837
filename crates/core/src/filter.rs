//! Filter expressions, sort specs, and find options
//!
//! A filter is an ordered sequence of [`Clause`]s. Each clause names a
//! field, a comparison operator, a comparison value, and the boolean
//! connector joining it to the NEXT clause. Evaluation is strictly
//! left-to-right with no precedence grouping: the connector recorded on
//! clause *i* determines how clause *i+1* combines with the accumulator
//! built from clauses `0..=i`.
//!
//! The operator set is a closed enum so evaluation is exhaustive at compile
//! time. Unrecognized operator names arriving over a serde boundary land on
//! [`CompareOp::Unknown`], which the evaluator treats as strict equality.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Strict value equality
    Eq,
    /// Non-equality; never satisfied when either side is absent
    Ne,
    /// Less than (numbers with numbers, strings with strings)
    Lt,
    /// Less than or equal
    Lte,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Field value is a member of the comparison array
    In,
    /// Field value is not a member of the comparison array
    NotIn,
    /// Field string contains the comparison string
    Contains,
    /// Field string starts with the comparison string
    StartsWith,
    /// Field string ends with the comparison string
    EndsWith,
    /// Fallback for unrecognized wire names; evaluates as strict equality
    Unknown,
}

impl CompareOp {
    /// Resolve a wire name to an operator
    ///
    /// Unrecognized names land on [`CompareOp::Unknown`] rather than
    /// failing - the evaluator degrades them to strict equality.
    pub fn from_name(name: &str) -> Self {
        match name {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "contains" => Self::Contains,
            "starts_with" => Self::StartsWith,
            "ends_with" => Self::EndsWith,
            _ => Self::Unknown,
        }
    }

    /// Stable string name used in logs and serialization
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CompareOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CompareOp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Boolean connector joining a clause to the next clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connector {
    /// Conjunction (the default)
    #[default]
    And,
    /// Disjunction
    Or,
}

/// One comparison in a filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Field the comparison reads
    pub field: String,
    /// Comparison operator
    pub op: CompareOp,
    /// Comparison value
    pub value: Value,
    /// Connector to the NEXT clause (ignored on the last clause)
    #[serde(default)]
    pub connector: Connector,
}

impl Clause {
    /// Build a clause with the default AND connector
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            connector: Connector::And,
        }
    }

    /// Set the connector joining this clause to the next one
    pub fn connector(mut self, connector: Connector) -> Self {
        self.connector = connector;
        self
    }

    /// OR-connect this clause to the next one
    pub fn or(self) -> Self {
        self.connector(Connector::Or)
    }

    /// `field eq value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Eq, value)
    }

    /// `field ne value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Ne, value)
    }

    /// `field lt value`
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Lt, value)
    }

    /// `field lte value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Lte, value)
    }

    /// `field gt value`
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Gt, value)
    }

    /// `field gte value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Gte, value)
    }

    /// `field in values`
    pub fn in_values(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, CompareOp::In, Value::Array(values))
    }

    /// `field not_in values`
    pub fn not_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, CompareOp::NotIn, Value::Array(values))
    }

    /// `field contains value`
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Contains, value)
    }

    /// `field starts_with value`
    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::StartsWith, value)
    }

    /// `field ends_with value`
    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::EndsWith, value)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending (nulls first)
    Asc,
    /// Descending (nulls last)
    Desc,
}

/// Sort specification: a field and a direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    /// Field whose value orders the results
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortBy {
    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Options for `find_many`: sort, offset, limit
///
/// Offset and limit are independent and composable. An offset of zero
/// behaves exactly like no offset at all - a quirk of the contract this
/// adapter reproduces rather than fixes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindOptions {
    /// Optional sort specification
    pub sort_by: Option<SortBy>,
    /// Optional number of documents to skip
    pub offset: Option<usize>,
    /// Optional maximum number of documents to return
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Set the sort specification
    pub fn sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Set the offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
