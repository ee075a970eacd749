// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SOQL Abstract Syntax Tree (AST) types
//!
//! Every type renders back to SOQL text through [`std::fmt::Display`],
//! producing the canonical spelling: uppercase keywords, single spaces,
//! literals and identifiers exactly as written in the source.

mod query;
mod value;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::query::{
    ComparisonOperator, Condition, ConditionExpr, DataCategorySelector, ForClause, GroupByClause,
    GroupByExpr, HavingClause, LogicalOperator, LogicalPrefix, NullsPosition, OrderByClause,
    OrderByExpr, OrderDirection, Query, Subquery, UpdateClause, UsingScope, WhereClause,
    WithDataCategoryClause, WithDataCategoryCondition,
};
pub use self::value::{ConditionValue, ListLiteralType, LiteralType, LiteralValue};

struct DisplaySeparated<'a, T>
where
    T: fmt::Display,
{
    slice: &'a [T],
    sep: &'static str,
}

impl<T> fmt::Display for DisplaySeparated<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut delim = "";
        for t in self.slice {
            write!(f, "{}", delim)?;
            delim = self.sep;
            write!(f, "{}", t)?;
        }
        Ok(())
    }
}

pub(crate) fn display_separated<'a, T>(slice: &'a [T], sep: &'static str) -> impl fmt::Display + 'a
where
    T: fmt::Display,
{
    DisplaySeparated { slice, sep }
}

pub(crate) fn display_comma_separated<T>(slice: &[T]) -> impl fmt::Display + '_
where
    T: fmt::Display,
{
    DisplaySeparated { slice, sep: ", " }
}

/// One item of a `SELECT` projection list.
///
/// The variant name doubles as the `type` tag when the AST is serialized,
/// mirroring the runtime tagging of the original data model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum FieldType {
    /// A direct column on the queried object
    Field(Field),
    /// A dotted relationship path, e.g. `Account.Owner.Name`
    FieldRelationship(FieldRelationship),
    /// A function invocation, e.g. `COUNT(Id)` or `FORMAT(Amount)`
    #[cfg_attr(feature = "serde", serde(rename = "FieldFunctionExpression"))]
    FieldFunction(FieldFunctionExpression),
    /// A nested relationship query
    FieldSubquery(FieldSubquery),
    /// A polymorphic `TYPEOF ... END` projection
    FieldTypeof(FieldTypeof),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::Field(field) => write!(f, "{}", field),
            FieldType::FieldRelationship(rel) => write!(f, "{}", rel),
            FieldType::FieldFunction(func) => {
                write!(f, "{}", func)?;
                if let Some(ref alias) = func.alias {
                    write!(f, " {}", alias)?;
                }
                Ok(())
            }
            FieldType::FieldSubquery(sq) => write!(f, "{}", sq),
            FieldType::FieldTypeof(typeof_) => write!(f, "{}", typeof_),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Field {
    pub field: String,
    /// The sObject alias this field was qualified with, e.g. `a` in
    /// `SELECT a.Id FROM Account a`
    pub object_prefix: Option<String>,
    pub alias: Option<String>,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref prefix) = self.object_prefix {
            write!(f, "{}.", prefix)?;
        }
        write!(f, "{}", self.field)?;
        if let Some(ref alias) = self.alias {
            write!(f, " {}", alias)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FieldRelationship {
    /// The final segment of the dotted path
    pub field: String,
    /// All segments before the final one
    pub relationships: Vec<String>,
    pub object_prefix: Option<String>,
    pub alias: Option<String>,
    /// The dotted path exactly as written in the query
    pub raw_value: String,
}

impl fmt::Display for FieldRelationship {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw_value)?;
        if let Some(ref alias) = self.alias {
            write!(f, " {}", alias)?;
        }
        Ok(())
    }
}

/// A function invocation such as `COUNT(Id)`, `CALENDAR_YEAR(CreatedDate)`
/// or `DISTANCE(Location__c, GEOLOCATION(37.77, -122.42), 'mi')`.
///
/// `Display` renders `NAME(param, ...)` without the alias; projection
/// contexts append the alias themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FieldFunctionExpression {
    /// Uppercased function name
    pub function_name: String,
    pub parameters: Vec<FunctionParameter>,
    pub is_aggregate_fn: bool,
    pub alias: Option<String>,
    /// The invocation rendered as `NAME(param, ...)`
    pub raw_value: String,
}

impl fmt::Display for FieldFunctionExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.function_name,
            display_comma_separated(&self.parameters)
        )
    }
}

/// A positional function argument: a field name or literal verbatim, or a
/// nested function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FunctionParameter {
    Value(String),
    Function(Box<FieldFunctionExpression>),
}

impl fmt::Display for FunctionParameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FunctionParameter::Value(v) => f.write_str(v),
            FunctionParameter::Function(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSubquery {
    pub subquery: Subquery,
}

impl fmt::Display for FieldSubquery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.subquery)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldTypeof {
    /// The polymorphic reference field being switched on
    pub field: String,
    /// The `WHEN` branches, followed by at most one final `ELSE`
    pub conditions: Vec<TypeofCondition>,
}

impl fmt::Display for FieldTypeof {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "TYPEOF {} {} END",
            self.field,
            display_separated(&self.conditions, " ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum TypeofCondition {
    #[cfg_attr(feature = "serde", serde(rename = "WHEN", rename_all = "camelCase"))]
    When {
        object_type: String,
        field_list: Vec<String>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "ELSE", rename_all = "camelCase"))]
    Else { field_list: Vec<String> },
}

impl fmt::Display for TypeofCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeofCondition::When {
                object_type,
                field_list,
            } => write!(
                f,
                "WHEN {} THEN {}",
                object_type,
                display_comma_separated(field_list)
            ),
            TypeofCondition::Else { field_list } => {
                write!(f, "ELSE {}", display_comma_separated(field_list))
            }
        }
    }
}
