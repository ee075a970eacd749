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

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::value::ConditionValue;
use crate::ast::{display_comma_separated, display_separated, FieldFunctionExpression, FieldType};

/// A complete top-level SOQL query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Query {
    /// The projection list; never empty
    pub fields: Vec<FieldType>,
    /// The queried object
    #[cfg_attr(feature = "serde", serde(rename = "sObject"))]
    pub sobject: String,
    #[cfg_attr(feature = "serde", serde(rename = "sObjectAlias"))]
    pub sobject_alias: Option<String>,
    /// Namespace/path segments preceding the sObject; empty when absent
    #[cfg_attr(feature = "serde", serde(rename = "sObjectPrefix"))]
    pub sobject_prefix: Vec<String>,
    pub using_scope: Option<UsingScope>,
    #[cfg_attr(feature = "serde", serde(rename = "where"))]
    pub where_clause: Option<WhereClause>,
    pub with_security_enforced: bool,
    pub with_data_category: Option<WithDataCategoryClause>,
    pub group_by: Option<GroupByClause>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[cfg_attr(feature = "serde", serde(rename = "for"))]
    pub for_clause: Option<ForClause>,
    #[cfg_attr(feature = "serde", serde(rename = "update"))]
    pub update_clause: Option<UpdateClause>,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SELECT {} FROM ", display_comma_separated(&self.fields))?;
        for segment in &self.sobject_prefix {
            write!(f, "{}.", segment)?;
        }
        write!(f, "{}", self.sobject)?;
        if let Some(ref alias) = self.sobject_alias {
            write!(f, " {}", alias)?;
        }
        if let Some(ref scope) = self.using_scope {
            write!(f, " USING SCOPE {}", scope)?;
        }
        if let Some(ref where_clause) = self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if self.with_security_enforced {
            write!(f, " WITH SECURITY_ENFORCED")?;
        }
        if let Some(ref with_data_category) = self.with_data_category {
            write!(f, " WITH DATA CATEGORY {}", with_data_category)?;
        }
        if let Some(ref group_by) = self.group_by {
            write!(f, " GROUP BY {}", group_by)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", display_comma_separated(&self.order_by))?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        if let Some(ref for_clause) = self.for_clause {
            write!(f, " FOR {}", for_clause)?;
        }
        if let Some(ref update_clause) = self.update_clause {
            write!(f, " UPDATE {}", update_clause)?;
        }
        Ok(())
    }
}

/// A nested relationship query, e.g. `(SELECT Id FROM Contacts)` inside a
/// projection list or an `IN (SELECT ...)` condition.
///
/// Structurally like [`Query`] except the queried object is a relationship
/// traversed from the outer object, and `USING SCOPE` / `FOR` / `UPDATE`
/// never occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Subquery {
    pub fields: Vec<FieldType>,
    pub relationship_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "sObjectAlias"))]
    pub sobject_alias: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "sObjectPrefix"))]
    pub sobject_prefix: Vec<String>,
    #[cfg_attr(feature = "serde", serde(rename = "where"))]
    pub where_clause: Option<WhereClause>,
    pub with_security_enforced: bool,
    pub with_data_category: Option<WithDataCategoryClause>,
    pub group_by: Option<GroupByClause>,
    pub order_by: Vec<OrderByClause>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl fmt::Display for Subquery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SELECT {} FROM ", display_comma_separated(&self.fields))?;
        for segment in &self.sobject_prefix {
            write!(f, "{}.", segment)?;
        }
        write!(f, "{}", self.relationship_name)?;
        if let Some(ref alias) = self.sobject_alias {
            write!(f, " {}", alias)?;
        }
        if let Some(ref where_clause) = self.where_clause {
            write!(f, " WHERE {}", where_clause)?;
        }
        if self.with_security_enforced {
            write!(f, " WITH SECURITY_ENFORCED")?;
        }
        if let Some(ref with_data_category) = self.with_data_category {
            write!(f, " WITH DATA CATEGORY {}", with_data_category)?;
        }
        if let Some(ref group_by) = self.group_by {
            write!(f, " GROUP BY {}", group_by)?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", display_comma_separated(&self.order_by))?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }
        Ok(())
    }
}

/// `USING SCOPE` enumerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UsingScope {
    Delegated,
    Everything,
    Mine,
    MineAndMyGroups,
    MyTerritory,
    MyTeamTerritory,
    Team,
}

impl UsingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsingScope::Delegated => "delegated",
            UsingScope::Everything => "everything",
            UsingScope::Mine => "mine",
            UsingScope::MineAndMyGroups => "mine_and_my_groups",
            UsingScope::MyTerritory => "my_territory",
            UsingScope::MyTeamTerritory => "my_team_territory",
            UsingScope::Team => "team",
        }
    }
}

impl fmt::Display for UsingScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The flattened condition chain of a `WHERE` clause: `conditions[0]
/// connectives[0] conditions[1] connectives[1] ...`. User grouping is
/// preserved through the per-condition parenthesis counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    /// Always one element shorter than `conditions`
    pub connectives: Vec<LogicalOperator>,
}

/// A `HAVING` clause has the same shape as a `WHERE` clause.
pub type HavingClause = WhereClause;

impl WhereClause {
    /// Sum of opening parentheses over all conditions. Equals
    /// [`WhereClause::total_close_parens`] for any clause built by the
    /// parser.
    pub fn total_open_parens(&self) -> u32 {
        self.conditions.iter().map(|c| c.open_paren).sum()
    }

    /// Sum of closing parentheses over all conditions.
    pub fn total_close_parens(&self) -> u32 {
        self.conditions.iter().map(|c| c.close_paren).sum()
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.connectives[i - 1])?;
            }
            write!(f, "{}", condition)?;
        }
        Ok(())
    }
}

/// A single comparison in a `WHERE`/`HAVING` chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Condition {
    /// Number of `(` opening at this condition
    pub open_paren: u32,
    pub logical_prefix: Option<LogicalPrefix>,
    pub lhs: ConditionExpr,
    pub operator: ComparisonOperator,
    pub value: ConditionValue,
    /// Number of `)` closing at this condition
    pub close_paren: u32,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.logical_prefix.is_some() {
            f.write_str("NOT ")?;
        }
        for _ in 0..self.open_paren {
            f.write_str("(")?;
        }
        write!(f, "{} {} {}", self.lhs, self.operator, self.value)?;
        for _ in 0..self.close_paren {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Left-hand side of a condition: a field or a function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConditionExpr {
    Field(String),
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    Function(FieldFunctionExpression),
}

impl fmt::Display for ConditionExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConditionExpr::Field(field) => f.write_str(field),
            ConditionExpr::Function(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComparisonOperator {
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
    #[cfg_attr(feature = "serde", serde(rename = "!="))]
    NotEq,
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Lt,
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    LtEq,
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Gt,
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    GtEq,
    #[cfg_attr(feature = "serde", serde(rename = "LIKE"))]
    Like,
    #[cfg_attr(feature = "serde", serde(rename = "IN"))]
    In,
    #[cfg_attr(feature = "serde", serde(rename = "NOT IN"))]
    NotIn,
    #[cfg_attr(feature = "serde", serde(rename = "INCLUDES"))]
    Includes,
    #[cfg_attr(feature = "serde", serde(rename = "EXCLUDES"))]
    Excludes,
}

impl ComparisonOperator {
    /// True for the operators whose right-hand side is a parenthesized
    /// value list or subquery.
    pub fn is_set_operator(&self) -> bool {
        matches!(
            self,
            ComparisonOperator::In
                | ComparisonOperator::NotIn
                | ComparisonOperator::Includes
                | ComparisonOperator::Excludes
        )
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::LtEq => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::GtEq => ">=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::In => "IN",
            ComparisonOperator::NotIn => "NOT IN",
            ComparisonOperator::Includes => "INCLUDES",
            ComparisonOperator::Excludes => "EXCLUDES",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum LogicalPrefix {
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GroupByClause {
    pub expr: GroupByExpr,
    pub having: Option<HavingClause>,
}

impl fmt::Display for GroupByClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(ref having) = self.having {
            write!(f, " HAVING {}", having)?;
        }
        Ok(())
    }
}

/// What is being grouped: a list of fields, or a single function
/// invocation (`CUBE(...)`, `ROLLUP(...)`, or a date function).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupByExpr {
    Fields(Vec<String>),
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    Function(FieldFunctionExpression),
}

impl fmt::Display for GroupByExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroupByExpr::Fields(fields) => write!(f, "{}", display_comma_separated(fields)),
            GroupByExpr::Function(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderByClause {
    pub expr: OrderByExpr,
    pub order: Option<OrderDirection>,
    pub nulls: Option<NullsPosition>,
}

impl fmt::Display for OrderByClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(ref order) = self.order {
            write!(f, " {}", order)?;
        }
        if let Some(ref nulls) = self.nulls {
            write!(f, " NULLS {}", nulls)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderByExpr {
    Field(String),
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    Function(FieldFunctionExpression),
}

impl fmt::Display for OrderByExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderByExpr::Field(field) => f.write_str(field),
            OrderByExpr::Function(func) => write!(f, "{}", func),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum NullsPosition {
    First,
    Last,
}

impl fmt::Display for NullsPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            NullsPosition::First => "FIRST",
            NullsPosition::Last => "LAST",
        })
    }
}

/// The accumulated conditions of `WITH DATA CATEGORY` clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WithDataCategoryClause {
    pub conditions: Vec<WithDataCategoryCondition>,
}

impl fmt::Display for WithDataCategoryClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", display_separated(&self.conditions, " AND "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WithDataCategoryCondition {
    pub group_name: String,
    pub selector: DataCategorySelector,
    pub parameters: Vec<String>,
}

impl fmt::Display for WithDataCategoryCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} ", self.group_name, self.selector)?;
        if self.parameters.len() == 1 {
            f.write_str(&self.parameters[0])
        } else {
            write!(f, "({})", display_comma_separated(&self.parameters))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DataCategorySelector {
    At,
    Above,
    Below,
    AboveOrBelow,
}

impl fmt::Display for DataCategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DataCategorySelector::At => "AT",
            DataCategorySelector::Above => "ABOVE",
            DataCategorySelector::Below => "BELOW",
            DataCategorySelector::AboveOrBelow => "ABOVE_OR_BELOW",
        })
    }
}

/// `FOR VIEW` / `FOR REFERENCE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum ForClause {
    View,
    Reference,
}

impl fmt::Display for ForClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ForClause::View => "VIEW",
            ForClause::Reference => "REFERENCE",
        })
    }
}

/// `UPDATE TRACKING` / `UPDATE VIEWSTAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum UpdateClause {
    Tracking,
    Viewstat,
}

impl fmt::Display for UpdateClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            UpdateClause::Tracking => "TRACKING",
            UpdateClause::Viewstat => "VIEWSTAT",
        })
    }
}
