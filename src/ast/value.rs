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

use crate::ast::{display_comma_separated, Subquery};

/// Classification of a literal right-hand side, determined by which token
/// the value matched during the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LiteralType {
    String,
    Integer,
    Decimal,
    IntegerWithCurrencyPrefix,
    DecimalWithCurrencyPrefix,
    Boolean,
    Date,
    Datetime,
    Null,
    /// A fixed relative-date literal, e.g. `LAST_WEEK`
    DateLiteral,
    /// A parameterized relative-date literal, e.g. `LAST_N_DAYS:30`
    DateNLiteral,
    /// An Apex bind variable, e.g. `:accountIds`
    ApexBindVariable,
    Subquery,
}

impl LiteralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralType::String => "STRING",
            LiteralType::Integer => "INTEGER",
            LiteralType::Decimal => "DECIMAL",
            LiteralType::IntegerWithCurrencyPrefix => "INTEGER_WITH_CURRENCY_PREFIX",
            LiteralType::DecimalWithCurrencyPrefix => "DECIMAL_WITH_CURRENCY_PREFIX",
            LiteralType::Boolean => "BOOLEAN",
            LiteralType::Date => "DATE",
            LiteralType::Datetime => "DATETIME",
            LiteralType::Null => "NULL",
            LiteralType::DateLiteral => "DATE_LITERAL",
            LiteralType::DateNLiteral => "DATE_N_LITERAL",
            LiteralType::ApexBindVariable => "APEX_BIND_VARIABLE",
            LiteralType::Subquery => "SUBQUERY",
        }
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single literal value with its classification. `raw` preserves the
/// source spelling: strings keep their quotes, bind variables keep the
/// leading `:`, date-N literals keep their `:N` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiteralValue {
    #[cfg_attr(feature = "serde", serde(rename = "value"))]
    pub raw: String,
    #[cfg_attr(feature = "serde", serde(rename = "literalType"))]
    pub literal_type: LiteralType,
    /// The `N` of a date-N literal
    #[cfg_attr(feature = "serde", serde(rename = "dateLiteralVariable"))]
    pub date_variable: Option<u32>,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConditionValue {
    /// A scalar literal
    Literal(LiteralValue),
    /// A parenthesized array literal; each element is classified
    /// independently
    List(Vec<LiteralValue>),
    /// `IN (SELECT ...)`
    Subquery(Box<Subquery>),
}

impl ConditionValue {
    /// The enclosing classification: the scalar tag for a scalar value or a
    /// homogeneous list, the per-element tags for a heterogeneous list.
    pub fn literal_type(&self) -> ListLiteralType {
        match self {
            ConditionValue::Literal(value) => ListLiteralType::Uniform(value.literal_type),
            ConditionValue::Subquery(_) => ListLiteralType::Uniform(LiteralType::Subquery),
            ConditionValue::List(values) => {
                let mut tags = values.iter().map(|v| v.literal_type);
                match tags.next() {
                    Some(first) if tags.clone().all(|t| t == first) => {
                        ListLiteralType::Uniform(first)
                    }
                    Some(first) => {
                        let mut all = vec![first];
                        all.extend(tags);
                        ListLiteralType::Mixed(all)
                    }
                    None => ListLiteralType::Mixed(vec![]),
                }
            }
        }
    }

    /// For a list containing at least one date-N literal, the per-position
    /// `N` values (`None` at non-date-N positions). For a scalar date-N
    /// literal, a single-element sequence.
    pub fn date_variables(&self) -> Option<Vec<Option<u32>>> {
        match self {
            ConditionValue::Literal(value) => {
                value.date_variable.map(|n| vec![Some(n)])
            }
            ConditionValue::List(values) => {
                if values.iter().any(|v| v.date_variable.is_some()) {
                    Some(values.iter().map(|v| v.date_variable).collect())
                } else {
                    None
                }
            }
            ConditionValue::Subquery(_) => None,
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConditionValue::Literal(value) => write!(f, "{}", value),
            ConditionValue::List(values) => write!(f, "({})", display_comma_separated(values)),
            ConditionValue::Subquery(subquery) => write!(f, "({})", subquery),
        }
    }
}

/// Classification of a whole condition value, scalar or per-element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ListLiteralType {
    Uniform(LiteralType),
    Mixed(Vec<LiteralType>),
}
