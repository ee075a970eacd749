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

//! Condition chains (`WHERE` / `HAVING`), literal classification, and
//! function invocations.

use super::*;

use crate::ast::{
    ComparisonOperator, Condition, ConditionExpr, ConditionValue, FieldFunctionExpression,
    FunctionParameter, LiteralType, LiteralValue, LogicalOperator, LogicalPrefix, WhereClause,
};
use crate::keywords::{AGGREGATE_FUNCTIONS, DATE_LITERALS, DATE_N_LITERALS, FUNCTION_KEYWORDS};

impl Parser {
    /// Parse the chain of conditions of a `WHERE` or `HAVING` clause into
    /// the flattened conditions-plus-connectives representation.
    ///
    /// Parenthesis counts are tracked across the whole chain; a closing
    /// parenthesis is consumed only while the chain has unmatched opens, so
    /// the terminator of an enclosing subquery is left for the caller.
    pub(crate) fn parse_condition_chain(&mut self) -> Result<WhereClause, ParserError> {
        let mut depth: u32 = 0;
        let mut conditions = vec![self.parse_condition(&mut depth)?];
        let mut connectives = vec![];
        while let Some(keyword) = self.parse_one_of_keywords(&[Keyword::AND, Keyword::OR]) {
            connectives.push(match keyword {
                Keyword::AND => LogicalOperator::And,
                _ => LogicalOperator::Or,
            });
            conditions.push(self.parse_condition(&mut depth)?);
        }
        if depth != 0 {
            return parser_err!(
                format!("Unbalanced parentheses: {} left unclosed", depth),
                self.peek_token().location
            );
        }
        Ok(WhereClause {
            conditions,
            connectives,
        })
    }

    fn parse_condition(&mut self, depth: &mut u32) -> Result<Condition, ParserError> {
        let logical_prefix = if self.parse_keyword(Keyword::NOT) {
            Some(LogicalPrefix::Not)
        } else {
            None
        };
        let mut open_paren: u32 = 0;
        while self.consume_token(&Token::LParen) {
            open_paren += 1;
        }
        *depth += open_paren;
        let lhs = self.parse_condition_lhs()?;
        let operator = self.parse_comparison_operator()?;
        let value = self.parse_condition_value(operator)?;
        let mut close_paren: u32 = 0;
        while *depth > 0 && self.consume_token(&Token::RParen) {
            close_paren += 1;
            *depth -= 1;
        }
        Ok(Condition {
            open_paren,
            logical_prefix,
            lhs,
            operator,
            value,
            close_paren,
        })
    }

    fn parse_condition_lhs(&mut self) -> Result<ConditionExpr, ParserError> {
        if self.peek_function_call() {
            return Ok(ConditionExpr::Function(self.parse_function()?));
        }
        let next_token = self.next_token();
        match next_token.token {
            Token::Word(w) => Ok(ConditionExpr::Field(w.value)),
            _ => self.expected("a field or function", next_token),
        }
    }

    fn parse_comparison_operator(&mut self) -> Result<ComparisonOperator, ParserError> {
        let next_token = self.next_token();
        match &next_token.token {
            Token::Eq => Ok(ComparisonOperator::Eq),
            Token::Neq => Ok(ComparisonOperator::NotEq),
            Token::Lt => Ok(ComparisonOperator::Lt),
            Token::LtEq => Ok(ComparisonOperator::LtEq),
            Token::Gt => Ok(ComparisonOperator::Gt),
            Token::GtEq => Ok(ComparisonOperator::GtEq),
            Token::Word(w) => match w.keyword {
                Keyword::LIKE => Ok(ComparisonOperator::Like),
                Keyword::IN => Ok(ComparisonOperator::In),
                Keyword::INCLUDES => Ok(ComparisonOperator::Includes),
                Keyword::EXCLUDES => Ok(ComparisonOperator::Excludes),
                Keyword::NOT => {
                    self.expect_keyword(Keyword::IN)?;
                    Ok(ComparisonOperator::NotIn)
                }
                _ => self.expected("a comparison operator", next_token),
            },
            _ => self.expected("a comparison operator", next_token),
        }
    }

    /// Parse the right-hand side of a condition: a scalar literal, a
    /// parenthesized value list, a subquery, or an Apex bind variable.
    fn parse_condition_value(
        &mut self,
        operator: ComparisonOperator,
    ) -> Result<ConditionValue, ParserError> {
        if self.consume_token(&Token::LParen) {
            if self.peek_keyword(Keyword::SELECT) {
                let subquery = self.parse_subquery()?;
                self.expect_token(&Token::RParen)?;
                return Ok(ConditionValue::Subquery(Box::new(subquery)));
            }
            if operator.is_set_operator() {
                let values = self.parse_comma_separated(|p| p.parse_literal_value())?;
                self.expect_token(&Token::RParen)?;
                return Ok(ConditionValue::List(values));
            }
            return self.expected("a subquery", self.peek_token());
        }
        // a bare bind variable is the only unparenthesized right-hand side
        // a set operator accepts: `WHERE AccountId IN :accountIds`
        if operator.is_set_operator() && self.peek_token() != Token::Colon {
            return self.expected("( to begin a value list or subquery", self.peek_token());
        }
        Ok(ConditionValue::Literal(self.parse_literal_value()?))
    }

    /// Parse a single literal and classify it by the token it matched.
    fn parse_literal_value(&mut self) -> Result<LiteralValue, ParserError> {
        let next_token = self.next_token();
        match &next_token.token {
            Token::SingleQuotedString(s) => Ok(LiteralValue {
                raw: format!("'{}'", s),
                literal_type: LiteralType::String,
                date_variable: None,
            }),
            Token::Number(n) => Ok(LiteralValue {
                raw: n.clone(),
                literal_type: if next_token.token.is_decimal() {
                    LiteralType::Decimal
                } else {
                    LiteralType::Integer
                },
                date_variable: None,
            }),
            Token::Currency(c) => Ok(LiteralValue {
                raw: c.clone(),
                literal_type: if next_token.token.is_decimal() {
                    LiteralType::DecimalWithCurrencyPrefix
                } else {
                    LiteralType::IntegerWithCurrencyPrefix
                },
                date_variable: None,
            }),
            Token::Date(d) => Ok(LiteralValue {
                raw: d.clone(),
                literal_type: LiteralType::Date,
                date_variable: None,
            }),
            Token::DateTime(d) => Ok(LiteralValue {
                raw: d.clone(),
                literal_type: LiteralType::Datetime,
                date_variable: None,
            }),
            // an Apex bind variable: `:name`
            Token::Colon => {
                let bind_token = self.next_token();
                match bind_token.token {
                    Token::Word(w) => Ok(LiteralValue {
                        raw: format!(":{}", w.value),
                        literal_type: LiteralType::ApexBindVariable,
                        date_variable: None,
                    }),
                    _ => self.expected("an Apex bind variable name", bind_token),
                }
            }
            Token::Word(w) => match w.keyword {
                Keyword::TRUE | Keyword::FALSE => Ok(LiteralValue {
                    raw: w.value.clone(),
                    literal_type: LiteralType::Boolean,
                    date_variable: None,
                }),
                Keyword::NULL => Ok(LiteralValue {
                    raw: w.value.clone(),
                    literal_type: LiteralType::Null,
                    date_variable: None,
                }),
                keyword if DATE_LITERALS.contains(&keyword) => Ok(LiteralValue {
                    raw: w.value.clone(),
                    literal_type: LiteralType::DateLiteral,
                    date_variable: None,
                }),
                keyword if DATE_N_LITERALS.contains(&keyword) => {
                    let head = w.value.clone();
                    self.expect_token(&Token::Colon)?;
                    let variable = self.parse_literal_uint()?;
                    Ok(LiteralValue {
                        raw: format!("{}:{}", head, variable),
                        literal_type: LiteralType::DateNLiteral,
                        date_variable: Some(variable),
                    })
                }
                _ => self.expected("a literal value", next_token.clone()),
            },
            _ => self.expected("a literal value", next_token.clone()),
        }
    }

    /// Parse a function invocation such as `COUNT(Id)`,
    /// `FORMAT(MAX(CreatedDate))` or
    /// `DISTANCE(Location__c, GEOLOCATION(37.77, -122.42), 'mi')`.
    ///
    /// The current token must be the function name. `raw_value` is
    /// reconstructed from the parsed invocation; nested function arguments
    /// contribute their own rendering.
    pub(crate) fn parse_function(&mut self) -> Result<FieldFunctionExpression, ParserError> {
        let _guard = self.recursion_counter.try_decrease()?;
        let next_token = self.next_token();
        let word = match next_token.token {
            Token::Word(w) if FUNCTION_KEYWORDS.contains(&w.keyword) => w,
            _ => return self.expected("a function name", next_token),
        };
        // DISTANCE is tagged as an aggregate alongside the true group
        // functions, matching how consumers bucket it
        let is_aggregate_fn =
            AGGREGATE_FUNCTIONS.contains(&word.keyword) || word.keyword == Keyword::DISTANCE;
        self.expect_token(&Token::LParen)?;
        let parameters = if self.peek_token() == Token::RParen {
            vec![]
        } else {
            self.parse_comma_separated(|p| p.parse_function_parameter())?
        };
        self.expect_token(&Token::RParen)?;
        let mut function = FieldFunctionExpression {
            function_name: word.value.to_uppercase(),
            parameters,
            is_aggregate_fn,
            alias: None,
            raw_value: String::new(),
        };
        function.raw_value = function.to_string();
        Ok(function)
    }

    fn parse_function_parameter(&mut self) -> Result<FunctionParameter, ParserError> {
        if self.peek_function_call() {
            return Ok(FunctionParameter::Function(Box::new(
                self.parse_function()?,
            )));
        }
        let next_token = self.next_token();
        match next_token.token {
            Token::Word(w) => Ok(FunctionParameter::Value(w.value)),
            Token::Number(n) => Ok(FunctionParameter::Value(n)),
            Token::SingleQuotedString(s) => Ok(FunctionParameter::Value(format!("'{}'", s))),
            _ => self.expected("a function parameter", next_token),
        }
    }
}
