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

//! `SELECT` statement parsing: the projection list, `FROM`, and every
//! trailing clause through `UPDATE TRACKING | VIEWSTAT`.

use super::*;

use crate::ast::{
    DataCategorySelector, Field, FieldRelationship, FieldSubquery, FieldType, FieldTypeof,
    ForClause, GroupByClause, GroupByExpr, NullsPosition, OrderByClause, OrderByExpr,
    OrderDirection, Subquery, TypeofCondition, UpdateClause, UsingScope, WhereClause,
    WithDataCategoryClause, WithDataCategoryCondition,
};
use crate::keywords::FUNCTION_KEYWORDS;
use crate::tokenizer::Location;

/// The parts shared by top-level queries and subqueries, accumulated while
/// parsing a `SELECT` statement.
struct SelectBody {
    fields: Vec<FieldType>,
    from_prefix: Vec<String>,
    from_name: String,
    from_alias: Option<String>,
    using_scope: Option<UsingScope>,
    where_clause: Option<WhereClause>,
    with_security_enforced: bool,
    with_data_category: Option<WithDataCategoryClause>,
    group_by: Option<GroupByClause>,
    order_by: Vec<OrderByClause>,
    limit: Option<u32>,
    offset: Option<u32>,
    for_clause: Option<ForClause>,
    update_clause: Option<UpdateClause>,
}

impl Parser {
    /// Parse a full `SELECT` statement as a top-level [`Query`].
    pub(crate) fn parse_select_statement(&mut self) -> Result<Query, ParserError> {
        let body = self.parse_select_body(false)?;
        Ok(Query {
            fields: body.fields,
            sobject: body.from_name,
            sobject_alias: body.from_alias,
            sobject_prefix: body.from_prefix,
            using_scope: body.using_scope,
            where_clause: body.where_clause,
            with_security_enforced: body.with_security_enforced,
            with_data_category: body.with_data_category,
            group_by: body.group_by,
            order_by: body.order_by,
            limit: body.limit,
            offset: body.offset,
            for_clause: body.for_clause,
            update_clause: body.update_clause,
        })
    }

    /// Parse a nested `SELECT` statement. The `FROM` target is bound as the
    /// traversed relationship name, and `USING SCOPE`, `FOR` and `UPDATE`
    /// are rejected.
    pub(crate) fn parse_subquery(&mut self) -> Result<Subquery, ParserError> {
        let body = self.parse_select_body(true)?;
        Ok(Subquery {
            fields: body.fields,
            relationship_name: body.from_name,
            sobject_alias: body.from_alias,
            sobject_prefix: body.from_prefix,
            where_clause: body.where_clause,
            with_security_enforced: body.with_security_enforced,
            with_data_category: body.with_data_category,
            group_by: body.group_by,
            order_by: body.order_by,
            limit: body.limit,
            offset: body.offset,
        })
    }

    fn parse_select_body(&mut self, is_subquery: bool) -> Result<SelectBody, ParserError> {
        let _guard = self.recursion_counter.try_decrease()?;

        self.expect_keyword(Keyword::SELECT)?;
        let items = self.parse_comma_separated(|p| p.parse_select_item())?;
        let mut fields: Vec<FieldType> = items.into_iter().flatten().collect();

        self.expect_keyword(Keyword::FROM)?;
        let (from_prefix, from_name) = self.parse_from_target()?;
        let from_alias = self.parse_optional_alias()?;

        let using_scope = if self.parse_keywords(&[Keyword::USING, Keyword::SCOPE]) {
            if is_subquery {
                return parser_err!(
                    "USING SCOPE is not allowed in a subquery",
                    self.peek_token().location
                );
            }
            Some(self.parse_using_scope()?)
        } else {
            None
        };

        let where_clause = if self.parse_keyword(Keyword::WHERE) {
            self.recover_clause(|p| p.parse_condition_chain())?
        } else {
            None
        };

        let mut with_security_enforced = false;
        let mut with_data_category: Option<WithDataCategoryClause> = None;
        while self.parse_keyword(Keyword::WITH) {
            if self.parse_keyword(Keyword::SECURITY_ENFORCED) {
                with_security_enforced = true;
            } else if self.parse_keywords(&[Keyword::DATA, Keyword::CATEGORY]) {
                let conditions = self.recover_clause(|p| {
                    p.parse_keyword_separated(Keyword::AND, |p| p.parse_data_category_condition())
                })?;
                if let Some(conditions) = conditions {
                    match with_data_category {
                        Some(ref mut clause) => clause.conditions.extend(conditions),
                        None => with_data_category = Some(WithDataCategoryClause { conditions }),
                    }
                }
            } else {
                return self.expected("SECURITY_ENFORCED or DATA CATEGORY", self.peek_token());
            }
        }

        let group_by = if self.parse_keywords(&[Keyword::GROUP, Keyword::BY]) {
            self.recover_clause(|p| p.parse_group_by())?
        } else {
            None
        };

        let order_by = if self.parse_keywords(&[Keyword::ORDER, Keyword::BY]) {
            self.recover_clause(|p| p.parse_comma_separated(|p| p.parse_order_by_clause()))?
                .unwrap_or_default()
        } else {
            vec![]
        };

        let limit = if self.parse_keyword(Keyword::LIMIT) {
            self.recover_clause(|p| p.parse_literal_uint())?
        } else {
            None
        };

        let offset = if self.parse_keyword(Keyword::OFFSET) {
            self.recover_clause(|p| p.parse_literal_uint())?
        } else {
            None
        };

        let for_clause = if self.parse_keyword(Keyword::FOR) {
            if is_subquery {
                return parser_err!(
                    "FOR is not allowed in a subquery",
                    self.peek_token().location
                );
            }
            match self.expect_one_of_keywords(&[Keyword::VIEW, Keyword::REFERENCE])? {
                Keyword::VIEW => Some(ForClause::View),
                _ => Some(ForClause::Reference),
            }
        } else {
            None
        };

        let update_clause = if self.parse_keyword(Keyword::UPDATE) {
            if is_subquery {
                return parser_err!(
                    "UPDATE is not allowed in a subquery",
                    self.peek_token().location
                );
            }
            match self.expect_one_of_keywords(&[Keyword::TRACKING, Keyword::VIEWSTAT])? {
                Keyword::TRACKING => Some(UpdateClause::Tracking),
                _ => Some(UpdateClause::Viewstat),
            }
        } else {
            None
        };

        // Projected fields qualified with the sObject alias can only be
        // recognized once the FROM clause is known.
        if let Some(ref alias) = from_alias {
            resolve_sobject_alias(&mut fields, alias);
        }

        if fields.is_empty() {
            return Err(ParserError::SemanticError(
                "query contains no projected fields".to_string(),
            ));
        }

        Ok(SelectBody {
            fields,
            from_prefix,
            from_name,
            from_alias,
            using_scope,
            where_clause,
            with_security_enforced,
            with_data_category,
            group_by,
            order_by,
            limit,
            offset,
            for_clause,
            update_clause,
        })
    }

    /// Parse one item of the projection list. Returns `None` for a subquery
    /// when [`ParserOptions::include_subquery_as_field`] is off.
    fn parse_select_item(&mut self) -> Result<Option<FieldType>, ParserError> {
        if self.consume_token(&Token::LParen) {
            let subquery = self.parse_subquery()?;
            self.expect_token(&Token::RParen)?;
            if self.options.include_subquery_as_field {
                return Ok(Some(FieldType::FieldSubquery(FieldSubquery { subquery })));
            }
            return Ok(None);
        }
        if self.peek_keyword(Keyword::TYPEOF) {
            return Ok(Some(FieldType::FieldTypeof(self.parse_typeof()?)));
        }
        if self.peek_function_call() {
            let mut function = self.parse_function()?;
            function.alias = self.parse_optional_alias()?;
            return Ok(Some(FieldType::FieldFunction(function)));
        }
        let next_token = self.next_token();
        match next_token.token {
            Token::Word(w) => {
                let alias = self.parse_optional_alias()?;
                Ok(Some(self.field_from_path(
                    &w.value,
                    alias,
                    next_token.location,
                )?))
            }
            _ => self.expected("a field, function, subquery, or TYPEOF", next_token),
        }
    }

    /// True when the current token heads a function invocation.
    pub(crate) fn peek_function_call(&self) -> bool {
        match self.peek_token().token {
            Token::Word(w) => {
                FUNCTION_KEYWORDS.contains(&w.keyword) && self.peek_nth_token(1) == Token::LParen
            }
            _ => false,
        }
    }

    /// Split an identifier on `.`: a bare name becomes a [`Field`], a
    /// dotted path becomes a [`FieldRelationship`] whose final segment is
    /// the field.
    fn field_from_path(
        &self,
        raw: &str,
        alias: Option<String>,
        location: Location,
    ) -> Result<FieldType, ParserError> {
        match raw.rsplit_once('.') {
            None => Ok(FieldType::Field(Field {
                field: raw.to_string(),
                object_prefix: None,
                alias,
            })),
            Some((head, last)) => {
                let relationships: Vec<String> = head.split('.').map(String::from).collect();
                if last.is_empty() || relationships.iter().any(|s| s.is_empty()) {
                    return parser_err!(format!("Invalid field path '{}'", raw), location);
                }
                Ok(FieldType::FieldRelationship(FieldRelationship {
                    field: last.to_string(),
                    relationships,
                    object_prefix: None,
                    alias,
                    raw_value: raw.to_string(),
                }))
            }
        }
    }

    /// Parse an optional `AS? alias`. An alias is any bare word that is not
    /// a keyword; `AS` makes the alias mandatory.
    fn parse_optional_alias(&mut self) -> Result<Option<String>, ParserError> {
        let explicit = self.parse_keyword(Keyword::AS);
        match self.peek_token().token {
            Token::Word(w) if w.keyword == Keyword::NoKeyword && !w.value.contains('.') => {
                self.next_token();
                Ok(Some(w.value))
            }
            _ if explicit => self.expected("an alias after AS", self.peek_token()),
            _ => Ok(None),
        }
    }

    /// Parse the `FROM` target, splitting any leading dotted segments into
    /// the prefix.
    fn parse_from_target(&mut self) -> Result<(Vec<String>, String), ParserError> {
        let next_token = self.next_token();
        match next_token.token {
            Token::Word(w) => match w.value.rsplit_once('.') {
                None => Ok((vec![], w.value)),
                Some((head, last)) => {
                    let prefix: Vec<String> = head.split('.').map(String::from).collect();
                    if last.is_empty() || prefix.iter().any(|s| s.is_empty()) {
                        return parser_err!(
                            format!("Invalid object name '{}'", w.value),
                            next_token.location
                        );
                    }
                    Ok((prefix, last.to_string()))
                }
            },
            _ => self.expected("an object name", next_token),
        }
    }

    fn parse_using_scope(&mut self) -> Result<UsingScope, ParserError> {
        let next_token = self.next_token();
        let scope = match &next_token.token {
            Token::Word(w) => match w.keyword {
                Keyword::DELEGATED => Some(UsingScope::Delegated),
                Keyword::EVERYTHING => Some(UsingScope::Everything),
                Keyword::MINE => Some(UsingScope::Mine),
                Keyword::MINE_AND_MY_GROUPS => Some(UsingScope::MineAndMyGroups),
                Keyword::MY_TERRITORY => Some(UsingScope::MyTerritory),
                Keyword::MY_TEAM_TERRITORY => Some(UsingScope::MyTeamTerritory),
                Keyword::TEAM => Some(UsingScope::Team),
                _ => None,
            },
            _ => None,
        };
        match scope {
            Some(scope) => Ok(scope),
            None => self.expected(
                "one of delegated, everything, mine, mine_and_my_groups, my_territory, \
                 my_team_territory or team",
                next_token,
            ),
        }
    }

    /// Parse a `TYPEOF field WHEN ... THEN ... [ELSE ...] END` projection.
    fn parse_typeof(&mut self) -> Result<FieldTypeof, ParserError> {
        self.expect_keyword(Keyword::TYPEOF)?;
        let field = self.parse_identifier()?;
        let mut conditions = vec![];
        while self.parse_keyword(Keyword::WHEN) {
            let object_type = self.parse_identifier()?;
            self.expect_keyword(Keyword::THEN)?;
            let field_list = self.parse_comma_separated(|p| p.parse_identifier())?;
            conditions.push(TypeofCondition::When {
                object_type,
                field_list,
            });
        }
        if conditions.is_empty() {
            return self.expected("WHEN", self.peek_token());
        }
        if self.parse_keyword(Keyword::ELSE) {
            let field_list = self.parse_comma_separated(|p| p.parse_identifier())?;
            conditions.push(TypeofCondition::Else { field_list });
        }
        self.expect_keyword(Keyword::END)?;
        Ok(FieldTypeof { field, conditions })
    }

    /// Parse one `groupName selector param-or-params` data category filter.
    fn parse_data_category_condition(&mut self) -> Result<WithDataCategoryCondition, ParserError> {
        let group_name = self.parse_identifier()?;
        let selector = match self.expect_one_of_keywords(&[
            Keyword::AT,
            Keyword::ABOVE,
            Keyword::BELOW,
            Keyword::ABOVE_OR_BELOW,
        ])? {
            Keyword::AT => DataCategorySelector::At,
            Keyword::ABOVE => DataCategorySelector::Above,
            Keyword::BELOW => DataCategorySelector::Below,
            _ => DataCategorySelector::AboveOrBelow,
        };
        let parameters = if self.consume_token(&Token::LParen) {
            let parameters = self.parse_comma_separated(|p| p.parse_identifier())?;
            self.expect_token(&Token::RParen)?;
            parameters
        } else {
            vec![self.parse_identifier()?]
        };
        Ok(WithDataCategoryCondition {
            group_name,
            selector,
            parameters,
        })
    }

    /// Parse the body of a `GROUP BY` clause, including a trailing
    /// `HAVING`.
    fn parse_group_by(&mut self) -> Result<GroupByClause, ParserError> {
        let expr = if self.peek_function_call() {
            GroupByExpr::Function(self.parse_function()?)
        } else {
            GroupByExpr::Fields(self.parse_comma_separated(|p| p.parse_identifier())?)
        };
        let having = if self.parse_keyword(Keyword::HAVING) {
            Some(self.parse_condition_chain()?)
        } else {
            None
        };
        Ok(GroupByClause { expr, having })
    }

    /// Parse one ordering criterion.
    fn parse_order_by_clause(&mut self) -> Result<OrderByClause, ParserError> {
        let expr = if self.peek_function_call() {
            OrderByExpr::Function(self.parse_function()?)
        } else {
            OrderByExpr::Field(self.parse_identifier()?)
        };
        let order = match self.parse_one_of_keywords(&[Keyword::ASC, Keyword::DESC]) {
            Some(Keyword::ASC) => Some(OrderDirection::Asc),
            Some(_) => Some(OrderDirection::Desc),
            None => None,
        };
        let nulls = if self.parse_keyword(Keyword::NULLS) {
            match self.expect_one_of_keywords(&[Keyword::FIRST, Keyword::LAST])? {
                Keyword::FIRST => Some(NullsPosition::First),
                _ => Some(NullsPosition::Last),
            }
        } else {
            None
        };
        Ok(OrderByClause { expr, order, nulls })
    }
}

/// Strip a leading relationship segment equal to the sObject alias into
/// `object_prefix`, rewriting to a plain [`Field`] when no relationship
/// segments remain. Identifier comparison is case-insensitive, like SOQL
/// itself.
fn resolve_sobject_alias(fields: &mut [FieldType], alias: &str) {
    for field in fields.iter_mut() {
        if let FieldType::FieldRelationship(rel) = field {
            let matches_alias = rel
                .relationships
                .first()
                .map_or(false, |first| first.eq_ignore_ascii_case(alias));
            if !matches_alias {
                continue;
            }
            let prefix = rel.relationships.remove(0);
            if rel.relationships.is_empty() {
                *field = FieldType::Field(Field {
                    field: std::mem::take(&mut rel.field),
                    object_prefix: Some(prefix),
                    alias: rel.alias.take(),
                });
            } else {
                rel.object_prefix = Some(prefix);
            }
        }
    }
}
