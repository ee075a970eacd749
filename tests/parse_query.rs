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

#![warn(clippy::all)]
//! Test the SOQL surface: every clause the parser recognizes, the AST
//! shapes it builds, and the round trip back to query text.

use matches::assert_matches;
use pretty_assertions::assert_eq;

use soql_parser::ast::*;
use soql_parser::parser::{Parser, ParserError, ParserOptions};
use soql_parser::{is_query_valid, parse_query, parse_query_with_options};

use test_utils::{
    base_query, field, only_condition, prefixed_field, string_literal, verified_query,
};

mod test_utils;

#[test]
fn parse_simple_select() {
    let query = verified_query("SELECT Id FROM Account");
    assert_eq!(
        query,
        Query {
            fields: vec![field("Id")],
            ..base_query("Account")
        }
    );
}

#[test]
fn parse_relationship_fields() {
    let query = verified_query("SELECT Id, Account.Owner.Name FROM Contact");
    assert_eq!(
        query.fields,
        vec![
            field("Id"),
            FieldType::FieldRelationship(FieldRelationship {
                field: "Name".to_string(),
                relationships: vec!["Account".to_string(), "Owner".to_string()],
                object_prefix: None,
                alias: None,
                raw_value: "Account.Owner.Name".to_string(),
            }),
        ]
    );
}

#[test]
fn parse_field_aliases() {
    let query = verified_query("SELECT Id ident, Name FROM Account");
    assert_eq!(
        query.fields[0],
        FieldType::Field(Field {
            field: "Id".to_string(),
            object_prefix: None,
            alias: Some("ident".to_string()),
        })
    );

    // AS is accepted but not round-tripped, so parse directly
    let query = parse_query("SELECT Id AS ident FROM Account").unwrap();
    assert_eq!(
        query.fields[0],
        FieldType::Field(Field {
            field: "Id".to_string(),
            object_prefix: None,
            alias: Some("ident".to_string()),
        })
    );
}

#[test]
fn parse_where_string_literal() {
    let query = verified_query("SELECT Id, Name FROM Account WHERE Name = 'foo'");
    let where_clause = query.where_clause.as_ref().unwrap();
    assert_eq!(
        only_condition(where_clause),
        &Condition {
            open_paren: 0,
            logical_prefix: None,
            lhs: ConditionExpr::Field("Name".to_string()),
            operator: ComparisonOperator::Eq,
            value: string_literal("'foo'"),
            close_paren: 0,
        }
    );
}

#[test]
fn parse_where_date_n_literal() {
    let query = verified_query("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS:7");
    let where_clause = query.where_clause.as_ref().unwrap();
    let condition = only_condition(where_clause);
    assert_eq!(
        condition.value,
        ConditionValue::Literal(LiteralValue {
            raw: "LAST_N_DAYS:7".to_string(),
            literal_type: LiteralType::DateNLiteral,
            date_variable: Some(7),
        })
    );
    assert_eq!(condition.value.date_variables(), Some(vec![Some(7)]));
}

#[test]
fn parse_sobject_alias_resolution() {
    let query = verified_query("SELECT a.Id, a.Name FROM Account a");
    assert_eq!(query.sobject_alias, Some("a".to_string()));
    assert_eq!(
        query.fields,
        vec![prefixed_field("a", "Id"), prefixed_field("a", "Name")]
    );
    // the alias never survives as a leading relationship segment
    for field in &query.fields {
        if let FieldType::FieldRelationship(rel) = field {
            assert_ne!(rel.relationships.first().map(String::as_str), Some("a"));
        }
    }
}

#[test]
fn parse_sobject_alias_keeps_deeper_paths() {
    let query = verified_query("SELECT a.Owner.Name FROM Account a");
    assert_eq!(
        query.fields[0],
        FieldType::FieldRelationship(FieldRelationship {
            field: "Name".to_string(),
            relationships: vec!["Owner".to_string()],
            object_prefix: Some("a".to_string()),
            alias: None,
            raw_value: "a.Owner.Name".to_string(),
        })
    );
}

#[test]
fn parse_subquery_projection() {
    let query = verified_query("SELECT Id, (SELECT Id FROM Contacts) FROM Account");
    match &query.fields[1] {
        FieldType::FieldSubquery(FieldSubquery { subquery }) => {
            assert_eq!(subquery.relationship_name, "Contacts");
            assert_eq!(subquery.fields, vec![field("Id")]);
        }
        other => panic!("expected a subquery projection, got {:?}", other),
    }
}

#[test]
fn parse_subquery_with_clauses() {
    let query = verified_query(
        "SELECT Name, (SELECT LastName FROM Contacts WHERE IsDeleted = false ORDER BY LastName LIMIT 5) FROM Account",
    );
    match &query.fields[1] {
        FieldType::FieldSubquery(FieldSubquery { subquery }) => {
            assert_eq!(subquery.relationship_name, "Contacts");
            assert!(subquery.where_clause.is_some());
            assert_eq!(subquery.order_by.len(), 1);
            assert_eq!(subquery.limit, Some(5));
        }
        other => panic!("expected a subquery projection, got {:?}", other),
    }
}

#[test]
fn parse_group_by_having_aggregate() {
    let query = verified_query("SELECT COUNT(Id) FROM Account GROUP BY Type HAVING COUNT(Id) > 5");
    let count = FieldFunctionExpression {
        function_name: "COUNT".to_string(),
        parameters: vec![FunctionParameter::Value("Id".to_string())],
        is_aggregate_fn: true,
        alias: None,
        raw_value: "COUNT(Id)".to_string(),
    };
    assert_eq!(query.fields, vec![FieldType::FieldFunction(count.clone())]);

    let group_by = query.group_by.as_ref().unwrap();
    assert_eq!(group_by.expr, GroupByExpr::Fields(vec!["Type".to_string()]));

    let having = group_by.having.as_ref().unwrap();
    let condition = only_condition(having);
    assert_eq!(condition.lhs, ConditionExpr::Function(count));
    assert_eq!(condition.operator, ComparisonOperator::Gt);
    assert_eq!(
        condition.value,
        ConditionValue::Literal(LiteralValue {
            raw: "5".to_string(),
            literal_type: LiteralType::Integer,
            date_variable: None,
        })
    );
}

#[test]
fn parse_group_by_rollup_and_date_function() {
    let query = verified_query("SELECT COUNT(Id) FROM Opportunity GROUP BY ROLLUP(Type)");
    assert_matches!(
        query.group_by.as_ref().unwrap().expr,
        GroupByExpr::Function(ref func) if func.function_name == "ROLLUP"
    );

    let query = verified_query(
        "SELECT CALENDAR_YEAR(CreatedDate), SUM(Amount) FROM Opportunity GROUP BY CALENDAR_YEAR(CreatedDate)",
    );
    assert_matches!(
        query.group_by.as_ref().unwrap().expr,
        GroupByExpr::Function(ref func) if func.function_name == "CALENDAR_YEAR"
    );
}

#[test]
fn parse_typeof_projection() {
    let query = verified_query(
        "SELECT TYPEOF What WHEN Account THEN Phone, NumberOfEmployees WHEN Opportunity THEN Amount, CloseDate ELSE Name, Email END FROM Event",
    );
    assert_eq!(
        query.fields[0],
        FieldType::FieldTypeof(FieldTypeof {
            field: "What".to_string(),
            conditions: vec![
                TypeofCondition::When {
                    object_type: "Account".to_string(),
                    field_list: vec!["Phone".to_string(), "NumberOfEmployees".to_string()],
                },
                TypeofCondition::When {
                    object_type: "Opportunity".to_string(),
                    field_list: vec!["Amount".to_string(), "CloseDate".to_string()],
                },
                TypeofCondition::Else {
                    field_list: vec!["Name".to_string(), "Email".to_string()],
                },
            ],
        })
    );
}

#[test]
fn parse_typeof_requires_a_when_branch() {
    let result = parse_query("SELECT TYPEOF What ELSE Name END FROM Event");
    assert_matches!(result, Err(ParserError::ParserError(ref msg)) if msg.contains("WHEN"));
}

#[test]
fn parse_with_security_enforced() {
    let query = verified_query("SELECT Id FROM Account WITH SECURITY_ENFORCED");
    assert!(query.with_security_enforced);
}

#[test]
fn parse_with_data_category() {
    let query = verified_query(
        "SELECT Id FROM Knowledge__kav WITH DATA CATEGORY Geography__c ABOVE usa__c AND Product__c AT (mobile_phones__c, tablets__c)",
    );
    let clause = query.with_data_category.as_ref().unwrap();
    assert_eq!(
        clause.conditions,
        vec![
            WithDataCategoryCondition {
                group_name: "Geography__c".to_string(),
                selector: DataCategorySelector::Above,
                parameters: vec!["usa__c".to_string()],
            },
            WithDataCategoryCondition {
                group_name: "Product__c".to_string(),
                selector: DataCategorySelector::At,
                parameters: vec!["mobile_phones__c".to_string(), "tablets__c".to_string()],
            },
        ]
    );
}

#[test]
fn parse_repeated_with_clauses_accumulate() {
    let query = parse_query(
        "SELECT Id FROM Knowledge__kav WITH SECURITY_ENFORCED WITH DATA CATEGORY Geography__c AT usa__c WITH DATA CATEGORY Product__c BELOW tablets__c",
    )
    .unwrap();
    assert!(query.with_security_enforced);
    assert_eq!(query.with_data_category.as_ref().unwrap().conditions.len(), 2);
}

#[test]
fn parse_using_scope() {
    let query = verified_query("SELECT Id FROM Account USING SCOPE mine WHERE Name LIKE 'A%'");
    assert_eq!(query.using_scope, Some(UsingScope::Mine));

    let query = verified_query("SELECT Id FROM Account USING SCOPE mine_and_my_groups");
    assert_eq!(query.using_scope, Some(UsingScope::MineAndMyGroups));

    let result = parse_query("SELECT Id FROM Account USING SCOPE everywhere");
    assert_matches!(result, Err(ParserError::ParserError(_)));
}

#[test]
fn parse_order_by() {
    let query =
        verified_query("SELECT Id FROM Account ORDER BY Name ASC NULLS FIRST, Industry DESC");
    assert_eq!(
        query.order_by,
        vec![
            OrderByClause {
                expr: OrderByExpr::Field("Name".to_string()),
                order: Some(OrderDirection::Asc),
                nulls: Some(NullsPosition::First),
            },
            OrderByClause {
                expr: OrderByExpr::Field("Industry".to_string()),
                order: Some(OrderDirection::Desc),
                nulls: None,
            },
        ]
    );
}

#[test]
fn parse_limit_offset_for_update() {
    let query = verified_query("SELECT Id FROM Account LIMIT 10 OFFSET 5");
    assert_eq!(query.limit, Some(10));
    assert_eq!(query.offset, Some(5));

    let query = verified_query("SELECT Id FROM Account FOR VIEW");
    assert_eq!(query.for_clause, Some(ForClause::View));

    let query = verified_query("SELECT Id FROM Account FOR REFERENCE UPDATE TRACKING");
    assert_eq!(query.for_clause, Some(ForClause::Reference));
    assert_eq!(query.update_clause, Some(UpdateClause::Tracking));

    let query = verified_query("SELECT Id FROM Account UPDATE VIEWSTAT");
    assert_eq!(query.update_clause, Some(UpdateClause::Viewstat));
}

#[test]
fn parse_distance_and_geolocation() {
    let query = verified_query(
        "SELECT Id, DISTANCE(BillingAddress, GEOLOCATION(37.775, -122.418), 'mi') dist FROM Account ORDER BY DISTANCE(BillingAddress, GEOLOCATION(37.775, -122.418), 'mi') ASC",
    );
    match &query.fields[1] {
        FieldType::FieldFunction(func) => {
            assert_eq!(func.function_name, "DISTANCE");
            assert!(func.is_aggregate_fn);
            assert_eq!(func.alias, Some("dist".to_string()));
            assert_eq!(
                func.raw_value,
                "DISTANCE(BillingAddress, GEOLOCATION(37.775, -122.418), 'mi')"
            );
            assert_eq!(func.parameters.len(), 3);
            assert_matches!(
                func.parameters[1],
                FunctionParameter::Function(ref geo) if geo.function_name == "GEOLOCATION"
            );
            assert_eq!(func.parameters[2], FunctionParameter::Value("'mi'".to_string()));
        }
        other => panic!("expected a function projection, got {:?}", other),
    }
    assert_matches!(
        query.order_by[0].expr,
        OrderByExpr::Function(ref func) if func.function_name == "DISTANCE"
    );
}

#[test]
fn parse_nested_function_raw_value() {
    let query = verified_query("SELECT FORMAT(MAX(CreatedDate)) FROM Account");
    match &query.fields[0] {
        FieldType::FieldFunction(func) => {
            assert_eq!(func.function_name, "FORMAT");
            assert!(!func.is_aggregate_fn);
            assert_eq!(func.raw_value, "FORMAT(MAX(CreatedDate))");
        }
        other => panic!("expected a function projection, got {:?}", other),
    }
}

#[test]
fn parse_in_list_classification() {
    let query = verified_query("SELECT Id FROM Account WHERE AccountNumber IN ('001', '002')");
    let where_clause = query.where_clause.as_ref().unwrap();
    let condition = only_condition(where_clause);
    assert_eq!(condition.operator, ComparisonOperator::In);
    assert_eq!(
        condition.value.literal_type(),
        ListLiteralType::Uniform(LiteralType::String)
    );
    assert_eq!(condition.value.date_variables(), None);

    let query = verified_query("SELECT Id FROM Account WHERE NumberOfEmployees IN (1, 'a')");
    let where_clause = query.where_clause.as_ref().unwrap();
    assert_eq!(
        only_condition(where_clause).value.literal_type(),
        ListLiteralType::Mixed(vec![LiteralType::Integer, LiteralType::String])
    );

    let query = verified_query("SELECT Id FROM Account WHERE CreatedDate IN (TODAY, LAST_N_DAYS:7)");
    let where_clause = query.where_clause.as_ref().unwrap();
    let condition = only_condition(where_clause);
    assert_eq!(
        condition.value.literal_type(),
        ListLiteralType::Mixed(vec![LiteralType::DateLiteral, LiteralType::DateNLiteral])
    );
    assert_eq!(condition.value.date_variables(), Some(vec![None, Some(7)]));
}

#[test]
fn parse_includes_excludes() {
    let query = verified_query("SELECT Id FROM Contact WHERE Languages__c INCLUDES ('en', 'fr')");
    assert_eq!(
        only_condition(query.where_clause.as_ref().unwrap()).operator,
        ComparisonOperator::Includes
    );

    let query = verified_query("SELECT Id FROM Contact WHERE Languages__c EXCLUDES ('de')");
    assert_eq!(
        only_condition(query.where_clause.as_ref().unwrap()).operator,
        ComparisonOperator::Excludes
    );
}

#[test]
fn parse_not_variants() {
    let query = verified_query("SELECT Id FROM Account WHERE Name NOT IN ('x', 'y')");
    assert_eq!(
        only_condition(query.where_clause.as_ref().unwrap()).operator,
        ComparisonOperator::NotIn
    );

    let query = verified_query("SELECT Id FROM Account WHERE NOT (Name = 'A' AND Industry = 'B')");
    let where_clause = query.where_clause.as_ref().unwrap();
    assert_eq!(where_clause.conditions.len(), 2);
    assert_eq!(
        where_clause.conditions[0].logical_prefix,
        Some(LogicalPrefix::Not)
    );
    assert_eq!(where_clause.conditions[0].open_paren, 1);
    assert_eq!(where_clause.conditions[1].close_paren, 1);
}

#[test]
fn parse_where_in_subquery() {
    let query = verified_query(
        "SELECT Id FROM Account WHERE Id IN (SELECT AccountId FROM Contact WHERE LastName = 'Smith')",
    );
    let condition = only_condition(query.where_clause.as_ref().unwrap());
    match &condition.value {
        ConditionValue::Subquery(subquery) => {
            assert_eq!(subquery.relationship_name, "Contact");
            assert!(subquery.where_clause.is_some());
        }
        other => panic!("expected a subquery value, got {:?}", other),
    }
    assert_eq!(
        condition.value.literal_type(),
        ListLiteralType::Uniform(LiteralType::Subquery)
    );
}

#[test]
fn parse_bind_variables() {
    let query = verified_query("SELECT Id FROM Account WHERE Owner.Name = :ownerName");
    assert_eq!(
        only_condition(query.where_clause.as_ref().unwrap()).value,
        ConditionValue::Literal(LiteralValue {
            raw: ":ownerName".to_string(),
            literal_type: LiteralType::ApexBindVariable,
            date_variable: None,
        })
    );

    // a bare bind variable may follow a set operator with no parentheses
    let query = verified_query("SELECT Id FROM Account WHERE Id IN :accountIds");
    let condition = only_condition(query.where_clause.as_ref().unwrap());
    assert_eq!(condition.operator, ComparisonOperator::In);
    assert_eq!(
        condition.value.literal_type(),
        ListLiteralType::Uniform(LiteralType::ApexBindVariable)
    );
}

#[test]
fn parse_literal_classification() {
    let cases = [
        ("'foo'", LiteralType::String),
        ("5", LiteralType::Integer),
        ("-5", LiteralType::Integer),
        ("0.5", LiteralType::Decimal),
        ("USD5000", LiteralType::IntegerWithCurrencyPrefix),
        ("EUR50.50", LiteralType::DecimalWithCurrencyPrefix),
        ("true", LiteralType::Boolean),
        ("FALSE", LiteralType::Boolean),
        ("2020-01-31", LiteralType::Date),
        ("2020-01-31T23:59:00Z", LiteralType::Datetime),
        ("NULL", LiteralType::Null),
        ("LAST_FISCAL_YEAR", LiteralType::DateLiteral),
        ("N_QUARTERS_AGO:3", LiteralType::DateNLiteral),
        (":boundValue", LiteralType::ApexBindVariable),
    ];
    for (raw, expected) in cases {
        let soql = format!("SELECT Id FROM Account WHERE SomeField__c = {}", raw);
        let query = verified_query(&soql);
        let condition = only_condition(query.where_clause.as_ref().unwrap());
        match &condition.value {
            ConditionValue::Literal(value) => {
                assert_eq!(value.literal_type, expected, "for literal {:?}", raw);
                assert_eq!(value.raw, raw);
            }
            other => panic!("expected a literal for {:?}, got {:?}", raw, other),
        }
    }
}

#[test]
fn parenthesis_counts_balance() {
    let corpus = [
        "SELECT Id FROM Account WHERE Name = 'x'",
        "SELECT Id FROM Account WHERE (Name = 'A' OR Name = 'B') AND Industry != NULL",
        "SELECT Id FROM Account WHERE ((Name = 'A' AND Rating = 'Hot') OR Industry = 'Tech')",
        "SELECT Id FROM Account WHERE NOT (Name = 'A' AND (Rating = 'Hot' OR Rating = 'Warm'))",
        "SELECT COUNT(Id) FROM Account GROUP BY Type HAVING (COUNT(Id) > 5 AND COUNT(Id) < 100)",
    ];
    for soql in corpus {
        let query = verified_query(soql);
        for clause in query
            .where_clause
            .iter()
            .chain(query.group_by.iter().filter_map(|g| g.having.as_ref()))
        {
            assert_eq!(
                clause.total_open_parens(),
                clause.total_close_parens(),
                "unbalanced counts for {:?}",
                soql
            );
        }
    }
}

#[test]
fn round_trip_corpus() {
    let corpus = [
        "SELECT Id FROM Account",
        "SELECT Id, Name, Account.Owner.Name FROM Contact",
        "SELECT a.Id, a.Name FROM Account a",
        "SELECT Id FROM My_NS.Account__c",
        "SELECT Id, (SELECT Id FROM Contacts) FROM Account",
        "SELECT COUNT(Id) FROM Account GROUP BY Type HAVING COUNT(Id) > 5",
        "SELECT Id FROM Account USING SCOPE team WHERE Name LIKE 'A%' LIMIT 10 OFFSET 5",
        "SELECT Id FROM Account WITH SECURITY_ENFORCED",
        "SELECT Id FROM Account WHERE LastActivityDate >= 2020-01-01 AND CreatedDate < 2020-06-01T00:00:00Z",
        "SELECT Id FROM Opportunity WHERE Amount > USD5000",
        "SELECT Id FROM Account WHERE Name != 'foo' ORDER BY Name DESC NULLS LAST LIMIT 100",
        "SELECT Id FROM Account WHERE IsDeleted = false FOR VIEW",
    ];
    for soql in corpus {
        verified_query(soql);
    }
}

#[test]
fn is_query_valid_matches_parse_query() {
    let valid = [
        "SELECT Id FROM Account",
        "SELECT Id FROM Account WHERE Id IN :accountIds",
        "SELECT TYPEOF What WHEN Account THEN Phone ELSE Name END FROM Event",
    ];
    let invalid = [
        "",
        "SELECT",
        "SELECT Id",
        "SELECT Id FROM",
        "SELECT Id Account",
        "SELECT Id FROM Account WHERE",
        "SELECT Id FROM Account WHERE Name =",
        "SELECT Id FROM Account WHERE (Name = 'x'",
        "SELECT Id FROM Account WHERE Name = 'x')",
        "SELECT Id FROM Account WITH Foo",
        "SELECT Id FROM Account LIMIT ten",
        "SELECT Id FROM Account LIMIT 5.5",
        "SELECT Id FROM Account extra garbage",
        "SELECT Id FROM Account WHERE Name = 'unterminated",
    ];
    for soql in valid {
        assert!(is_query_valid(soql), "expected valid: {:?}", soql);
        assert!(parse_query(soql).is_ok());
    }
    for soql in invalid {
        assert!(!is_query_valid(soql), "expected invalid: {:?}", soql);
        assert!(parse_query(soql).is_err());
    }
}

#[test]
fn lexical_errors_carry_location() {
    let result = parse_query("SELECT Id FROM Account WHERE Name = 'unterminated");
    assert_matches!(
        result,
        Err(ParserError::TokenizerError(ref msg)) if msg.contains("Line: 1")
    );

    let result = parse_query("SELECT Id % FROM Account");
    assert_matches!(
        result,
        Err(ParserError::TokenizerError(ref msg)) if msg.contains("Unrecognized character")
    );
}

#[test]
fn syntax_errors_name_the_expected_alternative() {
    let result = parse_query("SELECT Id FROM Account ORDER Name");
    assert_matches!(result, Err(ParserError::ParserError(_)));

    let result = parse_query("SELECT Id FROM Account WHERE Name LIKE");
    assert_matches!(
        result,
        Err(ParserError::ParserError(ref msg)) if msg.contains("Expected")
    );
}

#[test]
fn recursion_limit_guards_nested_subqueries() {
    let result = Parser::new()
        .with_recursion_limit(1)
        .try_with_sql("SELECT Id, (SELECT Id FROM Contacts) FROM Account")
        .unwrap()
        .parse_query();
    assert_eq!(result, Err(ParserError::RecursionLimitExceeded));
}

#[test]
fn continue_if_errors_collects_and_recovers() {
    let soql = "SELECT Id FROM Account WHERE Name = ORDER BY Name";
    assert!(parse_query(soql).is_err());

    let mut parser = Parser::new()
        .with_options(ParserOptions::new().with_continue_if_errors(true))
        .try_with_sql(soql)
        .unwrap();
    let query = parser.parse_query().unwrap();
    assert!(query.where_clause.is_none());
    assert_eq!(query.order_by.len(), 1);
    assert_eq!(parser.errors().len(), 1);
    assert_matches!(parser.errors()[0], ParserError::ParserError(_));
}

#[test]
fn exclude_subqueries_from_fields() {
    let options = ParserOptions::new().with_include_subquery_as_field(false);
    let query =
        parse_query_with_options("SELECT Id, (SELECT Id FROM Contacts) FROM Account", &options)
            .unwrap();
    assert_eq!(query.fields, vec![field("Id")]);

    // a projection that is empty after post-processing is rejected
    let result =
        parse_query_with_options("SELECT (SELECT Id FROM Contacts) FROM Account", &options);
    assert_matches!(result, Err(ParserError::SemanticError(_)));
}

#[test]
fn subqueries_reject_outer_query_clauses() {
    let result = parse_query("SELECT Id, (SELECT Id FROM Contacts USING SCOPE mine) FROM Account");
    assert_matches!(
        result,
        Err(ParserError::ParserError(ref msg)) if msg.contains("USING SCOPE")
    );

    let result = parse_query("SELECT Id, (SELECT Id FROM Contacts FOR VIEW) FROM Account");
    assert_matches!(result, Err(ParserError::ParserError(_)));
}

#[cfg(feature = "serde")]
mod serde_shapes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_variants_are_type_tagged() {
        let query = verified_query("SELECT Id, Account.Name, COUNT(Id) FROM Contact");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["fields"][0]["type"], "Field");
        assert_eq!(json["fields"][1]["type"], "FieldRelationship");
        assert_eq!(json["fields"][1]["rawValue"], "Account.Name");
        assert_eq!(json["fields"][2]["type"], "FieldFunctionExpression");
        assert_eq!(json["fields"][2]["isAggregateFn"], true);
        assert_eq!(json["sObject"], "Contact");
    }

    #[test]
    fn literals_use_the_stable_tag_spellings() {
        let query = verified_query("SELECT Id FROM Account WHERE CreatedDate = LAST_N_DAYS:7");
        let json = serde_json::to_value(&query).unwrap();
        let condition = &json["where"]["conditions"][0];
        assert_eq!(condition["value"]["Literal"]["literalType"], "DATE_N_LITERAL");
        assert_eq!(condition["value"]["Literal"]["dateLiteralVariable"], 7);
        assert_eq!(condition["operator"], "=");
    }
}
