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

#![allow(dead_code)]

use soql_parser::ast::*;
use soql_parser::{is_query_valid, parse_query};

/// Parse `soql`, asserting that it is valid and that the AST renders back
/// to exactly the input text.
pub fn verified_query(soql: &str) -> Query {
    let query = parse_query(soql).unwrap_or_else(|e| panic!("could not parse {:?}: {}", soql, e));
    assert_eq!(soql, query.to_string(), "round trip failed");
    assert!(is_query_valid(soql));
    query
}

/// An empty query skeleton; tests fill in the parts they assert on.
pub fn base_query(sobject: &str) -> Query {
    Query {
        fields: vec![],
        sobject: sobject.to_string(),
        sobject_alias: None,
        sobject_prefix: vec![],
        using_scope: None,
        where_clause: None,
        with_security_enforced: false,
        with_data_category: None,
        group_by: None,
        order_by: vec![],
        limit: None,
        offset: None,
        for_clause: None,
        update_clause: None,
    }
}

pub fn field(name: &str) -> FieldType {
    FieldType::Field(Field {
        field: name.to_string(),
        object_prefix: None,
        alias: None,
    })
}

pub fn prefixed_field(prefix: &str, name: &str) -> FieldType {
    FieldType::Field(Field {
        field: name.to_string(),
        object_prefix: Some(prefix.to_string()),
        alias: None,
    })
}

pub fn string_literal(raw: &str) -> ConditionValue {
    ConditionValue::Literal(LiteralValue {
        raw: raw.to_string(),
        literal_type: LiteralType::String,
        date_variable: None,
    })
}

/// The single condition of a `WHERE`/`HAVING` clause.
pub fn only_condition(clause: &WhereClause) -> &Condition {
    assert_eq!(clause.conditions.len(), 1);
    assert!(clause.connectives.is_empty());
    &clause.conditions[0]
}
