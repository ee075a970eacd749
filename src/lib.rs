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

//! SOQL (Salesforce Object Query Language) parser and AST builder.
//!
//! Parses a SOQL query into a typed [`ast::Query`] value suitable for
//! inspection, transformation, and round-trip rendering back to SOQL via
//! [`std::fmt::Display`]:
//!
//! ```
//! use soql_parser::{is_query_valid, parse_query};
//!
//! let soql = "SELECT Id, Name FROM Account WHERE Name = 'Acme' LIMIT 10";
//! let query = parse_query(soql).unwrap();
//!
//! assert_eq!(query.sobject, "Account");
//! assert_eq!(query.limit, Some(10));
//! // round trip
//! assert_eq!(query.to_string(), soql);
//!
//! assert!(is_query_valid("SELECT Id FROM Account"));
//! assert!(!is_query_valid("SELECT FROM Account"));
//! ```
//!
//! The full surface is covered: nested subqueries, `TYPEOF` projections,
//! `WITH DATA CATEGORY` / `WITH SECURITY_ENFORCED`, `USING SCOPE`,
//! geolocation functions, Apex bind variables, and the relative date
//! literal families.

pub mod ast;
pub mod keywords;
pub mod parser;
pub mod tokenizer;

use ast::Query;
use parser::{Parser, ParserError, ParserOptions};

/// Parse a SOQL query into a [`Query`] with default options.
///
/// ```
/// let query = soql_parser::parse_query("SELECT Id FROM Account").unwrap();
/// assert_eq!(query.sobject, "Account");
/// ```
pub fn parse_query(soql: &str) -> Result<Query, ParserError> {
    Parser::new().try_with_sql(soql)?.parse_query()
}

/// Parse a SOQL query into a [`Query`] with the given [`ParserOptions`].
pub fn parse_query_with_options(
    soql: &str,
    options: &ParserOptions,
) -> Result<Query, ParserError> {
    Parser::new()
        .with_options(options.clone())
        .try_with_sql(soql)?
        .parse_query()
}

/// True iff `soql` parses without errors. Never panics.
///
/// ```
/// assert!(soql_parser::is_query_valid("SELECT Id FROM Account"));
/// assert!(!soql_parser::is_query_valid("SELECT Id Account"));
/// ```
pub fn is_query_valid(soql: &str) -> bool {
    Parser::new()
        .try_with_sql(soql)
        .and_then(|mut parser| parser.parse_query())
        .is_ok()
}
