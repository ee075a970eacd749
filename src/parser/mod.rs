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

//! SOQL Parser
//!
//! A hand-written recursive-descent parser over the token stream produced
//! by [`crate::tokenizer::Tokenizer`], building the typed AST of
//! [`crate::ast`] in a single pass.

use std::fmt;

use log::debug;

use crate::ast::Query;
use crate::keywords::Keyword;
use crate::tokenizer::{Token, TokenWithLocation, Tokenizer, TokenizerError};

mod expr;
mod select;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    TokenizerError(String),
    ParserError(String),
    /// Grammar-legal input produced a structurally impossible AST, e.g. a
    /// projection list that is empty after post-processing
    SemanticError(String),
    RecursionLimitExceeded,
}

// Use `Parser::expected` instead, if possible
macro_rules! parser_err {
    ($MSG:expr, $loc:expr) => {
        Err(ParserError::ParserError(format!("{}{}", $MSG, $loc)))
    };
}

pub(crate) use parser_err;

mod recursion {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::ParserError;

    /// Tracks remaining recursion depth. This value is decremented on
    /// each call to [`RecursionCounter::try_decrease()`], when it reaches 0 an
    /// error will be returned.
    ///
    /// Note: Uses an [`std::rc::Rc`] and [`std::cell::Cell`] in order to
    /// satisfy the Rust borrow checker so the automatic [`DepthGuard`]
    /// decrement a reference to the counter.
    pub(crate) struct RecursionCounter {
        remaining_depth: Rc<Cell<usize>>,
    }

    impl RecursionCounter {
        /// Creates a [`RecursionCounter`] with the specified maximum
        /// depth
        pub fn new(remaining_depth: usize) -> Self {
            Self {
                remaining_depth: Rc::new(remaining_depth.into()),
            }
        }

        /// Decreases the remaining depth by 1.
        ///
        /// Returns [`Err`] if the remaining depth falls to 0.
        ///
        /// Returns a [`DepthGuard`] which will adds 1 to the
        /// remaining depth upon drop;
        pub fn try_decrease(&self) -> Result<DepthGuard, ParserError> {
            let old_value = self.remaining_depth.get();
            // ran out of space
            if old_value == 0 {
                Err(ParserError::RecursionLimitExceeded)
            } else {
                self.remaining_depth.set(old_value - 1);
                Ok(DepthGuard::new(Rc::clone(&self.remaining_depth)))
            }
        }
    }

    /// Guard that increases the remaining depth by 1 on drop
    pub struct DepthGuard {
        remaining_depth: Rc<Cell<usize>>,
    }

    impl DepthGuard {
        fn new(remaining_depth: Rc<Cell<usize>>) -> Self {
            Self { remaining_depth }
        }
    }

    impl Drop for DepthGuard {
        fn drop(&mut self) {
            let old_value = self.remaining_depth.get();
            self.remaining_depth.set(old_value + 1);
        }
    }
}

use recursion::RecursionCounter;

impl From<TokenizerError> for ParserError {
    fn from(e: TokenizerError) -> Self {
        ParserError::TokenizerError(e.to_string())
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "soql parser error: {}",
            match self {
                ParserError::TokenizerError(s) => s,
                ParserError::ParserError(s) => s,
                ParserError::SemanticError(s) => s,
                ParserError::RecursionLimitExceeded => "recursion limit exceeded",
            }
        )
    }
}

impl std::error::Error for ParserError {}

// By default, allow queries nested up to this deep before erroring
const DEFAULT_REMAINING_DEPTH: usize = 50;

/// Options that control how the [`Parser`] parses SOQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Collect syntax errors in optional clauses instead of failing,
    /// resynchronize at the next clause keyword, and return the best-effort
    /// AST. Collected errors are available through [`Parser::errors`].
    pub continue_if_errors: bool,
    /// When false, subquery projection items are parsed and validated but
    /// omitted from the resulting field list.
    pub include_subquery_as_field: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            continue_if_errors: false,
            include_subquery_as_field: true,
        }
    }
}

impl ParserOptions {
    /// Create a new [`ParserOptions`]
    pub fn new() -> Self {
        Default::default()
    }

    /// Set whether parsing continues past recoverable syntax errors.
    pub fn with_continue_if_errors(mut self, continue_if_errors: bool) -> Self {
        self.continue_if_errors = continue_if_errors;
        self
    }

    /// Set whether subquery projections appear in the field list.
    pub fn with_include_subquery_as_field(mut self, include: bool) -> Self {
        self.include_subquery_as_field = include;
        self
    }
}

pub struct Parser {
    tokens: Vec<TokenWithLocation>,
    /// The index of the first unprocessed token in [`Parser::tokens`].
    index: usize,
    /// Additional options that control parsing behavior.
    options: ParserOptions,
    /// Syntax errors collected while parsing with
    /// [`ParserOptions::continue_if_errors`].
    errors: Vec<ParserError>,
    /// Ensure the stack does not overflow by limiting recursion depth.
    recursion_counter: RecursionCounter,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with default options.
    ///
    /// See also [`Parser::try_with_sql`].
    ///
    /// Example:
    /// ```
    /// # use soql_parser::parser::{Parser, ParserError};
    /// # fn main() -> Result<(), ParserError> {
    /// let query = Parser::new()
    ///     .try_with_sql("SELECT Id FROM Account")?
    ///     .parse_query()?;
    /// assert_eq!(query.sobject, "Account");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Self {
        Self {
            tokens: vec![],
            index: 0,
            options: ParserOptions::new(),
            errors: vec![],
            recursion_counter: RecursionCounter::new(DEFAULT_REMAINING_DEPTH),
        }
    }

    /// Specify the maximum recursion limit while parsing.
    ///
    /// [`Parser`] prevents stack overflows by returning
    /// [`ParserError::RecursionLimitExceeded`] if the parser exceeds this
    /// depth while processing the query.
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_counter = RecursionCounter::new(recursion_limit);
        self
    }

    /// Specify additional parser options ([`ParserOptions`]).
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Reset this parser to parse the specified token stream
    pub fn with_tokens_with_locations(mut self, tokens: Vec<TokenWithLocation>) -> Self {
        self.tokens = tokens;
        self.index = 0;
        self
    }

    /// Reset this parser state to parse the specified tokens
    pub fn with_tokens(self, tokens: Vec<Token>) -> Self {
        // Put in dummy locations
        let tokens_with_locations: Vec<TokenWithLocation> =
            tokens.into_iter().map(TokenWithLocation::wrap).collect();
        self.with_tokens_with_locations(tokens_with_locations)
    }

    /// Tokenize the SOQL string and set this [`Parser`]'s state to parse
    /// the resulting tokens.
    ///
    /// Returns an error if there was an error tokenizing the string.
    pub fn try_with_sql(self, soql: &str) -> Result<Self, ParserError> {
        debug!("Parsing soql '{}'...", soql);
        let tokens = Tokenizer::new(soql).tokenize_with_location()?;
        Ok(self.with_tokens_with_locations(tokens))
    }

    /// Parse a complete query, expecting the whole token stream to be
    /// consumed.
    ///
    /// With [`ParserOptions::continue_if_errors`], syntax errors in optional
    /// clauses are recorded in [`Parser::errors`] and a best-effort [`Query`]
    /// is returned instead.
    pub fn parse_query(&mut self) -> Result<Query, ParserError> {
        let query = self.parse_select_statement()?;
        if self.peek_token() != Token::EOF {
            if let Err(error) = self.expected::<()>("end of statement", self.peek_token()) {
                if !self.options.continue_if_errors {
                    return Err(error);
                }
                self.errors.push(error);
            }
        }
        Ok(query)
    }

    /// The syntax errors collected so far when parsing with
    /// [`ParserOptions::continue_if_errors`].
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Return the first non-whitespace token that has not yet been
    /// processed (or [`Token::EOF`] if reached end-of-file)
    pub fn peek_token(&self) -> TokenWithLocation {
        self.peek_nth_token(0)
    }

    /// Return nth non-whitespace token that has not yet been processed
    pub fn peek_nth_token(&self, mut n: usize) -> TokenWithLocation {
        let mut index = self.index;
        loop {
            index += 1;
            match self.tokens.get(index - 1) {
                Some(TokenWithLocation {
                    token: Token::Whitespace(_),
                    location: _,
                }) => continue,
                non_whitespace => {
                    if n == 0 {
                        return non_whitespace
                            .cloned()
                            .unwrap_or_else(|| TokenWithLocation::wrap(Token::EOF));
                    }
                    n -= 1;
                }
            }
        }
    }

    /// Return the first non-whitespace token that has not yet been
    /// processed and mark it as processed. OK to call repeatedly after
    /// reaching EOF.
    pub fn next_token(&mut self) -> TokenWithLocation {
        loop {
            self.index += 1;
            match self.tokens.get(self.index - 1) {
                Some(TokenWithLocation {
                    token: Token::Whitespace(_),
                    location: _,
                }) => continue,
                token => {
                    return token
                        .cloned()
                        .unwrap_or_else(|| TokenWithLocation::wrap(Token::EOF))
                }
            }
        }
    }

    /// Push back the last one non-whitespace token. Must be called after
    /// `next_token()`, otherwise might panic. OK to call after
    /// `next_token()` indicates an EOF.
    pub fn prev_token(&mut self) {
        loop {
            assert!(self.index > 0);
            self.index -= 1;
            if let Some(TokenWithLocation {
                token: Token::Whitespace(_),
                location: _,
            }) = self.tokens.get(self.index)
            {
                continue;
            }
            return;
        }
    }

    /// Report `found` was encountered instead of `expected`
    pub fn expected<T>(&self, expected: &str, found: TokenWithLocation) -> Result<T, ParserError> {
        parser_err!(
            format!("Expected: {}, found: {}", expected, found),
            found.location
        )
    }

    /// If the current token is the `expected` keyword, consume it and
    /// returns true. Otherwise, no tokens are consumed and returns false.
    #[must_use]
    pub fn parse_keyword(&mut self, expected: Keyword) -> bool {
        match self.peek_token().token {
            Token::Word(w) if expected == w.keyword => {
                self.next_token();
                true
            }
            _ => false,
        }
    }

    /// If the current and subsequent tokens exactly match the `keywords`
    /// sequence, consume them and returns true. Otherwise, no tokens are
    /// consumed and returns false
    #[must_use]
    pub fn parse_keywords(&mut self, keywords: &[Keyword]) -> bool {
        let index = self.index;
        for &keyword in keywords {
            if !self.parse_keyword(keyword) {
                // reset index and return immediately
                self.index = index;
                return false;
            }
        }
        true
    }

    /// If the current token is one of the given `keywords`, consume the
    /// token and return the keyword that matches. Otherwise, no tokens are
    /// consumed and returns [`None`].
    #[must_use]
    pub fn parse_one_of_keywords(&mut self, keywords: &[Keyword]) -> Option<Keyword> {
        match self.peek_token().token {
            Token::Word(w) => keywords
                .iter()
                .find(|keyword| **keyword == w.keyword)
                .map(|keyword| {
                    self.next_token();
                    *keyword
                }),
            _ => None,
        }
    }

    /// If the current token is one of the expected keywords, consume the
    /// token and return the keyword that matches. Otherwise, return an
    /// error.
    pub fn expect_one_of_keywords(&mut self, keywords: &[Keyword]) -> Result<Keyword, ParserError> {
        if let Some(keyword) = self.parse_one_of_keywords(keywords) {
            Ok(keyword)
        } else {
            let keywords: Vec<String> = keywords.iter().map(|x| format!("{:?}", x)).collect();
            self.expected(
                &format!("one of {}", keywords.join(" or ")),
                self.peek_token(),
            )
        }
    }

    /// If the current token is the `expected` keyword, consume the token.
    /// Otherwise, return an error.
    pub fn expect_keyword(&mut self, expected: Keyword) -> Result<(), ParserError> {
        if self.parse_keyword(expected) {
            Ok(())
        } else {
            self.expected(format!("{:?}", &expected).as_str(), self.peek_token())
        }
    }

    /// True when the current token is the given keyword; consumes nothing.
    pub fn peek_keyword(&self, expected: Keyword) -> bool {
        matches!(self.peek_token().token, Token::Word(w) if w.keyword == expected)
    }

    /// Consume the next token if it matches the expected token, otherwise
    /// return false
    #[must_use]
    pub fn consume_token(&mut self, expected: &Token) -> bool {
        if self.peek_token() == *expected {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Bail out if the current token is not an expected token, or consume
    /// it if it is
    pub fn expect_token(&mut self, expected: &Token) -> Result<(), ParserError> {
        if self.consume_token(expected) {
            Ok(())
        } else {
            self.expected(&expected.to_string(), self.peek_token())
        }
    }

    /// Parse a comma-separated list of 1+ items accepted by `F`
    pub fn parse_comma_separated<T, F>(&mut self, mut f: F) -> Result<Vec<T>, ParserError>
    where
        F: FnMut(&mut Parser) -> Result<T, ParserError>,
    {
        let mut values = vec![];
        loop {
            values.push(f(self)?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        Ok(values)
    }

    /// Parse a keyword-separated list of 1+ items accepted by `F`
    pub fn parse_keyword_separated<T, F>(
        &mut self,
        keyword: Keyword,
        mut f: F,
    ) -> Result<Vec<T>, ParserError>
    where
        F: FnMut(&mut Parser) -> Result<T, ParserError>,
    {
        let mut values = vec![];
        loop {
            values.push(f(self)?);
            if !self.parse_keyword(keyword) {
                break;
            }
        }
        Ok(values)
    }

    /// Run a parser method `f`, reverting back to the current position if
    /// unsuccessful.
    #[must_use]
    pub fn maybe_parse<T, F>(&mut self, mut f: F) -> Option<T>
    where
        F: FnMut(&mut Parser) -> Result<T, ParserError>,
    {
        let index = self.index;
        if let Ok(t) = f(self) {
            Some(t)
        } else {
            self.index = index;
            None
        }
    }

    /// Parse an identifier (or any bare word)
    pub fn parse_identifier(&mut self) -> Result<String, ParserError> {
        let next_token = self.next_token();
        match next_token.token {
            Token::Word(w) => Ok(w.value),
            _ => self.expected("an identifier", next_token),
        }
    }

    /// Parse an unsigned integer literal, e.g. a `LIMIT` or `OFFSET` value
    pub fn parse_literal_uint(&mut self) -> Result<u32, ParserError> {
        let next_token = self.next_token();
        match &next_token.token {
            Token::Number(n) if !n.contains('.') && !n.starts_with('+') && !n.starts_with('-') => {
                n.parse::<u32>().map_err(|e| {
                    ParserError::ParserError(format!(
                        "Could not parse '{}' as u32: {}{}",
                        n, e, next_token.location
                    ))
                })
            }
            _ => self.expected("a non-negative integer", next_token),
        }
    }

    /// Run a clause parser, recording the error and resynchronizing at the
    /// next clause boundary when
    /// [`ParserOptions::continue_if_errors`] is set. Only plain syntax
    /// errors are recoverable.
    fn recover_clause<T, F>(&mut self, f: F) -> Result<Option<T>, ParserError>
    where
        F: FnOnce(&mut Parser) -> Result<T, ParserError>,
    {
        let index = self.index;
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(error @ ParserError::ParserError(_)) if self.options.continue_if_errors => {
                self.errors.push(error);
                // rescan from the clause start, so a clause keyword the
                // failed parse already consumed is still found
                self.index = index;
                self.resync_to_clause_boundary();
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Skip tokens until something that can plausibly start or follow a
    /// clause: a clause keyword, a closing parenthesis (the end of an
    /// enclosing subquery), or EOF.
    fn resync_to_clause_boundary(&mut self) {
        loop {
            match self.peek_token().token {
                Token::EOF | Token::RParen => return,
                Token::Word(w)
                    if matches!(
                        w.keyword,
                        Keyword::WHERE
                            | Keyword::WITH
                            | Keyword::GROUP
                            | Keyword::ORDER
                            | Keyword::LIMIT
                            | Keyword::OFFSET
                            | Keyword::FOR
                            | Keyword::UPDATE
                    ) =>
                {
                    return
                }
                _ => {
                    self.next_token();
                }
            }
        }
    }
}
