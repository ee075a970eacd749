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

//! SOQL Tokenizer
//!
//! The tokenizer (a.k.a. lexer) converts a string into a sequence of tokens.
//!
//! The tokens then form the input for the parser, which outputs an Abstract
//! Syntax Tree (AST).

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::keywords::{Keyword, ALL_KEYWORDS, ALL_KEYWORDS_INDEX};

/// SOQL token enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Token {
    /// An end-of-file marker, not a real token
    EOF,
    /// A keyword (like SELECT) or an identifier; identifiers may contain
    /// `.` for relationship paths (e.g. `Account.Owner.Name`)
    Word(Word),
    /// A numeric literal, verbatim: optional leading sign, digits, and an
    /// optional fractional part
    Number(String),
    /// An ISO-currency-prefixed numeric literal, e.g. `USD5000` or `EUR50.50`
    Currency(String),
    /// A date literal: `YYYY-MM-DD`
    Date(String),
    /// A datetime literal: `YYYY-MM-DDTHH:MM:SSZ` or with a `+HH:MM`/`-HH:MM`
    /// offset
    DateTime(String),
    /// Single quoted string: i.e: 'string', with backslash escapes preserved
    /// verbatim
    SingleQuotedString(String),
    /// Comma
    Comma,
    /// Whitespace (space, tab, etc)
    Whitespace(Whitespace),
    /// Equality operator `=`
    Eq,
    /// Not Equals operator `!=`
    Neq,
    /// Less Than operator `<`
    Lt,
    /// Greater Than operator `>`
    Gt,
    /// Less Than Or Equals operator `<=`
    LtEq,
    /// Greater Than Or Equals operator `>=`
    GtEq,
    /// Left parenthesis `(`
    LParen,
    /// Right parenthesis `)`
    RParen,
    /// Colon `:` (Apex bind variables and date-N literals)
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::EOF => f.write_str("EOF"),
            Token::Word(ref w) => write!(f, "{}", w),
            Token::Number(ref n) => f.write_str(n),
            Token::Currency(ref c) => f.write_str(c),
            Token::Date(ref d) => f.write_str(d),
            Token::DateTime(ref d) => f.write_str(d),
            Token::SingleQuotedString(ref s) => write!(f, "'{}'", s),
            Token::Comma => f.write_str(","),
            Token::Whitespace(ws) => write!(f, "{}", ws),
            Token::Eq => f.write_str("="),
            Token::Neq => f.write_str("!="),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::LtEq => f.write_str("<="),
            Token::GtEq => f.write_str(">="),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Colon => f.write_str(":"),
        }
    }
}

impl Token {
    pub fn make_word(word: &str) -> Self {
        let word_uppercase = word.to_uppercase();
        Token::Word(Word {
            value: word.to_string(),
            // relationship paths are never keywords
            keyword: if word.contains('.') {
                Keyword::NoKeyword
            } else {
                let keyword = ALL_KEYWORDS.binary_search(&word_uppercase.as_str());
                keyword.map_or(Keyword::NoKeyword, |x| ALL_KEYWORDS_INDEX[x])
            },
        })
    }

    /// True for a number token with a fractional part.
    pub fn is_decimal(&self) -> bool {
        match self {
            Token::Number(n) | Token::Currency(n) => n.contains('.'),
            _ => false,
        }
    }
}

/// A keyword (like SELECT) or an identifier, with case preserved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Word {
    /// The value of the token as written in the query
    pub value: String,
    /// If the word matched one of the known keywords (case-insensitively),
    /// the matching [`Keyword`], otherwise [`Keyword::NoKeyword`]
    pub keyword: Keyword,
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Whitespace {
    Space,
    Newline,
    Tab,
}

impl fmt::Display for Whitespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Whitespace::Space => f.write_str(" "),
            Whitespace::Newline => f.write_str("\n"),
            Whitespace::Tab => f.write_str("\t"),
        }
    }
}

/// Location in input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Line number, starting from 1
    pub line: u64,
    /// Line column, starting from 1
    pub column: u64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line == 0 {
            return Ok(());
        }
        write!(f, " at Line: {}, Column: {}", self.line, self.column)
    }
}

/// A [Token] with [Location] attached to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWithLocation {
    pub token: Token,
    pub location: Location,
}

impl TokenWithLocation {
    pub fn new(token: Token, line: u64, column: u64) -> TokenWithLocation {
        TokenWithLocation {
            token,
            location: Location { line, column },
        }
    }

    pub fn wrap(token: Token) -> TokenWithLocation {
        TokenWithLocation::new(token, 0, 0)
    }
}

impl PartialEq<Token> for TokenWithLocation {
    fn eq(&self, other: &Token) -> bool {
        &self.token == other
    }
}

impl PartialEq<TokenWithLocation> for Token {
    fn eq(&self, other: &TokenWithLocation) -> bool {
        self == &other.token
    }
}

impl fmt::Display for TokenWithLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.token.fmt(f)
    }
}

/// Tokenizer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerError {
    pub message: String,
    pub line: u64,
    pub col: u64,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at Line: {}, Column: {}",
            self.message, self.line, self.col
        )
    }
}

impl std::error::Error for TokenizerError {}

struct State<'a> {
    peekable: Peekable<Chars<'a>>,
    pub line: u64,
    pub col: u64,
}

impl State<'_> {
    pub fn next(&mut self) -> Option<char> {
        match self.peekable.next() {
            None => None,
            Some(s) => {
                if s == '\n' {
                    self.line += 1;
                    self.col = 1;
                } else {
                    self.col += 1;
                }
                Some(s)
            }
        }
    }

    pub fn peek(&mut self) -> Option<&char> {
        self.peekable.peek()
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.col,
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

/// True for words of the shape `USD5000` / `EUR50.50`: a three-letter ISO
/// currency code immediately followed by a number.
fn is_currency_literal(word: &str) -> bool {
    if word.len() < 4 {
        return false;
    }
    let (code, number) = word.split_at(3);
    if !code.chars().all(|ch| ch.is_ascii_uppercase()) {
        return false;
    }
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|ch| ch.is_ascii_digit());
    let mut parts = number.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    all_digits(int_part) && parts.next().map_or(true, all_digits)
}

/// SOQL Tokenizer
pub struct Tokenizer<'a> {
    pub query: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the specified SOQL statement
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// Tokenize the statement and produce a vector of tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TokenizerError> {
        let twl = self.tokenize_with_location()?;
        Ok(twl.into_iter().map(|t| t.token).collect())
    }

    /// Tokenize the statement and produce a vector of tokens with locations
    pub fn tokenize_with_location(&mut self) -> Result<Vec<TokenWithLocation>, TokenizerError> {
        let mut state = State {
            peekable: self.query.chars().peekable(),
            line: 1,
            col: 1,
        };

        let mut tokens: Vec<TokenWithLocation> = vec![];

        let mut location = state.location();
        while let Some(token) = self.next_token(&mut state)? {
            tokens.push(TokenWithLocation { token, location });

            location = state.location();
        }
        Ok(tokens)
    }

    /// Get the next token or return None
    fn next_token(&self, state: &mut State) -> Result<Option<Token>, TokenizerError> {
        match state.peek() {
            Some(&ch) => match ch {
                ' ' => self.consume_and_return(state, Token::Whitespace(Whitespace::Space)),
                '\t' => self.consume_and_return(state, Token::Whitespace(Whitespace::Tab)),
                '\n' => self.consume_and_return(state, Token::Whitespace(Whitespace::Newline)),
                '\r' => {
                    // Emit a single Whitespace::Newline token for \r and \r\n
                    state.next();
                    if let Some('\n') = state.peek() {
                        state.next();
                    }
                    Ok(Some(Token::Whitespace(Whitespace::Newline)))
                }
                // identifier or keyword
                ch if is_identifier_start(ch) => {
                    state.next(); // consume the first char
                    let s = self.tokenize_word(ch, state);
                    if is_currency_literal(&s) {
                        Ok(Some(Token::Currency(s)))
                    } else {
                        Ok(Some(Token::make_word(&s)))
                    }
                }
                // string
                '\'' => {
                    let s = self.tokenize_single_quoted_string(state)?;
                    Ok(Some(Token::SingleQuotedString(s)))
                }
                // number, date, or datetime
                '0'..='9' => {
                    let s = peeking_take_while(state, |ch| ch.is_ascii_digit());
                    if s.len() == 4 && state.peek() == Some(&'-') {
                        return Ok(Some(self.tokenize_date(s, state)?));
                    }
                    Ok(Some(self.finish_number(s, state)?))
                }
                // signed number
                '+' | '-' => {
                    state.next(); // consume the sign
                    let digits = peeking_take_while(state, |ch| ch.is_ascii_digit());
                    if digits.is_empty() {
                        return self.tokenizer_error(state, "Expected a digit after numeric sign");
                    }
                    let mut s = ch.to_string();
                    s.push_str(&digits);
                    Ok(Some(self.finish_number(s, state)?))
                }
                // punctuation
                '(' => self.consume_and_return(state, Token::LParen),
                ')' => self.consume_and_return(state, Token::RParen),
                ',' => self.consume_and_return(state, Token::Comma),
                ':' => self.consume_and_return(state, Token::Colon),
                // operators
                '=' => self.consume_and_return(state, Token::Eq),
                '!' => {
                    state.next(); // consume
                    match state.peek() {
                        Some('=') => self.consume_and_return(state, Token::Neq),
                        _ => self.tokenizer_error(state, "Expected = after !"),
                    }
                }
                '<' => {
                    state.next(); // consume
                    match state.peek() {
                        Some('=') => self.consume_and_return(state, Token::LtEq),
                        _ => Ok(Some(Token::Lt)),
                    }
                }
                '>' => {
                    state.next(); // consume
                    match state.peek() {
                        Some('=') => self.consume_and_return(state, Token::GtEq),
                        _ => Ok(Some(Token::Gt)),
                    }
                }
                other => {
                    self.tokenizer_error(state, &format!("Unrecognized character '{}'", other))
                }
            },
            None => Ok(None),
        }
    }

    fn tokenizer_error<R>(&self, state: &State, message: &str) -> Result<R, TokenizerError> {
        let loc = state.location();
        Err(TokenizerError {
            message: message.to_string(),
            col: loc.column,
            line: loc.line,
        })
    }

    /// Tokenize an identifier or keyword, after the first char is already
    /// consumed.
    fn tokenize_word(&self, first_char: char, state: &mut State) -> String {
        let mut s = first_char.to_string();
        s.push_str(&peeking_take_while(state, is_identifier_part));
        s
    }

    /// Read a single quoted string, starting with the opening quote. Escape
    /// sequences (`\'`, `\\`, ...) are kept verbatim so the literal can be
    /// rendered back exactly as written.
    fn tokenize_single_quoted_string(&self, state: &mut State) -> Result<String, TokenizerError> {
        let mut s = String::new();
        state.next(); // consume the opening quote
        while let Some(&ch) = state.peek() {
            match ch {
                '\'' => {
                    state.next(); // consume
                    return Ok(s);
                }
                '\\' => {
                    state.next(); // consume the backslash
                    s.push('\\');
                    match state.next() {
                        Some(escaped) => s.push(escaped),
                        None => break,
                    }
                }
                _ => {
                    state.next(); // consume
                    s.push(ch);
                }
            }
        }
        self.tokenizer_error(state, "Unterminated string literal")
    }

    /// Complete a numeric literal whose integer digits are already consumed.
    fn finish_number(&self, mut s: String, state: &mut State) -> Result<Token, TokenizerError> {
        if state.peek() == Some(&'.') {
            state.next(); // consume the decimal point
            let fraction = peeking_take_while(state, |ch| ch.is_ascii_digit());
            if fraction.is_empty() {
                return self.tokenizer_error(state, "Expected a digit after decimal point");
            }
            s.push('.');
            s.push_str(&fraction);
        }
        Ok(Token::Number(s))
    }

    /// Tokenize a `YYYY-MM-DD` date, optionally continuing into a
    /// `THH:MM:SSZ` / `THH:MM:SS+HH:MM` datetime. The four year digits are
    /// already consumed.
    fn tokenize_date(&self, year: String, state: &mut State) -> Result<Token, TokenizerError> {
        let mut s = year;
        for _ in 0..2 {
            s.push(self.expect_char(state, '-', "date")?);
            s.push_str(&self.expect_digits(state, 2, "date")?);
        }
        if state.peek().map_or(false, |ch| ch.is_ascii_digit()) {
            return self.tokenizer_error(state, "Malformed date literal");
        }
        if state.peek() != Some(&'T') {
            return Ok(Token::Date(s));
        }
        state.next(); // consume the 'T'
        s.push('T');
        s.push_str(&self.expect_digits(state, 2, "datetime")?);
        for _ in 0..2 {
            s.push(self.expect_char(state, ':', "datetime")?);
            s.push_str(&self.expect_digits(state, 2, "datetime")?);
        }
        match state.peek() {
            Some('Z') => {
                state.next();
                s.push('Z');
            }
            Some(&sign) if sign == '+' || sign == '-' => {
                state.next();
                s.push(sign);
                s.push_str(&self.expect_digits(state, 2, "datetime")?);
                s.push(self.expect_char(state, ':', "datetime")?);
                s.push_str(&self.expect_digits(state, 2, "datetime")?);
            }
            _ => {
                return self
                    .tokenizer_error(state, "Expected Z or a UTC offset in datetime literal")
            }
        }
        Ok(Token::DateTime(s))
    }

    fn expect_char(
        &self,
        state: &mut State,
        expected: char,
        what: &str,
    ) -> Result<char, TokenizerError> {
        match state.peek() {
            Some(&ch) if ch == expected => {
                state.next();
                Ok(ch)
            }
            _ => self.tokenizer_error(state, &format!("Malformed {} literal", what)),
        }
    }

    fn expect_digits(
        &self,
        state: &mut State,
        count: usize,
        what: &str,
    ) -> Result<String, TokenizerError> {
        let mut s = String::new();
        for _ in 0..count {
            match state.peek() {
                Some(&ch) if ch.is_ascii_digit() => {
                    state.next();
                    s.push(ch);
                }
                _ => return self.tokenizer_error(state, &format!("Malformed {} literal", what)),
            }
        }
        Ok(s)
    }

    fn consume_and_return(
        &self,
        state: &mut State,
        t: Token,
    ) -> Result<Option<Token>, TokenizerError> {
        state.next();
        Ok(Some(t))
    }
}

/// Read from `chars` until `predicate` returns `false` or EOF is hit.
/// Return the characters read as String, and keep the first non-matching
/// char available as `chars.next()`.
fn peeking_take_while(state: &mut State, mut predicate: impl FnMut(char) -> bool) -> String {
    let mut s = String::new();
    while let Some(&ch) = state.peek() {
        if predicate(ch) {
            state.next(); // consume
            s.push(ch);
        } else {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_simple_select() {
        let soql = "SELECT Id FROM Account LIMIT 5";
        let mut tokenizer = Tokenizer::new(soql);
        let tokens = tokenizer.tokenize().unwrap();

        let expected = vec![
            Token::make_word("SELECT"),
            Token::Whitespace(Whitespace::Space),
            Token::make_word("Id"),
            Token::Whitespace(Whitespace::Space),
            Token::make_word("FROM"),
            Token::Whitespace(Whitespace::Space),
            Token::make_word("Account"),
            Token::Whitespace(Whitespace::Space),
            Token::make_word("LIMIT"),
            Token::Whitespace(Whitespace::Space),
            Token::Number("5".to_string()),
        ];

        compare(expected, tokens);
    }

    #[test]
    fn tokenize_keywords_case_insensitively() {
        let mut tokenizer = Tokenizer::new("select Id from Account");
        let tokens = tokenizer.tokenize().unwrap();
        match &tokens[0] {
            Token::Word(w) => {
                assert_eq!(w.keyword, Keyword::SELECT);
                assert_eq!(w.value, "select");
            }
            other => panic!("expected a word, got {:?}", other),
        }
    }

    #[test]
    fn tokenize_relationship_path_as_single_word() {
        let mut tokenizer = Tokenizer::new("Account.Owner.Name");
        let tokens = tokenizer.tokenize().unwrap();
        compare(vec![Token::make_word("Account.Owner.Name")], tokens.clone());
        match &tokens[0] {
            Token::Word(w) => assert_eq!(w.keyword, Keyword::NoKeyword),
            other => panic!("expected a word, got {:?}", other),
        }
    }

    #[test]
    fn tokenize_string_predicate() {
        let soql = "WHERE Name != 'Not Provided'";
        let mut tokenizer = Tokenizer::new(soql);
        let tokens = tokenizer.tokenize().unwrap();

        let expected = vec![
            Token::make_word("WHERE"),
            Token::Whitespace(Whitespace::Space),
            Token::make_word("Name"),
            Token::Whitespace(Whitespace::Space),
            Token::Neq,
            Token::Whitespace(Whitespace::Space),
            Token::SingleQuotedString("Not Provided".to_string()),
        ];

        compare(expected, tokens);
    }

    #[test]
    fn tokenize_escaped_string() {
        let mut tokenizer = Tokenizer::new(r"'O\'Brien \\ Co'");
        let tokens = tokenizer.tokenize().unwrap();
        let expected = vec![Token::SingleQuotedString(r"O\'Brien \\ Co".to_string())];
        compare(expected, tokens);
    }

    #[test]
    fn tokenize_unterminated_string_literal() {
        let mut tokenizer = Tokenizer::new("select 'foo");
        assert_eq!(
            tokenizer.tokenize(),
            Err(TokenizerError {
                message: "Unterminated string literal".to_string(),
                line: 1,
                col: 12
            })
        );
    }

    #[test]
    fn tokenize_numbers() {
        let mut tokenizer = Tokenizer::new("1 -5 +7 0.5 -0.5");
        let tokens = tokenizer.tokenize().unwrap();
        let expected = vec![
            Token::Number("1".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::Number("-5".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::Number("+7".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::Number("0.5".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::Number("-0.5".to_string()),
        ];
        compare(expected, tokens);
    }

    #[test]
    fn tokenize_currency_literals() {
        let mut tokenizer = Tokenizer::new("USD5000 EUR50.50");
        let tokens = tokenizer.tokenize().unwrap();
        let expected = vec![
            Token::Currency("USD5000".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::Currency("EUR50.50".to_string()),
        ];
        compare(expected, tokens.clone());
        assert!(!tokens[0].is_decimal());
        assert!(tokens[2].is_decimal());
    }

    #[test]
    fn tokenize_date_and_datetime() {
        let mut tokenizer =
            Tokenizer::new("2020-01-31 2020-01-31T23:59:00Z 2020-01-31T23:59:00+05:30");
        let tokens = tokenizer.tokenize().unwrap();
        let expected = vec![
            Token::Date("2020-01-31".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::DateTime("2020-01-31T23:59:00Z".to_string()),
            Token::Whitespace(Whitespace::Space),
            Token::DateTime("2020-01-31T23:59:00+05:30".to_string()),
        ];
        compare(expected, tokens);
    }

    #[test]
    fn tokenize_malformed_date() {
        let mut tokenizer = Tokenizer::new("2020-1-01");
        assert!(matches!(
            tokenizer.tokenize(),
            Err(TokenizerError { message, .. }) if message.contains("Malformed date")
        ));
    }

    #[test]
    fn tokenize_date_n_literal_parts() {
        let mut tokenizer = Tokenizer::new("LAST_N_DAYS:30");
        let tokens = tokenizer.tokenize().unwrap();
        let expected = vec![
            Token::make_word("LAST_N_DAYS"),
            Token::Colon,
            Token::Number("30".to_string()),
        ];
        compare(expected, tokens);
    }

    #[test]
    fn tokenize_unrecognized_character() {
        let mut tokenizer = Tokenizer::new("SELECT Id; FROM Account");
        assert_eq!(
            tokenizer.tokenize(),
            Err(TokenizerError {
                message: "Unrecognized character ';'".to_string(),
                line: 1,
                col: 10
            })
        );
    }

    #[test]
    fn tokenize_location_tracking() {
        let mut tokenizer = Tokenizer::new("SELECT Id\nFROM Account");
        let tokens = tokenizer.tokenize_with_location().unwrap();
        let expected = vec![
            TokenWithLocation::new(Token::make_word("SELECT"), 1, 1),
            TokenWithLocation::new(Token::Whitespace(Whitespace::Space), 1, 7),
            TokenWithLocation::new(Token::make_word("Id"), 1, 8),
            TokenWithLocation::new(Token::Whitespace(Whitespace::Newline), 1, 10),
            TokenWithLocation::new(Token::make_word("FROM"), 2, 1),
            TokenWithLocation::new(Token::Whitespace(Whitespace::Space), 2, 5),
            TokenWithLocation::new(Token::make_word("Account"), 2, 6),
        ];
        assert_eq!(expected, tokens);
    }

    fn compare(expected: Vec<Token>, actual: Vec<Token>) {
        assert_eq!(expected, actual);
    }
}
