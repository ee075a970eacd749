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

//! SOQL keywords.
//!
//! Keywords are matched case-insensitively by the tokenizer: every
//! unquoted, undotted word is looked up in the sorted [`ALL_KEYWORDS`]
//! table and, when found, tagged with the corresponding [`Keyword`]
//! variant. Date literals (`TODAY`, `LAST_FISCAL_YEAR`, ...) and the
//! heads of parameterized date-N literals (`LAST_N_DAYS`, ...) are
//! keywords too; the parser classifies them via the curated subsets at
//! the bottom of this module.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defines a string constant for a single keyword: `kw_def!(SELECT);`
/// expands to `pub const SELECT = "SELECT";`
macro_rules! kw_def {
    ($ident:ident = $string_keyword:expr) => {
        pub const $ident: &'static str = $string_keyword;
    };
    ($ident:ident) => {
        kw_def!($ident = stringify!($ident));
    };
}

/// Expands to a [`Keyword`] enum with a variant per keyword, a string
/// constant per keyword, and two parallel tables: `ALL_KEYWORDS`
/// (sorted strings, used for binary search by the tokenizer) and
/// `ALL_KEYWORDS_INDEX` (the matching enum variants).
macro_rules! define_keywords {
    ($(
        $ident:ident $(= $string_keyword:expr)?
    ),* $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[allow(non_camel_case_types)]
        pub enum Keyword {
            NoKeyword,
            $($ident),*
        }

        pub const ALL_KEYWORDS_INDEX: &[Keyword] = &[
            $(Keyword::$ident),*
        ];

        $(kw_def!($ident $(= $string_keyword)?);)*

        pub const ALL_KEYWORDS: &[&str] = &[
            $($ident),*
        ];
    };
}

// The following keywords MUST be in alphabetical order for the
// tokenizer's binary search to work.
define_keywords!(
    ABOVE,
    ABOVE_OR_BELOW,
    AND,
    AS,
    ASC,
    AT,
    AVG,
    BELOW,
    BY,
    CALENDAR_MONTH,
    CALENDAR_QUARTER,
    CALENDAR_YEAR,
    CATEGORY,
    CONVERT_CURRENCY,
    COUNT,
    COUNT_DISTINCT,
    CUBE,
    DATA,
    DAY_IN_MONTH,
    DAY_IN_WEEK,
    DAY_IN_YEAR,
    DAY_ONLY,
    DELEGATED,
    DESC,
    DISTANCE,
    ELSE,
    END,
    EVERYTHING,
    EXCLUDES,
    FALSE,
    FIRST,
    FISCAL_MONTH,
    FISCAL_QUARTER,
    FISCAL_YEAR,
    FOR,
    FORMAT,
    FROM,
    GEOLOCATION,
    GROUP,
    GROUPING,
    HAVING,
    HOUR_IN_DAY,
    IN,
    INCLUDES,
    LAST,
    LAST_90_DAYS,
    LAST_FISCAL_QUARTER,
    LAST_FISCAL_YEAR,
    LAST_MONTH,
    LAST_N_DAYS,
    LAST_N_FISCAL_QUARTERS,
    LAST_N_FISCAL_YEARS,
    LAST_N_MONTHS,
    LAST_N_QUARTERS,
    LAST_N_WEEKS,
    LAST_N_YEARS,
    LAST_QUARTER,
    LAST_WEEK,
    LAST_YEAR,
    LIKE,
    LIMIT,
    MAX,
    MIN,
    MINE,
    MINE_AND_MY_GROUPS,
    MY_TEAM_TERRITORY,
    MY_TERRITORY,
    NEXT_90_DAYS,
    NEXT_FISCAL_QUARTER,
    NEXT_FISCAL_YEAR,
    NEXT_MONTH,
    NEXT_N_DAYS,
    NEXT_N_FISCAL_QUARTERS,
    NEXT_N_FISCAL_YEARS,
    NEXT_N_MONTHS,
    NEXT_N_QUARTERS,
    NEXT_N_WEEKS,
    NEXT_N_YEARS,
    NEXT_QUARTER,
    NEXT_WEEK,
    NEXT_YEAR,
    NOT,
    NULL,
    NULLS,
    N_DAYS_AGO,
    N_FISCAL_QUARTERS_AGO,
    N_FISCAL_YEARS_AGO,
    N_MONTHS_AGO,
    N_QUARTERS_AGO,
    N_WEEKS_AGO,
    N_YEARS_AGO,
    OFFSET,
    OR,
    ORDER,
    REFERENCE,
    ROLLUP,
    SCOPE,
    SECURITY_ENFORCED,
    SELECT,
    SUM,
    TEAM,
    THEN,
    THIS_FISCAL_QUARTER,
    THIS_FISCAL_YEAR,
    THIS_MONTH,
    THIS_QUARTER,
    THIS_WEEK,
    THIS_YEAR,
    TODAY,
    TOLABEL,
    TOMORROW,
    TRACKING,
    TRUE,
    TYPEOF,
    UPDATE,
    USING,
    VIEW,
    VIEWSTAT,
    WEEK_IN_MONTH,
    WEEK_IN_YEAR,
    WHEN,
    WHERE,
    WITH,
    YESTERDAY
);

/// Functions that aggregate over grouped rows.
pub const AGGREGATE_FUNCTIONS: &[Keyword] = &[
    Keyword::AVG,
    Keyword::COUNT,
    Keyword::COUNT_DISTINCT,
    Keyword::MAX,
    Keyword::MIN,
    Keyword::SUM,
];

/// Fixed relative-date literals, e.g. `WHERE CreatedDate = LAST_WEEK`.
pub const DATE_LITERALS: &[Keyword] = &[
    Keyword::YESTERDAY,
    Keyword::TODAY,
    Keyword::TOMORROW,
    Keyword::LAST_WEEK,
    Keyword::THIS_WEEK,
    Keyword::NEXT_WEEK,
    Keyword::LAST_MONTH,
    Keyword::THIS_MONTH,
    Keyword::NEXT_MONTH,
    Keyword::LAST_90_DAYS,
    Keyword::NEXT_90_DAYS,
    Keyword::THIS_QUARTER,
    Keyword::LAST_QUARTER,
    Keyword::NEXT_QUARTER,
    Keyword::THIS_YEAR,
    Keyword::LAST_YEAR,
    Keyword::NEXT_YEAR,
    Keyword::THIS_FISCAL_QUARTER,
    Keyword::LAST_FISCAL_QUARTER,
    Keyword::NEXT_FISCAL_QUARTER,
    Keyword::THIS_FISCAL_YEAR,
    Keyword::LAST_FISCAL_YEAR,
    Keyword::NEXT_FISCAL_YEAR,
];

/// Heads of parameterized relative-date literals; each is followed by
/// `:` and an unsigned integer, e.g. `LAST_N_DAYS:30`.
pub const DATE_N_LITERALS: &[Keyword] = &[
    Keyword::NEXT_N_DAYS,
    Keyword::LAST_N_DAYS,
    Keyword::N_DAYS_AGO,
    Keyword::NEXT_N_WEEKS,
    Keyword::LAST_N_WEEKS,
    Keyword::N_WEEKS_AGO,
    Keyword::NEXT_N_MONTHS,
    Keyword::LAST_N_MONTHS,
    Keyword::N_MONTHS_AGO,
    Keyword::NEXT_N_QUARTERS,
    Keyword::LAST_N_QUARTERS,
    Keyword::N_QUARTERS_AGO,
    Keyword::NEXT_N_YEARS,
    Keyword::LAST_N_YEARS,
    Keyword::N_YEARS_AGO,
    Keyword::NEXT_N_FISCAL_QUARTERS,
    Keyword::LAST_N_FISCAL_QUARTERS,
    Keyword::N_FISCAL_QUARTERS_AGO,
    Keyword::NEXT_N_FISCAL_YEARS,
    Keyword::LAST_N_FISCAL_YEARS,
    Keyword::N_FISCAL_YEARS_AGO,
];

/// Every keyword that can head a function invocation.
pub const FUNCTION_KEYWORDS: &[Keyword] = &[
    Keyword::AVG,
    Keyword::CALENDAR_MONTH,
    Keyword::CALENDAR_QUARTER,
    Keyword::CALENDAR_YEAR,
    Keyword::CONVERT_CURRENCY,
    Keyword::COUNT,
    Keyword::COUNT_DISTINCT,
    Keyword::CUBE,
    Keyword::DAY_IN_MONTH,
    Keyword::DAY_IN_WEEK,
    Keyword::DAY_IN_YEAR,
    Keyword::DAY_ONLY,
    Keyword::DISTANCE,
    Keyword::FISCAL_MONTH,
    Keyword::FISCAL_QUARTER,
    Keyword::FISCAL_YEAR,
    Keyword::FORMAT,
    Keyword::GEOLOCATION,
    Keyword::GROUPING,
    Keyword::HOUR_IN_DAY,
    Keyword::MAX,
    Keyword::MIN,
    Keyword::ROLLUP,
    Keyword::SUM,
    Keyword::TOLABEL,
    Keyword::WEEK_IN_MONTH,
    Keyword::WEEK_IN_YEAR,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        let mut sorted = ALL_KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ALL_KEYWORDS);
    }

    #[test]
    fn keyword_tables_are_parallel() {
        assert_eq!(ALL_KEYWORDS.len(), ALL_KEYWORDS_INDEX.len());
        let select = ALL_KEYWORDS.binary_search(&"SELECT").unwrap();
        assert_eq!(ALL_KEYWORDS_INDEX[select], Keyword::SELECT);
        let last = ALL_KEYWORDS.binary_search(&"LAST_N_DAYS").unwrap();
        assert_eq!(ALL_KEYWORDS_INDEX[last], Keyword::LAST_N_DAYS);
    }
}
