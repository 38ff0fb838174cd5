//! Domain types for XIVAPI calls.
//!
//! # Design
//! Everything here is validated on construction and immutable afterwards.
//! Codes that arrive as strings (languages, string algorithms, filter
//! comparisons) parse through `FromStr` into closed enums, failing with the
//! matching `ApiError` precondition variant.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde_json::Number;

use crate::error::ApiError;

/// Response language. XIVAPI serves English, French, German and Japanese.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Fr,
    De,
    Ja,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ja => "ja",
        }
    }
}

impl FromStr for Language {
    type Err = ApiError;

    /// Case-insensitive: `"EN"` and `"en"` are both English.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "ja" => Ok(Language::Ja),
            _ => Err(ApiError::InvalidLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text-matching strategy XIVAPI applies to a search query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringAlgo {
    Custom,
    Wildcard,
    WildcardPlus,
    Fuzzy,
    Term,
    Prefix,
    #[default]
    Match,
    MatchPhrase,
    MatchPhrasePrefix,
    MultiMatch,
    QueryString,
}

impl StringAlgo {
    pub const ALL: [StringAlgo; 11] = [
        StringAlgo::Custom,
        StringAlgo::Wildcard,
        StringAlgo::WildcardPlus,
        StringAlgo::Fuzzy,
        StringAlgo::Term,
        StringAlgo::Prefix,
        StringAlgo::Match,
        StringAlgo::MatchPhrase,
        StringAlgo::MatchPhrasePrefix,
        StringAlgo::MultiMatch,
        StringAlgo::QueryString,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StringAlgo::Custom => "custom",
            StringAlgo::Wildcard => "wildcard",
            StringAlgo::WildcardPlus => "wildcard_plus",
            StringAlgo::Fuzzy => "fuzzy",
            StringAlgo::Term => "term",
            StringAlgo::Prefix => "prefix",
            StringAlgo::Match => "match",
            StringAlgo::MatchPhrase => "match_phrase",
            StringAlgo::MatchPhrasePrefix => "match_phrase_prefix",
            StringAlgo::MultiMatch => "multi_match",
            StringAlgo::QueryString => "query_string",
        }
    }
}

impl FromStr for StringAlgo {
    type Err = ApiError;

    /// Names must match exactly; XIVAPI uses them verbatim as query keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StringAlgo::ALL
            .into_iter()
            .find(|algo| algo.as_str() == s)
            .ok_or_else(|| ApiError::InvalidAlgo(s.to_string()))
    }
}

impl fmt::Display for StringAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric range comparison used by `Filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Gt => "gt",
            Comparison::Gte => "gte",
            Comparison::Lt => "lt",
            Comparison::Lte => "lte",
        }
    }
}

impl FromStr for Comparison {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gt" => Ok(Comparison::Gt),
            "gte" => Ok(Comparison::Gte),
            "lt" => Ok(Comparison::Lt),
            "lte" => Ok(Comparison::Lte),
            _ => Err(ApiError::InvalidFilter(s.to_string())),
        }
    }
}

/// A numeric range filter on one column, e.g. `LevelItem >= 100`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    comparison: Comparison,
    value: Number,
}

impl Filter {
    /// Build a filter from a comparison code (`gt`, `gte`, `lt`, `lte`,
    /// any case).
    pub fn new(
        field: impl Into<String>,
        comparison: &str,
        value: impl Into<Number>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            field: field.into(),
            comparison: comparison.parse()?,
            value: value.into(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn value(&self) -> &Number {
        &self.value
    }
}

/// Single-column sort order for index search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    field: String,
    ascending: bool,
}

impl Sort {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }
}

/// A "named list" parameter: indexes, columns or worlds.
///
/// Duplicate names collapse silently. Joining is in sorted order, which the
/// API ignores but keeps built requests stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet(BTreeSet<String>);

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Comma-joined form used on the wire.
    pub fn join(&self) -> String {
        self.iter().collect::<Vec<_>>().join(",")
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for NameSet {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

impl IntoIterator for NameSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: Into<String>> From<Vec<S>> for NameSet {
    fn from(names: Vec<S>) -> Self {
        names.into_iter().collect()
    }
}

/// Optional extras for a character lookup.
///
/// Each flag adds its short code to the `data` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterOptions {
    pub extended: bool,
    /// `AC`
    pub achievements: bool,
    /// `CJ`
    pub class_jobs: bool,
    /// `FC`
    pub free_company: bool,
    /// `FCM`
    pub free_company_members: bool,
    /// `PVP`
    pub pvp_team: bool,
    pub language: String,
}

impl Default for CharacterOptions {
    fn default() -> Self {
        Self {
            extended: false,
            achievements: false,
            class_jobs: false,
            free_company: false,
            free_company_members: false,
            pvp_team: false,
            language: Language::En.as_str().to_string(),
        }
    }
}

impl CharacterOptions {
    pub(crate) fn data_codes(&self) -> Vec<&'static str> {
        [
            (self.achievements, "AC"),
            (self.class_jobs, "CJ"),
            (self.free_company, "FC"),
            (self.free_company_members, "FCM"),
            (self.pvp_team, "PVP"),
        ]
        .into_iter()
        .filter_map(|(set, code)| set.then_some(code))
        .collect()
    }
}

/// Optional extras for a free company lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeCompanyOptions {
    pub extended: bool,
    /// `FCM`
    pub members: bool,
}

/// Fixed Lodestone reads served by XIVAPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodestoneFeed {
    /// Every category at once; XIVAPI caches this for 15 minutes.
    All,
    News,
    Notices,
    Maintenance,
    Updates,
    WorldStatus,
    DevBlog,
    /// Developer posts from the official forums.
    DevPosts,
    DeepDungeon,
    Feasts,
}

impl LodestoneFeed {
    pub(crate) fn path(&self) -> &'static str {
        match self {
            LodestoneFeed::All => "lodestone",
            LodestoneFeed::News => "lodestone/news",
            LodestoneFeed::Notices => "lodestone/notices",
            LodestoneFeed::Maintenance => "lodestone/maintenance",
            LodestoneFeed::Updates => "lodestone/updates",
            LodestoneFeed::WorldStatus => "lodestone/worldstatus",
            LodestoneFeed::DevBlog => "lodestone/devblog",
            LodestoneFeed::DevPosts => "lodestone/devposts",
            LodestoneFeed::DeepDungeon => "lodestone/deepdungeon",
            LodestoneFeed::Feasts => "lodestone/feasts",
        }
    }
}
