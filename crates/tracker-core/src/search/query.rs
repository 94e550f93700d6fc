//! Query mini-language
//!
//! A raw query is split on whitespace. Tokens shaped like `key:value` with a
//! known key are structured filter clauses; every other token is a free-text
//! term. The only clause kind today is `type:<uuid>`, which may repeat.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::WorkItemTypeId;

static CLAUSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z][a-z_]*):(.*)$").expect("Invalid regex"));

/// Set of type identifiers named explicitly in a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilterSet(BTreeSet<WorkItemTypeId>);

impl TypeFilterSet {
    /// Create an empty filter set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add an identifier; returns false if it was already present
    pub fn insert(&mut self, id: WorkItemTypeId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: &WorkItemTypeId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Identifiers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &WorkItemTypeId> {
        self.0.iter()
    }

    /// Set union of two filter sets
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }
}

impl FromIterator<WorkItemTypeId> for TypeFilterSet {
    fn from_iter<I: IntoIterator<Item = WorkItemTypeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TypeFilterSet {
    type Item = &'a WorkItemTypeId;
    type IntoIter = std::collections::btree_set::Iter<'a, WorkItemTypeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A query split into free-text terms and structured filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    terms: Vec<String>,
    type_filters: TypeFilterSet,
}

impl ParsedQuery {
    /// Free-text terms in order of first appearance
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Types named by `type:` clauses
    pub const fn type_filters(&self) -> &TypeFilterSet {
        &self.type_filters
    }

    /// True when the query carries neither terms nor filters
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.type_filters.is_empty()
    }
}

/// A recognised filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Type(WorkItemTypeId),
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Term(&'a str),
    Clause(Clause),
    /// Known clause key with an unusable value
    Malformed { key: &'a str, value: &'a str },
}

fn classify(token: &str) -> Token<'_> {
    let Some(captures) = CLAUSE_PATTERN.captures(token) else {
        return Token::Term(token);
    };
    let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) else {
        return Token::Term(token);
    };
    let (key, value) = (key.as_str(), value.as_str());

    match key {
        "type" => value.parse().map_or(Token::Malformed { key, value }, |id| {
            Token::Clause(Clause::Type(id))
        }),
        _ => Token::Term(token),
    }
}

/// Parse a raw query string
///
/// Never fails: malformed clauses are dropped and an empty input yields an
/// empty query. Control characters separate tokens like whitespace does.
pub fn parse(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();

    let tokens = raw
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|token| !token.is_empty());

    for token in tokens {
        match classify(token) {
            Token::Term(term) => {
                if !query.terms.iter().any(|existing| existing == term) {
                    query.terms.push(term.to_string());
                }
            }
            Token::Clause(Clause::Type(id)) => {
                query.type_filters.insert(id);
            }
            Token::Malformed { key, value } => {
                tracing::debug!(key, value, "Dropping malformed filter clause");
            }
        }
    }

    query
}
