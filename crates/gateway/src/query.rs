//! Table query builder
//!
//! A [`TableQuery`] describes one PostgREST request: the table, the
//! projection, equality/pattern filters, the requested window and how rows
//! and counts should come back. It is plain data so fakes can inspect
//! exactly what a handler asked for.

use std::fmt;

use serde_json::Value;

/// Tables the admin service is allowed to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accounts,
    AccountsMemberships,
    Subscriptions,
    SubscriptionItems,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::AccountsMemberships => "accounts_memberships",
            Self::Subscriptions => "subscriptions",
            Self::SubscriptionItems => "subscription_items",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counting algorithm requested from the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    Exact,
    Planned,
    /// Fast, non-exact count; callers must not rely on precision
    Estimated,
}

impl CountStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Planned => "planned",
            Self::Estimated => "estimated",
        }
    }
}

/// How many rows the caller expects back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Many,
    /// Exactly one row; zero rows is `NotFound`
    Single,
    /// Zero or one row; more is an error
    MaybeSingle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    /// Case-sensitive SQL `LIKE`
    Like,
}

impl FilterOp {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Like => "like",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

/// Description of a single table read or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: Table,
    pub columns: String,
    pub filters: Vec<Filter>,
    /// Inclusive row window `(from, to)`
    pub range: Option<(u64, u64)>,
    pub limit: Option<u64>,
    pub count: Option<CountStrategy>,
    /// Only return the count, no rows
    pub head: bool,
    pub cardinality: Cardinality,
}

impl TableQuery {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            range: None,
            limit: None,
            count: None,
            head: false,
            cardinality: Cardinality::Many,
        }
    }

    /// Set the projection; whitespace outside double quotes is dropped
    pub fn select(mut self, columns: &str) -> Self {
        let mut quoted = false;
        self.columns = columns
            .chars()
            .filter(|c| {
                if *c == '"' {
                    quoted = !quoted;
                }
                quoted || !c.is_whitespace()
            })
            .collect();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.to_string(),
        });
        self
    }

    pub fn like(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Like,
            value: pattern.into(),
        });
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn count(mut self, strategy: CountStrategy) -> Self {
        self.count = Some(strategy);
        self
    }

    pub fn head(mut self) -> Self {
        self.head = true;
        self
    }

    pub fn single(mut self) -> Self {
        self.cardinality = Cardinality::Single;
        self
    }

    pub fn maybe_single(mut self) -> Self {
        self.cardinality = Cardinality::MaybeSingle;
        self
    }

    /// Value of the equality filter on `column`, if any
    pub fn eq_value(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.op == FilterOp::Eq && f.column == column)
            .map(|f| f.value.as_str())
    }

    /// Query-string pairs in PostgREST syntax.
    ///
    /// A range overrides a plain limit, matching how the window is
    /// expressed as `offset` + `limit`.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];

        for filter in &self.filters {
            pairs.push((
                filter.column.clone(),
                format!("{}.{}", filter.op.as_str(), filter.value),
            ));
        }

        match (self.range, self.limit) {
            (Some((from, to)), _) => {
                pairs.push(("offset".to_string(), from.to_string()));
                pairs.push(("limit".to_string(), (to.saturating_sub(from) + 1).to_string()));
            }
            (None, Some(limit)) => pairs.push(("limit".to_string(), limit.to_string())),
            (None, None) => {}
        }

        pairs
    }

    /// `Prefer` header value for a read, if one is needed
    pub fn prefer_header(&self) -> Option<String> {
        self.count.map(|c| format!("count={}", c.as_str()))
    }
}

/// Rows plus the optional count reported by the gateway
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectResponse {
    /// Array for `Many`, object or null for the single-row cardinalities,
    /// null for head requests
    pub rows: Value,
    pub count: Option<u64>,
}

/// Parse the total out of a `Content-Range` header such as `0-9/42` or `*/42`
pub fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
