//! Search criteria and their normalisation into independent predicates.

use time::Date;

/// Raw search input as received from the caller. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub author: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub keyword: Option<String>,
    pub text: Option<String>,
}

#[allow(dead_code)]
impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn from_date(mut self, from: Date) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to_date(mut self, to: Date) -> Self {
        self.to = Some(to);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl SearchCriteria {
    /// The predicates actually supplied, in a fixed order.
    ///
    /// Blank strings count as absent. At most one date predicate is produced
    /// even when both bounds are present.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(author) = non_blank(&self.author) {
            predicates.push(Predicate::Author(author));
        }
        if let Some(range) = DateRange::from_bounds(self.from, self.to) {
            predicates.push(Predicate::Date(range));
        }
        if let Some(keyword) = non_blank(&self.keyword) {
            predicates.push(Predicate::Keyword(keyword));
        }
        if let Some(text) = non_blank(&self.text) {
            predicates.push(Predicate::Text(text));
        }

        predicates
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
}

/// One independently evaluated search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Author(String),
    Date(DateRange),
    Keyword(String),
    Text(String),
}

/// Inclusive date bounds. Exactly one variant applies per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Between(Date, Date),
    From(Date),
    Until(Date),
}

impl DateRange {
    pub fn from_bounds(from: Option<Date>, to: Option<Date>) -> Option<Self> {
        match (from, to) {
            (Some(from), Some(to)) => Some(Self::Between(from, to)),
            (Some(from), None) => Some(Self::From(from)),
            (None, Some(to)) => Some(Self::Until(to)),
            (None, None) => None,
        }
    }
}
