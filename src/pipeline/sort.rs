//! Sort stage: stable ordering by one field in either direction.
use crate::model::Record;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ascending: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ascending,
            SortDirection::Descending => ascending.reverse(),
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// The active sort field and direction. An empty key keeps input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortDirective {
    pub key: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self { key: key.into(), direction }
    }

    /// Directive that results from the user requesting a sort on `field`.
    ///
    /// Re-requesting the active ascending column flips it to descending;
    /// anything else sorts `field` ascending.
    pub fn requested(&self, field: &str) -> Self {
        let direction = if self.key == field && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self::new(field, direction)
    }

    /// Compare two records under this directive, without a tie-break.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let asc = a.field_or_empty(&self.key).compare(&b.field_or_empty(&self.key));
        self.direction.apply(asc)
    }
}

/// Stable sort of `records` by `directive`.
///
/// Each element is decorated with its input position, which breaks ties in
/// ascending order regardless of direction. Stability therefore holds even
/// though the underlying sort is unstable.
pub fn sort<R: Record + Clone>(records: &[R], directive: &SortDirective) -> Vec<R> {
    let mut decorated: Vec<(usize, crate::model::FieldValue, &R)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r.field_or_empty(&directive.key), r))
        .collect();
    decorated.sort_unstable_by(|(ia, ka, _), (ib, kb, _)| {
        directive.direction.apply(ka.compare(kb)).then(ia.cmp(ib))
    });
    decorated.into_iter().map(|(_, _, r)| r.clone()).collect()
}
