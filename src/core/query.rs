//! List filtering, sorting and pagination shared by every `find`.
//!
//! A [`ListFilter`] is applied the same way to every resource:
//! creation-time bounds first, then the optional library join (done by the
//! caller), then the sort, then `start`/`end` paging. Without `start` or `end`
//! every matching row is returned in sorted order.
//!
//! `end` is exclusive for every resource: `start=1&end=3` yields two rows.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{EntityTrait, Order, QueryOrder, QuerySelect, Select};
use serde::Deserialize;
use std::str::FromStr;

/// `SQLite` rejects OFFSET without LIMIT, so an open-ended page uses this bound.
const UNBOUNDED: u64 = i64::MAX as u64;

/// Columns that may never be used as a sort key.
const UNSORTABLE: &[&str] = &["password"];

/// Raw list parameters as they arrive in a query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    /// Rows to skip
    pub start: Option<u64>,
    /// Exclusive upper row bound
    pub end: Option<u64>,
    /// Sort direction, ascending unless `false`
    pub asc: Option<bool>,
    /// Column to sort on
    pub sort_by: Option<String>,
    /// Lower creation-time bound (exclusive)
    pub from: Option<String>,
    /// Upper creation-time bound (exclusive)
    pub to: Option<String>,
    /// Restrict to rows associated with this library
    pub library: Option<i64>,
    /// Restrict notes to this author
    pub author: Option<i64>,
}

/// Validated list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Rows to skip after sorting
    pub start: u64,
    /// Exclusive upper row bound; the page size is `end - start`
    pub end: Option<u64>,
    /// Ascending when true
    pub asc: bool,
    /// Column to sort on, defaults to the primary key
    pub sort_by: Option<String>,
    /// Only rows created strictly after this instant
    pub from: Option<DateTime<Utc>>,
    /// Only rows created strictly before this instant
    pub to: Option<DateTime<Utc>>,
    /// Only rows associated with this library
    pub library: Option<i64>,
    /// Only notes written by this user
    pub author: Option<i64>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
            asc: true,
            sort_by: None,
            from: None,
            to: None,
            library: None,
            author: None,
        }
    }
}

impl TryFrom<ListQuery> for ListFilter {
    type Error = Error;

    fn try_from(query: ListQuery) -> Result<Self> {
        let filter = Self {
            start: query.start.unwrap_or(0),
            end: query.end,
            asc: query.asc.unwrap_or(true),
            sort_by: query.sort_by.filter(|s| !s.trim().is_empty()),
            from: query.from.as_deref().map(parse_timestamp).transpose()?,
            to: query.to.as_deref().map(parse_timestamp).transpose()?,
            library: query.library,
            author: query.author,
        };
        filter.check_bounds()?;
        Ok(filter)
    }
}

impl ListFilter {
    /// Same filter restricted to one library.
    #[must_use]
    pub fn in_library(mut self, library_id: i64) -> Self {
        self.library = Some(library_id);
        self
    }

    /// Number of rows a page may hold, if bounded.
    #[must_use]
    pub fn page_size(&self) -> Option<u64> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    fn check_bounds(&self) -> Result<()> {
        match self.end {
            Some(end) if end <= self.start => Err(Error::bad_request(format!(
                "end ({end}) must be greater than start ({})",
                self.start
            ))),
            _ => Ok(()),
        }
    }

    /// Applies sort and paging to a select.
    ///
    /// `default_sort` is used when no `sort_by` was given. An unknown column
    /// name is rejected rather than silently ignored, and so is a secret one.
    pub fn paginate<E>(&self, select: Select<E>, default_sort: E::Column) -> Result<Select<E>>
    where
        E: EntityTrait,
        E::Column: FromStr,
    {
        self.check_bounds()?;

        let column = match self.sort_by.as_deref() {
            Some(name) if UNSORTABLE.contains(&name.trim().to_ascii_lowercase().as_str()) => {
                return Err(Error::bad_request(format!("cannot sort by column '{name}'")));
            }
            Some(name) => E::Column::from_str(name)
                .map_err(|_| Error::bad_request(format!("cannot sort by unknown column '{name}'")))?,
            None => default_sort,
        };
        let order = if self.asc { Order::Asc } else { Order::Desc };
        let mut select = select.order_by(column, order);

        if let Some(size) = self.page_size() {
            select = select.limit(size);
        } else if self.start > 0 {
            select = select.limit(UNBOUNDED);
        }
        if self.start > 0 {
            select = select.offset(self.start);
        }
        Ok(select)
    }
}

/// Parses an RFC 3339 timestamp, a `YYYY-MM-DDTHH:MM:SS` local-less time
/// (taken as UTC) or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(Error::bad_request(format!("'{raw}' is not a valid timestamp")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_defaults() {
        let filter = ListFilter::try_from(ListQuery::default()).unwrap();
        assert_eq!(filter, ListFilter::default());
        assert!(filter.asc);
        assert_eq!(filter.page_size(), None);
    }

    #[test]
    fn test_end_must_exceed_start() {
        let query = ListQuery {
            start: Some(5),
            end: Some(5),
            ..Default::default()
        };
        let result = ListFilter::try_from(query);
        assert!(matches!(result, Err(Error::BadRequest { .. })));
    }

    #[test]
    fn test_page_size_is_exclusive() {
        let query = ListQuery {
            start: Some(1),
            end: Some(3),
            ..Default::default()
        };
        let filter = ListFilter::try_from(query).unwrap();
        assert_eq!(filter.page_size(), Some(2));
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let query = ListQuery {
            from: Some("yesterday-ish".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ListFilter::try_from(query),
            Err(Error::BadRequest { .. })
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2020-03-01T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse_timestamp("2020-03-01T10:30:00").unwrap();
        assert_eq!(naive.hour(), 10);

        let date = parse_timestamp("2020-03-01").unwrap();
        assert_eq!(date.day(), 1);
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_blank_sort_by_is_ignored() {
        let query = ListQuery {
            sort_by: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = ListFilter::try_from(query).unwrap();
        assert_eq!(filter.sort_by, None);
    }
}
