use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::datetime::split_days;
use crate::selection::{
  DayRange,
  SelectionMode
};

/// Due-date predicate built from the
/// canonical string a date filter emits.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum DueFilter {
  Any,
  OnDays(BTreeSet<NaiveDate>),
  Within(DayRange)
}

impl DueFilter {
  pub fn parse(
    mode: SelectionMode,
    canonical: &str
  ) -> Self {
    let days = split_days(canonical);
    if days.is_empty() {
      return Self::Any;
    }

    match mode {
      | SelectionMode::Single
      | SelectionMode::Multi => {
        Self::OnDays(
          days.into_iter().collect()
        )
      }
      | SelectionMode::Range => {
        let first = days[0];
        let second =
          days.get(1).copied().unwrap_or(first);
        Self::Within(DayRange::spanning(
          first, second
        ))
      }
    }
  }

  pub fn is_any(&self) -> bool {
    matches!(self, Self::Any)
  }

  pub fn matches(
    &self,
    due: Option<NaiveDate>
  ) -> bool {
    match (self, due) {
      | (Self::Any, _) => true,
      | (_, None) => false,
      | (Self::OnDays(days), Some(due)) => {
        days.contains(&due)
      }
      | (Self::Within(range), Some(due)) => {
        range.contains(due)
      }
    }
  }

  pub fn retain<'a, T, F>(
    &self,
    items: &'a [T],
    due_of: F
  ) -> Vec<&'a T>
  where
    F: Fn(&T) -> Option<NaiveDate>
  {
    items
      .iter()
      .filter(|item| {
        self.matches(due_of(item))
      })
      .collect()
  }
}
