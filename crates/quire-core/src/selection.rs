use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  trace
};

use crate::datetime::{
  join_days,
  split_days
};
use crate::window::AllowedWindow;

pub const DEFAULT_MAX_SELECTED: usize =
  5;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
  Single,
  Multi,
  Range
}

impl SelectionMode {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Single => "single",
      | Self::Multi => "multi",
      | Self::Range => "range"
    }
  }
}

impl std::str::FromStr for SelectionMode {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str()
    {
      | "single" => Ok(Self::Single),
      | "multi" | "multiple" => {
        Ok(Self::Multi)
      }
      | "range" => Ok(Self::Range),
      | other => {
        Err(anyhow::anyhow!(
          "unknown selection mode: \
           {other}"
        ))
      }
    }
  }
}

/// Inclusive day range. `start == end`
/// means only the anchor click happened.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DayRange {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl DayRange {
  pub fn anchored(
    day: NaiveDate
  ) -> Self {
    Self {
      start: day,
      end:   day
    }
  }

  pub fn spanning(
    a: NaiveDate,
    b: NaiveDate
  ) -> Self {
    Self {
      start: a.min(b),
      end:   a.max(b)
    }
  }

  pub fn is_anchored(&self) -> bool {
    self.start == self.end
  }

  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    self.start <= day && day <= self.end
  }

  pub fn canonical(&self) -> String {
    if self.is_anchored() {
      join_days([self.start])
    } else {
      join_days([self.start, self.end])
    }
  }
}

/// Only one shape is ever live for a
/// selector, picked by its mode.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum DateSelection {
  Days(BTreeSet<NaiveDate>),
  Range(Option<DayRange>)
}

impl DateSelection {
  pub fn empty_for(
    mode: SelectionMode
  ) -> Self {
    match mode {
      | SelectionMode::Single
      | SelectionMode::Multi => {
        Self::Days(BTreeSet::new())
      }
      | SelectionMode::Range => {
        Self::Range(None)
      }
    }
  }

  pub fn is_empty(&self) -> bool {
    match self {
      | Self::Days(days) => days.is_empty(),
      | Self::Range(range) => {
        range.is_none()
      }
    }
  }

  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    match self {
      | Self::Days(days) => {
        days.contains(&day)
      }
      | Self::Range(range) => {
        range.is_some_and(|range| {
          range.contains(day)
        })
      }
    }
  }

  pub fn canonical(&self) -> String {
    match self {
      | Self::Days(days) => {
        join_days(days.iter().copied())
      }
      | Self::Range(Some(range)) => {
        range.canonical()
      }
      | Self::Range(None) => String::new()
    }
  }
}

/// Selection state machine shared by the
/// single, multi and range date filters.
///
/// Every transition returns the canonical
/// string the host must be told about, or
/// `None` when the input was rejected.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct DateRangeSelector {
  mode:         SelectionMode,
  window:       AllowedWindow,
  max_selected: usize,
  selection:    DateSelection
}

impl DateRangeSelector {
  pub fn new(
    mode: SelectionMode,
    window: AllowedWindow,
    max_selected: usize
  ) -> Self {
    Self {
      mode,
      window,
      max_selected: max_selected.max(1),
      selection: DateSelection::empty_for(
        mode
      )
    }
  }

  /// Rebuilds state from a host value.
  /// Invalid and out-of-window parts are
  /// discarded without notice.
  pub fn from_canonical(
    value: &str,
    mode: SelectionMode,
    window: AllowedWindow,
    max_selected: usize
  ) -> Self {
    let mut selector =
      Self::new(mode, window, max_selected);
    selector.load_canonical(value);
    selector
  }

  pub fn load_canonical(
    &mut self,
    value: &str
  ) {
    let days = split_days(value)
      .into_iter()
      .filter(|day| self.window.contains(*day))
      .collect::<Vec<_>>();

    self.selection = match self.mode {
      | SelectionMode::Single => {
        DateSelection::Days(
          days.into_iter().take(1).collect()
        )
      }
      | SelectionMode::Multi => {
        let mut kept = BTreeSet::new();
        for day in days {
          if kept.len() >= self.max_selected
          {
            break;
          }
          kept.insert(day);
        }
        DateSelection::Days(kept)
      }
      | SelectionMode::Range => {
        match days.as_slice() {
          | [] => DateSelection::Range(None),
          | [only] => {
            DateSelection::Range(Some(
              DayRange::anchored(*only)
            ))
          }
          | [a, b, ..] => {
            DateSelection::Range(Some(
              DayRange::spanning(*a, *b)
            ))
          }
        }
      }
    };

    trace!(
      mode = self.mode.as_str(),
      loaded = %self.selection.canonical(),
      "loaded selection from host value"
    );
  }

  pub fn mode(&self) -> SelectionMode {
    self.mode
  }

  pub fn window(&self) -> &AllowedWindow {
    &self.window
  }

  pub fn max_selected(&self) -> usize {
    self.max_selected
  }

  pub fn selection(&self) -> &DateSelection {
    &self.selection
  }

  pub fn is_empty(&self) -> bool {
    self.selection.is_empty()
  }

  pub fn is_disabled(
    &self,
    day: NaiveDate
  ) -> bool {
    !self.window.contains(day)
  }

  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    self.selection.contains(day)
  }

  /// Selected days in ascending order.
  /// For a range only its endpoints.
  pub fn days(&self) -> Vec<NaiveDate> {
    match &self.selection {
      | DateSelection::Days(days) => {
        days.iter().copied().collect()
      }
      | DateSelection::Range(Some(range)) => {
        if range.is_anchored() {
          vec![range.start]
        } else {
          vec![range.start, range.end]
        }
      }
      | DateSelection::Range(None) => {
        Vec::new()
      }
    }
  }

  pub fn range(&self) -> Option<DayRange> {
    match &self.selection {
      | DateSelection::Range(range) => {
        *range
      }
      | DateSelection::Days(_) => None
    }
  }

  pub fn is_range_start(
    &self,
    day: NaiveDate
  ) -> bool {
    self
      .range()
      .is_some_and(|range| range.start == day)
  }

  pub fn is_range_end(
    &self,
    day: NaiveDate
  ) -> bool {
    self
      .range()
      .is_some_and(|range| range.end == day)
  }

  pub fn canonical(&self) -> String {
    self.selection.canonical()
  }

  pub fn select(
    &mut self,
    day: NaiveDate
  ) -> Option<String> {
    if self.is_disabled(day) {
      debug!(
        day = %day,
        window = %self.window,
        "rejected day outside window"
      );
      return None;
    }

    let accepted = match self.mode {
      | SelectionMode::Single => {
        self.select_single(day)
      }
      | SelectionMode::Multi => {
        self.select_multi(day)
      }
      | SelectionMode::Range => {
        self.select_range(day)
      }
    };

    if accepted {
      let canonical = self.canonical();
      debug!(
        mode = self.mode.as_str(),
        selection = %canonical,
        "selection changed"
      );
      Some(canonical)
    } else {
      None
    }
  }

  pub fn clear(&mut self) -> String {
    self.selection =
      DateSelection::empty_for(self.mode);
    debug!(
      mode = self.mode.as_str(),
      "selection cleared"
    );
    String::new()
  }

  /// Re-clicking the selected day is a
  /// no-op, not a second notification.
  fn select_single(
    &mut self,
    day: NaiveDate
  ) -> bool {
    let next = DateSelection::Days(
      BTreeSet::from([day])
    );
    if self.selection == next {
      return false;
    }
    self.selection = next;
    true
  }

  fn select_multi(
    &mut self,
    day: NaiveDate
  ) -> bool {
    let DateSelection::Days(days) =
      &mut self.selection
    else {
      return false;
    };

    if days.remove(&day) {
      return true;
    }

    if days.len() >= self.max_selected {
      debug!(
        day = %day,
        max = self.max_selected,
        "selection full; ignoring day"
      );
      return false;
    }

    days.insert(day);
    true
  }

  fn select_range(
    &mut self,
    day: NaiveDate
  ) -> bool {
    let DateSelection::Range(range) =
      &mut self.selection
    else {
      return false;
    };

    *range = match *range {
      | None => Some(DayRange::anchored(day)),
      | Some(current)
        if current.is_anchored()
          && current.start == day =>
      {
        None
      }
      | Some(current)
        if current.is_anchored() =>
      {
        Some(DayRange::spanning(
          current.start,
          day
        ))
      }
      | Some(_) => {
        Some(DayRange::anchored(day))
      }
    };
    true
  }
}
