use std::fmt;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

use crate::datetime::{
  add_days,
  add_months,
  format_day,
  sub_months
};

/// How a filter instance derives its
/// selectable span from "today".
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
pub enum WindowPreset {
  AroundToday,
  FromTomorrow,
  FromToday
}

impl WindowPreset {
  pub fn default_months(self) -> u32 {
    match self {
      | Self::AroundToday => 3,
      | Self::FromTomorrow
      | Self::FromToday => 1
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      | Self::AroundToday => {
        "around_today"
      }
      | Self::FromTomorrow => {
        "from_tomorrow"
      }
      | Self::FromToday => "from_today"
    }
  }
}

impl std::str::FromStr for WindowPreset {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .replace('-', "_")
      .as_str()
    {
      | "around_today" => {
        Ok(Self::AroundToday)
      }
      | "from_tomorrow" => {
        Ok(Self::FromTomorrow)
      }
      | "from_today" => {
        Ok(Self::FromToday)
      }
      | other => {
        Err(anyhow::anyhow!(
          "unknown window preset: \
           {other}"
        ))
      }
    }
  }
}

/// Closed span of selectable days.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct AllowedWindow {
  first:  NaiveDate,
  last:   NaiveDate,
  /// Preset and month count the span was
  /// derived from; `None` for explicit
  /// bounds.
  origin: Option<(WindowPreset, u32)>
}

impl AllowedWindow {
  pub fn from_preset(
    preset: WindowPreset,
    months: u32,
    today: NaiveDate
  ) -> Self {
    let (first, last) = match preset {
      | WindowPreset::AroundToday => {
        (
          sub_months(today, months),
          add_months(today, months)
        )
      }
      | WindowPreset::FromTomorrow => {
        (
          add_days(today, 1),
          add_months(today, months)
        )
      }
      | WindowPreset::FromToday => {
        (
          today,
          add_months(today, months)
        )
      }
    };

    Self {
      first,
      last,
      origin: Some((preset, months))
    }
  }

  /// Explicit bounds, mostly for hosts
  /// that compute their own span. The
  /// bounds are swapped when reversed.
  pub fn between(
    first: NaiveDate,
    last: NaiveDate
  ) -> Self {
    let (first, last) = if first <= last
    {
      (first, last)
    } else {
      (last, first)
    };

    Self {
      first,
      last,
      origin: None
    }
  }

  pub fn first(&self) -> NaiveDate {
    self.first
  }

  pub fn last(&self) -> NaiveDate {
    self.last
  }

  pub fn preset(
    &self
  ) -> Option<WindowPreset> {
    self.origin.map(|(preset, _)| preset)
  }

  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    self.first <= day && day <= self.last
  }

  pub fn limit_message(&self) -> String {
    match self.origin {
      | Some((
        WindowPreset::AroundToday,
        months
      )) => {
        let unit = if months == 1 {
          "month"
        } else {
          "months"
        };
        format!(
          "Date must be within {months} \
           {unit}"
        )
      }
      | Some(_) | None => {
        format!(
          "Date must be between {} and \
           {}",
          format_day(self.first),
          format_day(self.last)
        )
      }
    }
  }
}

impl fmt::Display for AllowedWindow {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}..={}",
      format_day(self.first),
      format_day(self.last)
    )
  }
}
