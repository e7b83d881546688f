use chrono::{
  Datelike,
  Duration,
  Months,
  NaiveDate
};

pub const CANONICAL_DAY_FORMAT: &str =
  "%Y-%m-%d";

#[must_use]
pub fn format_day(
  day: NaiveDate
) -> String {
  day
    .format(CANONICAL_DAY_FORMAT)
    .to_string()
}

pub fn parse_day(
  raw: &str
) -> Option<NaiveDate> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  NaiveDate::parse_from_str(
    trimmed,
    CANONICAL_DAY_FORMAT
  )
  .ok()
}

/// Joins days into the comma separated
/// `yyyy-MM-dd` form handed to hosts.
pub fn join_days<I>(days: I) -> String
where
  I: IntoIterator<Item = NaiveDate>
{
  days
    .into_iter()
    .map(format_day)
    .collect::<Vec<_>>()
    .join(",")
}

/// Splits a canonical string, silently
/// dropping parts that are not valid
/// days. Order of the input is kept.
pub fn split_days(
  raw: &str
) -> Vec<NaiveDate> {
  raw
    .split(',')
    .filter_map(parse_day)
    .collect()
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

pub fn add_months(
  date: NaiveDate,
  months: u32
) -> NaiveDate {
  date
    .checked_add_months(Months::new(
      months
    ))
    .unwrap_or(NaiveDate::MAX)
}

pub fn sub_months(
  date: NaiveDate,
  months: u32
) -> NaiveDate {
  date
    .checked_sub_months(Months::new(
      months
    ))
    .unwrap_or(NaiveDate::MIN)
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn month_of(
  day: NaiveDate
) -> NaiveDate {
  first_day_of_month(
    day.year(),
    day.month()
  )
}

#[must_use]
pub fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn split_days_drops_garbage() {
    let days = split_days(
      "2024-02-10, nope,,2024-13-01,\
       2024-02-05"
    );
    assert_eq!(
      days,
      vec![
        day(2024, 2, 10),
        day(2024, 2, 5)
      ]
    );
  }

  #[test]
  fn month_arithmetic_clamps_to_month_end()
  {
    assert_eq!(
      add_months(day(2024, 1, 31), 1),
      day(2024, 2, 29)
    );
    assert_eq!(
      sub_months(day(2024, 5, 31), 3),
      day(2024, 2, 29)
    );
  }

  #[test]
  fn join_days_uses_canonical_format() {
    assert_eq!(
      join_days([
        day(2024, 2, 5),
        day(2024, 2, 10)
      ]),
      "2024-02-05,2024-02-10"
    );
    assert_eq!(
      join_days(Vec::new()),
      ""
    );
  }
}
