use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

/// `MM/dd/yyyy`, `yyyy-MM-dd`,
/// `MM-dd-yyyy`, `dd/MM/yyyy`, in the
/// order they are tried.
pub const DEFAULT_SEARCH_FORMATS: [&str;
  4] = [
  "%m/%d/%Y",
  "%Y-%m-%d",
  "%m-%d-%Y",
  "%d/%m/%Y"
];

/// Ordered chrono formats used to read
/// free-text date input. The first
/// format that yields a real calendar
/// day wins.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct DateFormatList {
  formats: Vec<String>
}

impl Default for DateFormatList {
  fn default() -> Self {
    Self {
      formats: DEFAULT_SEARCH_FORMATS
        .iter()
        .map(|fmt| (*fmt).to_string())
        .collect()
    }
  }
}

impl DateFormatList {
  pub fn new<I, S>(formats: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>
  {
    Self {
      formats: formats
        .into_iter()
        .map(Into::into)
        .filter(|fmt: &String| {
          !fmt.trim().is_empty()
        })
        .collect()
    }
  }

  pub fn formats(&self) -> &[String] {
    &self.formats
  }

  pub fn is_empty(&self) -> bool {
    self.formats.is_empty()
  }

  pub fn parse(
    &self,
    input: &str
  ) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return None;
    }

    self.formats.iter().find_map(|fmt| {
      match NaiveDate::parse_from_str(
        trimmed, fmt
      ) {
        | Ok(day) => {
          tracing::trace!(
            input = %trimmed,
            format = %fmt,
            "search input matched format"
          );
          Some(day)
        }
        | Err(_) => None
      }
    })
  }
}
