use anyhow::Context;
use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  info,
  warn
};

use crate::provider::Provider;
use crate::search::DateFormatList;
use crate::selection::{
  DEFAULT_MAX_SELECTED,
  DateRangeSelector,
  SelectionMode
};
use crate::window::{
  AllowedWindow,
  WindowPreset
};

pub const DEFAULT_CONFIG_TOML: &str =
  include_str!("../assets/quire.toml");

pub const DEFAULT_MAX_KEYS: usize = 5;

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct Config {
  pub version:     u32,
  pub keys:        KeysConfig,
  pub date_filter: DateFilterConfig
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct KeysConfig {
  pub max_per_provider: usize,
  pub default_provider: Provider
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct DateFilterConfig {
  pub mode:           SelectionMode,
  pub window:         WindowPreset,
  pub window_months:  u32,
  pub max_selected:   usize,
  pub search_enabled: bool,
  pub search_formats: DateFormatList
}

impl Default for Config {
  fn default() -> Self {
    Self {
      version:     1,
      keys:        KeysConfig::default(),
      date_filter:
        DateFilterConfig::default()
    }
  }
}

impl Default for KeysConfig {
  fn default() -> Self {
    Self {
      max_per_provider: DEFAULT_MAX_KEYS,
      default_provider:
        Provider::OpenRouter
    }
  }
}

impl Default for DateFilterConfig {
  fn default() -> Self {
    Self {
      mode:           SelectionMode::Single,
      window:         WindowPreset::AroundToday,
      window_months:  WindowPreset::AroundToday
        .default_months(),
      max_selected:   DEFAULT_MAX_SELECTED,
      search_enabled: true,
      search_formats:
        DateFormatList::default()
    }
  }
}

impl Config {
  /// The configuration compiled into the
  /// crate. Never fails: a broken asset
  /// degrades to the built-in defaults.
  pub fn embedded() -> Self {
    match Self::from_toml_str(
      DEFAULT_CONFIG_TOML
    ) {
      | Ok(config) => config,
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed parsing embedded config; using defaults"
        );
        Self::default()
      }
    }
  }

  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Config>(raw)
        .context(
          "failed parsing quire config"
        )?;
    config.sanitize();
    info!(
      version = config.version,
      mode = config.date_filter.mode.as_str(),
      window = config.date_filter.window.as_str(),
      "loaded quire config"
    );
    Ok(config)
  }

  pub fn sanitize(&mut self) {
    if self.keys.max_per_provider == 0 {
      warn!(
        "keys.max_per_provider was 0; \
         restoring default"
      );
      self.keys.max_per_provider =
        DEFAULT_MAX_KEYS;
    }

    let filter = &mut self.date_filter;
    if filter.window_months == 0 {
      warn!(
        "date_filter.window_months was \
         0; restoring preset default"
      );
      filter.window_months =
        filter.window.default_months();
    }
    if filter.max_selected == 0 {
      warn!(
        "date_filter.max_selected was 0; \
         restoring default"
      );
      filter.max_selected =
        DEFAULT_MAX_SELECTED;
    }
    if filter.search_formats.is_empty() {
      warn!(
        "date_filter.search_formats was \
         empty; restoring defaults"
      );
      filter.search_formats =
        DateFormatList::default();
    }
  }
}

impl DateFilterConfig {
  pub fn allowed_window(
    &self,
    today: NaiveDate
  ) -> AllowedWindow {
    AllowedWindow::from_preset(
      self.window,
      self.window_months,
      today
    )
  }

  pub fn selector(
    &self,
    today: NaiveDate
  ) -> DateRangeSelector {
    DateRangeSelector::new(
      self.mode,
      self.allowed_window(today),
      self.max_selected
    )
  }
}
