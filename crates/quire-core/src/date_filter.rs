use chrono::NaiveDate;
use tracing::debug;

use crate::config::DateFilterConfig;
use crate::search::DateFormatList;
use crate::selection::{
  DateRangeSelector,
  SelectionMode
};
use crate::window::AllowedWindow;

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum FilterEvent {
  Toggled(bool),
  Selected(String)
}

/// Receives host notifications. Called
/// synchronously, once per accepted
/// transition and never for rejected ones.
pub trait FilterListener {
  fn emit(&mut self, event: FilterEvent);
}

impl<F> FilterListener for F
where
  F: FnMut(FilterEvent)
{
  fn emit(&mut self, event: FilterEvent) {
    self(event);
  }
}

/// Listener that keeps every event, for
/// hosts that replay or inspect them.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
  pub events: Vec<FilterEvent>
}

impl FilterListener for RecordingListener {
  fn emit(&mut self, event: FilterEvent) {
    self.events.push(event);
  }
}

/// Outcome of a keystroke in the search
/// box.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum SearchOutcome {
  Disabled,
  Blank,
  Unrecognized,
  OutOfWindow(String),
  Rejected(NaiveDate),
  Applied(String)
}

/// Inline due-date filter: activation
/// toggle, day picker and search box over
/// one [`DateRangeSelector`].
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct InlineDateFilter {
  active:         bool,
  selector:       DateRangeSelector,
  formats:        DateFormatList,
  search_enabled: bool,
  search_input:   String,
  search_error:   Option<String>
}

impl InlineDateFilter {
  pub fn new(
    selector: DateRangeSelector,
    formats: DateFormatList,
    search_enabled: bool
  ) -> Self {
    Self {
      active: false,
      selector,
      formats,
      search_enabled,
      search_input: String::new(),
      search_error: None
    }
  }

  pub fn from_config(
    config: &DateFilterConfig,
    today: NaiveDate
  ) -> Self {
    Self::new(
      config.selector(today),
      config.search_formats.clone(),
      config.search_enabled
    )
  }

  /// Adopts the host's props without
  /// notifying it back.
  pub fn sync(
    &mut self,
    active: bool,
    value: &str
  ) {
    self.active = active;
    self.selector.load_canonical(value);
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn selector(
    &self
  ) -> &DateRangeSelector {
    &self.selector
  }

  pub fn mode(&self) -> SelectionMode {
    self.selector.mode()
  }

  pub fn window(&self) -> &AllowedWindow {
    self.selector.window()
  }

  pub fn value(&self) -> String {
    self.selector.canonical()
  }

  pub fn search_enabled(&self) -> bool {
    self.search_enabled
  }

  pub fn search_input(&self) -> &str {
    &self.search_input
  }

  pub fn search_error(
    &self
  ) -> Option<&str> {
    self.search_error.as_deref()
  }

  pub fn toggle(
    &mut self,
    activated: bool,
    listener: &mut impl FilterListener
  ) {
    self.active = activated;
    debug!(activated, "date filter toggled");
    listener
      .emit(FilterEvent::Toggled(activated));
  }

  pub fn select_day(
    &mut self,
    day: NaiveDate,
    listener: &mut impl FilterListener
  ) -> bool {
    let Some(canonical) =
      self.selector.select(day)
    else {
      return false;
    };

    self.reset_search();
    listener
      .emit(FilterEvent::Selected(canonical));
    true
  }

  pub fn search(
    &mut self,
    text: &str,
    listener: &mut impl FilterListener
  ) -> SearchOutcome {
    if !self.search_enabled {
      return SearchOutcome::Disabled;
    }

    self.search_input = text.to_string();
    self.search_error = None;

    if text.trim().is_empty() {
      return SearchOutcome::Blank;
    }

    let Some(day) = self.formats.parse(text)
    else {
      return SearchOutcome::Unrecognized;
    };

    if self.selector.is_disabled(day) {
      let message =
        self.window().limit_message();
      self.search_error =
        Some(message.clone());
      debug!(
        day = %day,
        "search date outside window"
      );
      return SearchOutcome::OutOfWindow(
        message
      );
    }

    if self.select_day(day, listener) {
      SearchOutcome::Applied(self.value())
    } else {
      SearchOutcome::Rejected(day)
    }
  }

  pub fn clear(
    &mut self,
    listener: &mut impl FilterListener
  ) {
    let canonical = self.selector.clear();
    self.reset_search();
    listener
      .emit(FilterEvent::Selected(canonical));
  }

  fn reset_search(&mut self) {
    self.search_input.clear();
    self.search_error = None;
  }
}
