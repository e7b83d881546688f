pub mod config;
pub mod date_filter;
pub mod datetime;
pub mod filter;
pub mod keyset;
pub mod provider;
pub mod search;
pub mod selection;
pub mod store;
pub mod window;

pub use config::Config;
pub use date_filter::{
  FilterEvent,
  FilterListener,
  InlineDateFilter,
  RecordingListener,
  SearchOutcome
};
pub use filter::DueFilter;
pub use keyset::{
  ClearOutcome,
  KeySetEditor,
  SaveOutcome
};
pub use provider::Provider;
pub use search::DateFormatList;
pub use selection::{
  DateRangeSelector,
  DateSelection,
  DayRange,
  SelectionMode
};
pub use store::{
  KeyValueStore,
  MemoryStore
};
pub use window::{
  AllowedWindow,
  WindowPreset
};
