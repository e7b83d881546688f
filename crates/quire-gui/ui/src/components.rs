mod api_key_dialog;
mod calendar_grid;
mod inline_date_filter;

pub use api_key_dialog::ApiKeyDialog;
pub use inline_date_filter::InlineDateFilter;
