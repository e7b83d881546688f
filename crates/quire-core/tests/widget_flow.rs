use chrono::NaiveDate;
use quire_core::config::Config;
use quire_core::store::read_string_list;
use quire_core::{
    AllowedWindow, DateRangeSelector, DueFilter, FilterEvent, InlineDateFilter, KeySetEditor,
    KeyValueStore, MemoryStore, Provider, RecordingListener, SaveOutcome, SelectionMode,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn key_dialog_save_reload_and_clear() {
    let config = Config::embedded();
    let mut store = MemoryStore::new();
    store.set("openai_api_key", "sk-legacy").expect("seed legacy key");
    store.set("nvidia_api_key", "nv-legacy").expect("seed legacy key");

    let mut editor = KeySetEditor::new(&mut store, config.keys.clone());
    editor.load();
    editor.update_entry(Provider::OpenRouter, 0, "sk-or-v1-a");
    assert!(editor.add_entry(Provider::OpenRouter));
    editor.update_entry(Provider::OpenRouter, 1, "sk-or-v1-b");
    editor.update_entry(Provider::Groq, 0, "gsk_x");
    assert_eq!(editor.total_active(), 3);
    assert_eq!(editor.save(), SaveOutcome::Saved { total: 3 });
    drop(editor);

    assert!(!store.contains_key("openai_api_key"));
    assert!(!store.contains_key("nvidia_api_key"));
    assert_eq!(
        read_string_list(&store, "openrouter_api_keys").expect("read"),
        Some(vec!["sk-or-v1-a".to_string(), "sk-or-v1-b".to_string()])
    );

    let mut reopened = KeySetEditor::new(&mut store, config.keys.clone());
    reopened.load();
    assert!(reopened.is_expanded(Provider::OpenRouter));
    assert!(reopened.is_expanded(Provider::Groq));
    assert!(!reopened.is_expanded(Provider::OpenAi));
    assert_eq!(reopened.entries(Provider::OpenRouter).len(), 2);

    reopened.clear();
    drop(reopened);
    assert!(store.is_empty());
}

#[test]
fn range_filter_emits_sorted_pair() {
    let window = AllowedWindow::between(day(2024, 1, 1), day(2024, 4, 1));
    let mut filter = InlineDateFilter::new(
        DateRangeSelector::new(SelectionMode::Range, window, 5),
        Config::default().date_filter.search_formats,
        true,
    );
    let mut listener = RecordingListener::default();

    filter.select_day(day(2024, 2, 10), &mut listener);
    filter.select_day(day(2024, 2, 5), &mut listener);

    assert_eq!(
        listener.events.last(),
        Some(&FilterEvent::Selected("2024-02-05,2024-02-10".to_string()))
    );

    let due = DueFilter::parse(SelectionMode::Range, &filter.value());
    assert!(due.matches(Some(day(2024, 2, 7))));
    assert!(!due.matches(Some(day(2024, 2, 4))));
}

#[test]
fn multi_filter_toggles_back_out() {
    let window = AllowedWindow::between(day(2024, 1, 1), day(2024, 4, 1));
    let mut filter = InlineDateFilter::new(
        DateRangeSelector::new(SelectionMode::Multi, window, 5),
        Default::default(),
        false,
    );
    let mut listener = RecordingListener::default();

    for picked in [day(2024, 2, 1), day(2024, 2, 3), day(2024, 2, 1)] {
        filter.select_day(picked, &mut listener);
    }

    assert_eq!(listener.events.len(), 3);
    assert_eq!(filter.value(), "2024-02-03");
}

#[test]
fn configured_filter_uses_window_from_today() {
    let config = Config::from_toml_str(
        "[date_filter]\nmode = \"multi\"\nwindow = \"from_today\"\nwindow_months = 1\n",
    )
    .expect("parse config");
    let today = day(2024, 1, 15);
    let mut filter = InlineDateFilter::from_config(&config.date_filter, today);
    let mut listener = RecordingListener::default();

    assert!(!filter.select_day(day(2024, 1, 14), &mut listener));
    assert!(!filter.select_day(day(2024, 2, 16), &mut listener));
    assert!(filter.select_day(today, &mut listener));
    assert!(filter.select_day(day(2024, 2, 15), &mut listener));
    assert_eq!(filter.value(), "2024-01-15,2024-02-15");
    assert_eq!(listener.events.len(), 2);
}
