use std::io::Write;

use anyhow::{Context, anyhow, bail};
use chrono::NaiveDate;
use quire_core::datetime::{format_day, parse_day, today};
use quire_core::keyset::{FAILOVER_NOTICE, masked};
use quire_core::{
    Config, DueFilter, FilterEvent, InlineDateFilter, KeySetEditor, KeyValueStore, Provider,
    SearchOutcome,
};
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::cli::{DatesCommand, FilterArgs, KeysCommand};

#[tracing::instrument(skip_all)]
pub fn run_keys<S, W>(
    store: S,
    config: &Config,
    action: KeysCommand,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    let mut editor = KeySetEditor::new(store, config.keys.clone());
    editor.load();

    match action {
        KeysCommand::List { reveal } => list_keys(&editor, reveal, out)?,
        KeysCommand::Set { provider, keys } => {
            let max = editor.config().max_per_provider;
            if keys.len() > max {
                bail!("{provider} accepts at most {max} keys, got {}", keys.len());
            }
            while editor.can_remove(provider) {
                let last = editor.entries(provider).len() - 1;
                editor.remove_entry(provider, last);
            }
            for (index, key) in keys.into_iter().enumerate() {
                if index > 0 {
                    editor.add_entry(provider);
                }
                editor.update_entry(provider, index, key);
            }
            report_save(&mut editor, out)?;
        }
        KeysCommand::Add { provider, key } => {
            let blank = editor
                .entries(provider)
                .iter()
                .position(|value| value.trim().is_empty());
            let index = match blank {
                Some(index) => index,
                None if editor.add_entry(provider) => editor.entries(provider).len() - 1,
                None => bail!(
                    "{provider} already holds {} keys",
                    editor.config().max_per_provider
                ),
            };
            editor.update_entry(provider, index, key);
            report_save(&mut editor, out)?;
        }
        KeysCommand::Remove { provider, position } => {
            let len = editor.entries(provider).len();
            let index = position
                .checked_sub(1)
                .filter(|index| *index < len)
                .ok_or_else(|| anyhow!("{provider} has no key at position {position}"))?;
            if !editor.remove_entry(provider, index) {
                // The last slot stays; blanking it drops the key on save.
                editor.update_entry(provider, index, String::new());
            }
            report_save(&mut editor, out)?;
        }
        KeysCommand::Clear => {
            let outcome = editor.clear();
            writeln!(out, "{}: {}", outcome.title(), outcome.description())?;
        }
    }

    Ok(())
}

fn list_keys<S, W>(editor: &KeySetEditor<S>, reveal: bool, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    let label_width = Provider::DISPLAY_ORDER
        .iter()
        .map(|provider| provider.label().width())
        .max()
        .unwrap_or(0);

    for provider in Provider::DISPLAY_ORDER {
        let label = provider.label();
        let pad = " ".repeat(label_width.saturating_sub(label.width()));
        let marker = if editor.is_expanded(provider) { "v" } else { ">" };
        writeln!(
            out,
            "{marker} {label}{pad}  {} key(s)  ({}/{})",
            editor.active_count(provider),
            editor.entries(provider).len(),
            editor.config().max_per_provider
        )?;

        if !editor.is_expanded(provider) {
            continue;
        }
        for (index, value) in editor.entries(provider).iter().enumerate() {
            let shown = if value.trim().is_empty() {
                format!("<{} {}>", provider.placeholder(), index + 1)
            } else if reveal {
                value.clone()
            } else {
                masked(value)
            };
            writeln!(out, "    {}. {shown}", index + 1)?;
        }
    }

    writeln!(out, "total: {}", editor.total_active())?;
    writeln!(out, "{FAILOVER_NOTICE}")?;
    Ok(())
}

fn report_save<S, W>(editor: &mut KeySetEditor<S>, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    let outcome = editor.save();
    writeln!(out, "{}: {}", outcome.title(), outcome.description())?;
    Ok(())
}

fn build_filter(config: &Config, args: &FilterArgs) -> InlineDateFilter {
    let mut settings = config.date_filter.clone();
    if let Some(mode) = args.mode {
        settings.mode = mode;
    }
    if let Some(window) = args.window {
        settings.window = window;
        settings.window_months = window.default_months();
    }
    if let Some(months) = args.months.filter(|months| *months > 0) {
        settings.window_months = months;
    }

    let today = args.today.unwrap_or_else(today);
    let mut filter = InlineDateFilter::from_config(&settings, today);
    filter.sync(true, &args.value);
    debug!(
        mode = settings.mode.as_str(),
        window = %filter.window(),
        value = %filter.value(),
        "built date filter"
    );
    filter
}

fn print_event<W: Write>(out: &mut W, event: FilterEvent) -> std::io::Result<()> {
    match event {
        FilterEvent::Toggled(active) => writeln!(out, "toggle: {active}"),
        FilterEvent::Selected(value) if value.is_empty() => writeln!(out, "select: <none>"),
        FilterEvent::Selected(value) => writeln!(out, "select: {value}"),
    }
}

#[tracing::instrument(skip_all)]
pub fn run_dates<W>(config: &Config, action: DatesCommand, out: &mut W) -> anyhow::Result<()>
where
    W: Write,
{
    match action {
        DatesCommand::Pick { filter: args, days } => {
            let mut filter = build_filter(config, &args);
            let mut events = Vec::new();
            for raw in days {
                let mut listener = |event: FilterEvent| events.push(event);
                if raw.trim().eq_ignore_ascii_case("clear") {
                    filter.clear(&mut listener);
                } else {
                    let day = parse_day(&raw)
                        .with_context(|| format!("not a yyyy-mm-dd date: {raw}"))?;
                    if !filter.select_day(day, &mut listener) {
                        writeln!(out, "ignored: {}", format_day(day))?;
                    }
                }
                for event in events.drain(..) {
                    print_event(out, event)?;
                }
            }
            writeln!(out, "value: {}", filter.value())?;
        }
        DatesCommand::Search { filter: args, text } => {
            let mut filter = build_filter(config, &args);
            let mut events = Vec::new();
            let outcome = filter.search(&text, &mut |event: FilterEvent| events.push(event));
            for event in events {
                print_event(out, event)?;
            }
            match outcome {
                SearchOutcome::Disabled => writeln!(out, "search is disabled")?,
                SearchOutcome::Blank => writeln!(out, "nothing to search")?,
                SearchOutcome::Unrecognized => writeln!(
                    out,
                    "no match for {text:?} (tried {})",
                    config.date_filter.search_formats.formats().join(", ")
                )?,
                SearchOutcome::OutOfWindow(message) => writeln!(out, "error: {message}")?,
                SearchOutcome::Rejected(day) => writeln!(out, "ignored: {}", format_day(day))?,
                SearchOutcome::Applied(_) => {}
            }
            writeln!(out, "value: {}", filter.value())?;
        }
        DatesCommand::Match { mode, value, due } => {
            let mode = mode.unwrap_or(config.date_filter.mode);
            let filter = DueFilter::parse(mode, &value);
            for raw in due {
                let parsed: Option<NaiveDate> = parse_day(&raw);
                let verdict = if filter.matches(parsed) { "keep" } else { "drop" };
                writeln!(out, "{verdict} {raw}")?;
            }
        }
        DatesCommand::Window { filter: args } => {
            let filter = build_filter(config, &args);
            writeln!(
                out,
                "{} {} ({})",
                filter.mode().as_str(),
                filter.window(),
                filter
                    .window()
                    .preset()
                    .map_or("explicit", |preset| preset.as_str())
            )?;
        }
    }

    info!("dates command finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::MemoryStore;

    fn run_dates_text(action: DatesCommand) -> String {
        let mut out = Vec::new();
        run_dates(&Config::default(), action, &mut out).expect("run dates");
        String::from_utf8(out).expect("utf8 output")
    }

    fn args(mode: &str) -> FilterArgs {
        FilterArgs {
            mode: Some(mode.parse().expect("mode")),
            window: None,
            months: None,
            today: NaiveDate::from_ymd_opt(2024, 2, 1),
            value: String::new(),
        }
    }

    #[test]
    fn pick_replays_range_clicks() {
        let text = run_dates_text(DatesCommand::Pick {
            filter: args("range"),
            days: vec!["2024-02-10".into(), "2024-02-05".into(), "2025-01-01".into()],
        });
        assert!(text.contains("ignored: 2025-01-01"));
        assert!(text.contains("select: 2024-02-10\n"));
        assert!(text.ends_with("value: 2024-02-05,2024-02-10\n"));
    }

    #[test]
    fn search_reports_window_error() {
        let text = run_dates_text(DatesCommand::Search {
            filter: args("single"),
            text: "12/25/2024".to_string(),
        });
        assert!(text.contains("error: Date must be within 3 months"));
        assert!(text.ends_with("value: \n"));
    }

    #[test]
    fn window_reports_preset_bounds() {
        let text = run_dates_text(DatesCommand::Window { filter: args("range") });
        assert_eq!(text, "range 2023-11-01..=2024-05-01 (around_today)\n");
    }

    #[test]
    fn keys_set_then_remove_round_trip() {
        let mut store = MemoryStore::new();
        let config = Config::default();
        let mut out = Vec::new();

        run_keys(
            &mut store,
            &config,
            KeysCommand::Set {
                provider: Provider::Groq,
                keys: vec!["gsk_1".into(), "gsk_2".into()],
            },
            &mut out,
        )
        .expect("set keys");
        assert_eq!(
            store.get("groq_api_keys").expect("get").as_deref(),
            Some("[\"gsk_1\",\"gsk_2\"]")
        );

        run_keys(
            &mut store,
            &config,
            KeysCommand::Remove { provider: Provider::Groq, position: 1 },
            &mut out,
        )
        .expect("remove key");
        run_keys(
            &mut store,
            &config,
            KeysCommand::Remove { provider: Provider::Groq, position: 1 },
            &mut out,
        )
        .expect("remove last key");
        assert!(store.is_empty());

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("API Keys Saved"));
        assert!(text.contains("No API Keys"));
    }

    #[test]
    fn keys_add_fills_blank_slot_then_appends() {
        let mut store = MemoryStore::new();
        let config = Config::default();
        let mut out = Vec::new();

        for key in ["sk-or-v1-a", "sk-or-v1-b"] {
            run_keys(
                &mut store,
                &config,
                KeysCommand::Add { provider: Provider::OpenRouter, key: key.to_string() },
                &mut out,
            )
            .expect("add key");
        }

        assert_eq!(
            store.get("openrouter_api_keys").expect("get").as_deref(),
            Some("[\"sk-or-v1-a\",\"sk-or-v1-b\"]")
        );
    }
}
