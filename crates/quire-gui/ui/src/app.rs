use chrono::NaiveDate;
use gloo::console::log;
use quire_core::datetime::{
  add_days,
  format_day,
  today
};
use quire_core::{
  Config,
  DueFilter
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_state
};

use crate::components::{
  ApiKeyDialog,
  InlineDateFilter
};

#[derive(Debug, Clone, PartialEq)]
struct DueItem {
  title: String,
  due:   Option<NaiveDate>
}

fn sample_items(
  today: NaiveDate
) -> Vec<DueItem> {
  [
    ("Review pull requests", Some(0)),
    ("Renew domain", Some(3)),
    ("Quarterly report", Some(21)),
    ("File expenses", Some(-2)),
    ("Read backlog", None)
  ]
  .into_iter()
  .map(|(title, offset)| {
    DueItem {
      title: title.to_string(),
      due:   offset.map(|days| {
        add_days(today, days)
      })
    }
  })
  .collect()
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}

#[function_component(App)]
pub fn app() -> Html {
  let config = use_state(Config::embedded);
  let items =
    use_state(|| sample_items(today()));
  let date_active = use_state(|| false);
  let date_value =
    use_state(String::new);
  let dialog_open = use_state(|| false);
  let notice =
    use_state(|| None::<(String, String)>);

  let on_date_toggle = {
    let date_active = date_active.clone();
    Callback::from(move |active: bool| {
      ui_debug(
        "date_filter.toggle",
        &active.to_string()
      );
      date_active.set(active);
    })
  };

  let on_date_select = {
    let date_value = date_value.clone();
    Callback::from(move |value: String| {
      ui_debug(
        "date_filter.select",
        &value
      );
      date_value.set(value);
    })
  };

  let on_open_keys = {
    let dialog_open = dialog_open.clone();
    Callback::from(move |_: MouseEvent| {
      dialog_open.set(true)
    })
  };

  let on_close_keys = {
    let dialog_open = dialog_open.clone();
    Callback::from(move |_: ()| {
      dialog_open.set(false)
    })
  };

  let on_notify = {
    let notice = notice.clone();
    Callback::from(
      move |(title, description): (
        String,
        String
      )| {
        ui_debug("api_keys.notify", &title);
        notice.set(Some((
          title,
          description
        )));
      }
    )
  };

  let on_dismiss = {
    let notice = notice.clone();
    Callback::from(move |_: MouseEvent| {
      notice.set(None)
    })
  };

  let due_filter = if *date_active {
    DueFilter::parse(
      config.date_filter.mode,
      &date_value
    )
  } else {
    DueFilter::Any
  };
  let visible = due_filter
    .retain(items.as_slice(), |item| item.due);

  html! {
      <div class="app-shell">
          <header class="topbar">
              <span class="brand">{ "Quire" }</span>
              <button class="btn" onclick={on_open_keys}>{ "API Keys" }</button>
          </header>
          {
              if let Some((title, description)) = &*notice {
                  html! {
                      <div class="toast" onclick={on_dismiss}>
                          <strong>{ title.clone() }</strong>
                          <div>{ description.clone() }</div>
                      </div>
                  }
              } else {
                  html! {}
              }
          }
          <main class="content">
              <InlineDateFilter
                  is_active={*date_active}
                  selected={(*date_value).clone()}
                  config={config.date_filter.clone()}
                  on_toggle={on_date_toggle}
                  on_select={on_date_select}
              />
              <ul class="due-list">
                  {
                      for visible.into_iter().map(|item| html! {
                          <li class="due-item">
                              <span>{ item.title.clone() }</span>
                              <span class="due-date">
                                  { item.due.map(format_day).unwrap_or_else(|| "no due date".to_string()) }
                              </span>
                          </li>
                      })
                  }
              </ul>
          </main>
          <ApiKeyDialog
              is_open={*dialog_open}
              config={config.keys.clone()}
              on_close={on_close_keys}
              on_notify={on_notify}
          />
      </div>
  }
}
