use chrono::NaiveDate;
use quire_core::config::DateFilterConfig;
use quire_core::datetime::{
  month_of,
  today
};
use quire_core::{
  FilterEvent,
  InlineDateFilter as FilterState,
  RecordingListener,
  SelectionMode
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_effect_with,
  use_state
};

use super::calendar_grid::CalendarGrid;

#[derive(Properties, PartialEq)]
pub struct InlineDateFilterProps {
  pub is_active: bool,
  pub selected:  String,
  pub config:    DateFilterConfig,
  pub on_toggle: Callback<bool>,
  pub on_select: Callback<String>
}

/// Applies one transition to a copy of
/// the filter state, then forwards the
/// recorded events to the host callbacks.
fn transition(
  state: &UseStateHandle<FilterState>,
  on_toggle: &Callback<bool>,
  on_select: &Callback<String>,
  change: impl FnOnce(
    &mut FilterState,
    &mut RecordingListener
  )
) {
  let mut next = (**state).clone();
  let mut recorded =
    RecordingListener::default();
  change(&mut next, &mut recorded);
  state.set(next);
  for event in recorded.events {
    match event {
      | FilterEvent::Toggled(active) => {
        on_toggle.emit(active)
      }
      | FilterEvent::Selected(value) => {
        on_select.emit(value)
      }
    }
  }
}

fn hint(filter: &FilterState) -> String {
  match filter.mode() {
    | SelectionMode::Single => {
      "Or pick from calendar".to_string()
    }
    | SelectionMode::Multi => {
      format!(
        "Pick up to {} dates",
        filter.selector().max_selected()
      )
    }
    | SelectionMode::Range => {
      "Pick a start and an end date"
        .to_string()
    }
  }
}

#[function_component(InlineDateFilter)]
pub fn inline_date_filter(
  props: &InlineDateFilterProps
) -> Html {
  let state = {
    let config = props.config.clone();
    use_state(move || {
      FilterState::from_config(
        &config,
        today()
      )
    })
  };
  let month = {
    let state = state.clone();
    use_state(move || {
      month_of(state.window().first().max(today()))
    })
  };

  {
    let state = state.clone();
    use_effect_with(
      (
        props.is_active,
        props.selected.clone()
      ),
      move |(active, selected)| {
        let mut next = (*state).clone();
        next.sync(*active, selected);
        if next != *state {
          tracing::debug!(
            active = *active,
            selected = %selected,
            "date filter synced from host"
          );
          state.set(next);
        }
        || ()
      }
    );
  }

  let on_toggle = {
    let state = state.clone();
    let on_toggle = props.on_toggle.clone();
    let on_select = props.on_select.clone();
    let activated = !props.is_active;
    Callback::from(move |_: MouseEvent| {
      transition(
        &state,
        &on_toggle,
        &on_select,
        |filter, listener| {
          filter.toggle(activated, listener)
        }
      )
    })
  };

  let on_pick = {
    let state = state.clone();
    let on_toggle = props.on_toggle.clone();
    let on_select = props.on_select.clone();
    Callback::from(move |day: NaiveDate| {
      transition(
        &state,
        &on_toggle,
        &on_select,
        |filter, listener| {
          filter.select_day(day, listener);
        }
      )
    })
  };

  let on_search = {
    let state = state.clone();
    let on_toggle = props.on_toggle.clone();
    let on_select = props.on_select.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        transition(
          &state,
          &on_toggle,
          &on_select,
          |filter, listener| {
            filter.search(
              &input.value(),
              listener
            );
          }
        )
      }
    )
  };

  let on_clear = {
    let state = state.clone();
    let on_toggle = props.on_toggle.clone();
    let on_select = props.on_select.clone();
    Callback::from(move |_: MouseEvent| {
      transition(
        &state,
        &on_toggle,
        &on_select,
        |filter, listener| {
          filter.clear(listener)
        }
      )
    })
  };

  let on_navigate = {
    let month = month.clone();
    Callback::from(move |target: NaiveDate| {
      month.set(month_of(target))
    })
  };

  html! {
      <div class="field date-filter">
          <div class="date-filter-header">
              <span>{ "Date" }</span>
              <button
                  type="button"
                  class={if props.is_active { "toggle on" } else { "toggle" }}
                  onclick={on_toggle}
              >
                  { if props.is_active { "On" } else { "Off" } }
              </button>
          </div>
          {
              if props.is_active {
                  html! {
                      <div class="date-filter-body">
                          {
                              if state.search_enabled() {
                                  html! {
                                      <div class="field">
                                          <label>{ "Search date (MM/DD/YYYY or YYYY-MM-DD)" }</label>
                                          <input
                                              type="text"
                                              value={state.search_input().to_string()}
                                              placeholder="e.g., 12/25/2024"
                                              oninput={on_search}
                                          />
                                          {
                                              if let Some(error) = state.search_error() {
                                                  html! { <div class="form-error">{ error.to_string() }</div> }
                                              } else {
                                                  html! {}
                                              }
                                          }
                                      </div>
                                  }
                              } else {
                                  html! {}
                              }
                          }
                          <div class="field-help">{ hint(&state) }</div>
                          <CalendarGrid
                              selector={state.selector().clone()}
                              month={*month}
                              on_navigate={on_navigate}
                              on_pick={on_pick}
                          />
                          {
                              if state.selector().is_empty() {
                                  html! {}
                              } else {
                                  html! {
                                      <button type="button" class="btn btn-ghost" onclick={on_clear}>{ "Clear" }</button>
                                  }
                              }
                          }
                          <div class="field-help">
                              { format!("Filtering limited to {}", state.window()) }
                          </div>
                      </div>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
