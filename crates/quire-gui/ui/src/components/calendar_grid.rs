use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};
use quire_core::DateRangeSelector;
use quire_core::datetime::{
  add_days,
  add_months,
  first_day_of_month,
  month_of,
  sub_months
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

const WEEKDAY_LABELS: [&str; 7] = [
  "Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"
];

fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

#[derive(Properties, PartialEq)]
pub struct CalendarGridProps {
  pub selector:     DateRangeSelector,
  pub month:        NaiveDate,
  pub on_navigate:  Callback<NaiveDate>,
  pub on_pick:      Callback<NaiveDate>
}

/// Month view with days outside the
/// allowed window disabled. Navigation
/// stops at the window's first and last
/// month.
#[function_component(CalendarGrid)]
pub fn calendar_grid(
  props: &CalendarGridProps
) -> Html {
  let window = props.selector.window();
  let month = month_of(props.month);
  let first_month = month_of(window.first());
  let last_month = month_of(window.last());
  let grid_start = start_of_week(
    first_day_of_month(
      month.year(),
      month.month()
    ),
    Weekday::Sun
  );

  let prev = sub_months(month, 1);
  let next = add_months(month, 1);
  let on_prev = {
    let on_navigate =
      props.on_navigate.clone();
    Callback::from(move |_: MouseEvent| {
      on_navigate.emit(prev)
    })
  };
  let on_next = {
    let on_navigate =
      props.on_navigate.clone();
    Callback::from(move |_: MouseEvent| {
      on_navigate.emit(next)
    })
  };

  html! {
      <div class="calendar">
          <div class="calendar-nav">
              <button type="button" class="btn btn-ghost" disabled={month <= first_month} onclick={on_prev}>{ "‹" }</button>
              <span class="calendar-title">{ month.format("%B %Y").to_string() }</span>
              <button type="button" class="btn btn-ghost" disabled={month >= last_month} onclick={on_next}>{ "›" }</button>
          </div>
          <div class="calendar-weekday-row">
              {
                  for WEEKDAY_LABELS.iter().map(|label| html! {
                      <div class="calendar-weekday">{ *label }</div>
                  })
              }
          </div>
          <div class="calendar-grid">
              {
                  for (0_i64..42_i64).map(|offset| {
                      let day = add_days(grid_start, offset);
                      let outside = day.month() != month.month();
                      let disabled = props.selector.is_disabled(day);
                      let selected = props.selector.contains(day);
                      let on_pick = props.on_pick.clone();
                      html! {
                          <button
                              type="button"
                              class={classes!(
                                  "calendar-day-cell",
                                  outside.then_some("outside"),
                                  selected.then_some("selected"),
                                  props.selector.is_range_start(day).then_some("range-start"),
                                  props.selector.is_range_end(day).then_some("range-end")
                              )}
                              disabled={disabled}
                              onclick={Callback::from(move |_: MouseEvent| on_pick.emit(day))}
                          >
                              { day.day() }
                          </button>
                      }
                  })
              }
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn week_starts_on_sunday() {
    let thursday =
      NaiveDate::from_ymd_opt(2024, 2, 1)
        .expect("valid date");
    assert_eq!(
      start_of_week(thursday, Weekday::Sun),
      NaiveDate::from_ymd_opt(2024, 1, 28)
        .expect("valid date")
    );
  }
}
