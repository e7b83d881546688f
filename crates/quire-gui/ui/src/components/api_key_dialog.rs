use quire_core::config::KeysConfig;
use quire_core::keyset::FAILOVER_NOTICE;
use quire_core::{
  KeySetEditor,
  Provider
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  UseStateHandle,
  classes,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::storage::LocalStorageStore;

type Editor = KeySetEditor<LocalStorageStore>;

#[derive(Properties, PartialEq)]
pub struct ApiKeyDialogProps {
  pub is_open:   bool,
  pub config:    KeysConfig,
  pub on_close:  Callback<()>,
  /// Title and description for the
  /// host's toast.
  pub on_notify: Callback<(String, String)>
}

fn edit(
  editor: &UseStateHandle<Editor>,
  change: impl FnOnce(&mut Editor)
) {
  let mut next = (**editor).clone();
  change(&mut next);
  editor.set(next);
}

#[function_component(ApiKeyDialog)]
pub fn api_key_dialog(
  props: &ApiKeyDialogProps
) -> Html {
  let editor = {
    let config = props.config.clone();
    use_state(move || {
      KeySetEditor::new(
        LocalStorageStore::from_window(),
        config
      )
    })
  };

  {
    let editor = editor.clone();
    use_effect_with(
      props.is_open,
      move |open| {
        if *open {
          edit(&editor, Editor::load);
          tracing::debug!(
            "api key dialog opened"
          );
        }
        || ()
      }
    );
  }

  if !props.is_open {
    return html! {};
  }

  let on_close = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      on_close.emit(())
    })
  };

  let on_save = {
    let editor = editor.clone();
    let on_notify = props.on_notify.clone();
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*editor).clone();
      let outcome = next.save();
      editor.set(next);
      on_notify.emit((
        outcome.title().to_string(),
        outcome.description()
      ));
      on_close.emit(());
    })
  };

  let on_clear = {
    let editor = editor.clone();
    let on_notify = props.on_notify.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*editor).clone();
      let outcome = next.clear();
      editor.set(next);
      on_notify.emit((
        outcome.title().to_string(),
        outcome.description().to_string()
      ));
    })
  };

  let total = editor.total_active();
  let can_save = editor.has_any_active();

  html! {
      <div class="modal-backdrop" onclick={on_close.clone()}>
          <div class="modal modal-md" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">
                  { "API Keys Management" }
                  <button class="btn btn-ghost" onclick={on_close}>{ "×" }</button>
              </div>
              <div class="content">
                  <p class="field-help">
                      { "Add API keys for one or more providers. The system will automatically use the best available option:" }
                  </p>
                  {
                      for Provider::DISPLAY_ORDER.into_iter().map(|provider| {
                          render_provider(&editor, provider)
                      })
                  }
                  <div class="actions">
                      <button class="btn btn-primary" disabled={!can_save} onclick={on_save}>
                          { format!("Save API Keys ({total})") }
                      </button>
                      <button class="btn" onclick={on_clear}>{ "Clear All" }</button>
                  </div>
                  <div class="field-help failover-notice">
                      <strong>{ "Failover System: " }</strong>
                      { FAILOVER_NOTICE }
                  </div>
              </div>
          </div>
      </div>
  }
}

fn render_provider(
  editor: &UseStateHandle<Editor>,
  provider: Provider
) -> Html {
  let expanded =
    editor.is_expanded(provider);
  let active =
    editor.active_count(provider);
  let max =
    editor.config().max_per_provider;
  let slots =
    editor.entries(provider).len();

  let on_toggle = {
    let editor = editor.clone();
    Callback::from(move |_: MouseEvent| {
      edit(&editor, |next| {
        next.toggle_expanded(provider)
      })
    })
  };

  let on_add = {
    let editor = editor.clone();
    Callback::from(move |_: MouseEvent| {
      edit(&editor, |next| {
        next.add_entry(provider);
      })
    })
  };

  html! {
      <div class={classes!("provider-card", provider.id(), expanded.then_some("expanded"))}>
          <button type="button" class="provider-header" onclick={on_toggle}>
              <span class="provider-label">{ provider.label() }</span>
              {
                  if active > 0 {
                      html! { <span class="badge">{ format!("{active} key(s)") }</span> }
                  } else {
                      html! {}
                  }
              }
              <span class={classes!("chevron", expanded.then_some("open"))}>{ "▾" }</span>
          </button>
          {
              if expanded {
                  html! {
                      <div class="provider-body">
                          {
                              for (0..slots).map(|index| render_slot(editor, provider, index))
                          }
                          {
                              if slots < max {
                                  html! {
                                      <button type="button" class="btn" onclick={on_add}>
                                          { format!("+ Add Key ({slots}/{max})") }
                                      </button>
                                  }
                              } else {
                                  html! {}
                              }
                          }
                          <p class="field-help">{ provider.help() }</p>
                      </div>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}

fn render_slot(
  editor: &UseStateHandle<Editor>,
  provider: Provider,
  index: usize
) -> Html {
  let value = editor
    .entries(provider)
    .get(index)
    .cloned()
    .unwrap_or_default();
  let revealed =
    editor.is_revealed(provider, index);
  let removable =
    editor.can_remove(provider);

  let on_input = {
    let editor = editor.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        edit(&editor, |next| {
          next.update_entry(
            provider,
            index,
            input.value()
          );
        })
      }
    )
  };

  let on_reveal = {
    let editor = editor.clone();
    Callback::from(move |_: MouseEvent| {
      edit(&editor, |next| {
        next.toggle_revealed(provider, index)
      })
    })
  };

  let on_remove = {
    let editor = editor.clone();
    Callback::from(move |_: MouseEvent| {
      edit(&editor, |next| {
        next.remove_entry(provider, index);
      })
    })
  };

  html! {
      <div class="field key-slot">
          <input
              type={if revealed { "text" } else { "password" }}
              placeholder={format!("{} {}", provider.placeholder(), index + 1)}
              value={value}
              oninput={on_input}
          />
          <button type="button" class="btn btn-ghost" onclick={on_reveal}>
              { if revealed { "Hide" } else { "Show" } }
          </button>
          {
              if removable {
                  html! {
                      <button type="button" class="btn btn-danger" onclick={on_remove}>{ "Remove" }</button>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
