//! Per-provider API key lists backing the
//! key management dialog.
//!
//! Keys live in the host store under
//! `{provider}_api_keys` as JSON string
//! arrays. The old single-key entries
//! (`{provider}_api_key`,
//! `nvidia_api_key`) are only ever
//! deleted so nothing else in the app
//! reads a stale key.

use std::collections::{
  BTreeMap,
  BTreeSet
};

use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::config::KeysConfig;
use crate::provider::{
  Provider,
  legacy_keys
};
use crate::store::{
  KeyValueStore,
  read_string_list,
  write_string_list
};

pub const FAILOVER_NOTICE: &str =
  "If your primary API key hits its \
   limit or fails, the system will \
   automatically try the next available \
   key. Your keys are stored locally and \
   only used for direct API calls.";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SaveOutcome {
  Saved { total: usize },
  NothingToSave
}

impl SaveOutcome {
  pub fn total(self) -> usize {
    match self {
      | Self::Saved { total } => total,
      | Self::NothingToSave => 0
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      | Self::Saved { .. } => {
        "API Keys Saved"
      }
      | Self::NothingToSave => {
        "No API Keys"
      }
    }
  }

  pub fn description(self) -> String {
    match self {
      | Self::Saved { total } => {
        format!(
          "Your API keys ({total} total) \
           have been saved successfully. \
           The system will use the best \
           available provider for each \
           request."
        )
      }
      | Self::NothingToSave => {
        "Please add at least one API key \
         to use the chat functionality."
          .to_string()
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ClearOutcome;

impl ClearOutcome {
  pub fn title(self) -> &'static str {
    "API Keys Cleared"
  }

  pub fn description(
    self
  ) -> &'static str {
    "All API keys have been removed."
  }
}

/// Editable key lists for every provider.
///
/// Every provider always has at least one
/// (possibly blank) slot and never more
/// than `max_per_provider`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySetEditor<S> {
  store:    S,
  config:   KeysConfig,
  keys:     BTreeMap<Provider, Vec<String>>,
  expanded: BTreeSet<Provider>,
  revealed: BTreeSet<(Provider, usize)>
}

fn blank_slots()
-> BTreeMap<Provider, Vec<String>> {
  Provider::ALL
    .into_iter()
    .map(|provider| {
      (provider, vec![String::new()])
    })
    .collect()
}

fn is_active(value: &str) -> bool {
  !value.trim().is_empty()
}

impl<S> KeySetEditor<S>
where
  S: KeyValueStore
{
  /// Starts with blank slots; call
  /// [`KeySetEditor::load`] when the
  /// dialog opens.
  pub fn new(
    store: S,
    config: KeysConfig
  ) -> Self {
    let expanded = BTreeSet::from([
      config.default_provider
    ]);
    Self {
      store,
      config,
      keys: blank_slots(),
      expanded,
      revealed: BTreeSet::new()
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn config(&self) -> &KeysConfig {
    &self.config
  }

  #[tracing::instrument(skip(self))]
  pub fn load(&mut self) {
    let max = self.config.max_per_provider;
    for provider in Provider::ALL {
      let key = provider.storage_key();
      let mut loaded = match read_string_list(
        &self.store,
        &key
      ) {
        | Ok(Some(values)) => values,
        | Ok(None) => Vec::new(),
        | Err(err) => {
          error!(
            provider = provider.id(),
            error = %format!("{err:#}"),
            "failed reading stored api keys; using empty slot"
          );
          Vec::new()
        }
      };

      if loaded.len() > max {
        warn!(
          provider = provider.id(),
          stored = loaded.len(),
          max,
          "stored api keys exceed limit; truncating"
        );
        loaded.truncate(max);
      }
      if loaded.is_empty() {
        loaded.push(String::new());
      }

      self.keys.insert(provider, loaded);
    }

    self.expanded = Provider::ALL
      .into_iter()
      .filter(|provider| {
        self.active_count(*provider) > 0
      })
      .collect();
    if self.expanded.is_empty() {
      self
        .expanded
        .insert(self.config.default_provider);
    }
    self.revealed.clear();

    debug!(
      total = self.total_active(),
      expanded = ?self.expanded,
      "loaded api key sets"
    );
  }

  pub fn entries(
    &self,
    provider: Provider
  ) -> &[String] {
    self
      .keys
      .get(&provider)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn can_add(
    &self,
    provider: Provider
  ) -> bool {
    self.entries(provider).len()
      < self.config.max_per_provider
  }

  pub fn can_remove(
    &self,
    provider: Provider
  ) -> bool {
    self.entries(provider).len() > 1
  }

  pub fn add_entry(
    &mut self,
    provider: Provider
  ) -> bool {
    if !self.can_add(provider) {
      debug!(
        provider = provider.id(),
        "key slot limit reached"
      );
      return false;
    }

    self
      .keys
      .entry(provider)
      .or_default()
      .push(String::new());
    true
  }

  pub fn remove_entry(
    &mut self,
    provider: Provider,
    index: usize
  ) -> bool {
    if !self.can_remove(provider) {
      return false;
    }
    let Some(slots) =
      self.keys.get_mut(&provider)
    else {
      return false;
    };
    if index >= slots.len() {
      return false;
    }

    slots.remove(index);
    self.revealed = self
      .revealed
      .iter()
      .filter_map(|(owner, slot)| {
        if *owner != provider {
          Some((*owner, *slot))
        } else if *slot < index {
          Some((*owner, *slot))
        } else if *slot > index {
          Some((*owner, slot - 1))
        } else {
          None
        }
      })
      .collect();
    true
  }

  pub fn update_entry(
    &mut self,
    provider: Provider,
    index: usize,
    value: impl Into<String>
  ) -> bool {
    match self
      .keys
      .get_mut(&provider)
      .and_then(|slots| slots.get_mut(index))
    {
      | Some(slot) => {
        *slot = value.into();
        true
      }
      | None => false
    }
  }

  pub fn active_count(
    &self,
    provider: Provider
  ) -> usize {
    self
      .entries(provider)
      .iter()
      .filter(|value| is_active(value))
      .count()
  }

  pub fn total_active(&self) -> usize {
    Provider::ALL
      .into_iter()
      .map(|provider| {
        self.active_count(provider)
      })
      .sum()
  }

  pub fn has_any_active(&self) -> bool {
    Provider::ALL.into_iter().any(
      |provider| {
        self.active_count(provider) > 0
      }
    )
  }

  pub fn is_expanded(
    &self,
    provider: Provider
  ) -> bool {
    self.expanded.contains(&provider)
  }

  pub fn toggle_expanded(
    &mut self,
    provider: Provider
  ) {
    if !self.expanded.remove(&provider) {
      self.expanded.insert(provider);
    }
  }

  pub fn is_revealed(
    &self,
    provider: Provider,
    index: usize
  ) -> bool {
    self
      .revealed
      .contains(&(provider, index))
  }

  pub fn toggle_revealed(
    &mut self,
    provider: Provider,
    index: usize
  ) {
    let slot = (provider, index);
    if !self.revealed.remove(&slot) {
      self.revealed.insert(slot);
    }
  }

  #[tracing::instrument(skip(self))]
  pub fn save(&mut self) -> SaveOutcome {
    self.delete_legacy_keys();

    let mut total = 0_usize;
    for provider in Provider::ALL {
      let key = provider.storage_key();
      let valid = self
        .entries(provider)
        .iter()
        .filter(|value| is_active(value))
        .cloned()
        .collect::<Vec<_>>();

      if valid.is_empty() {
        if let Err(err) =
          self.store.delete(&key)
        {
          error!(
            provider = provider.id(),
            error = %format!("{err:#}"),
            "failed removing empty api key set"
          );
        }
        continue;
      }

      match write_string_list(
        &mut self.store,
        &key,
        &valid
      ) {
        | Ok(()) => {
          total += valid.len();
        }
        | Err(err) => {
          error!(
            provider = provider.id(),
            error = %format!("{err:#}"),
            "failed saving api keys"
          );
        }
      }
    }

    let outcome = if total > 0 {
      SaveOutcome::Saved { total }
    } else {
      SaveOutcome::NothingToSave
    };
    info!(
      total,
      "saved api key sets"
    );
    outcome
  }

  #[tracing::instrument(skip(self))]
  pub fn clear(&mut self) -> ClearOutcome {
    self.delete_legacy_keys();
    for provider in Provider::ALL {
      if let Err(err) = self
        .store
        .delete(&provider.storage_key())
      {
        error!(
          provider = provider.id(),
          error = %format!("{err:#}"),
          "failed removing api key set"
        );
      }
    }

    self.keys = blank_slots();
    self.expanded = BTreeSet::from([
      self.config.default_provider
    ]);
    self.revealed.clear();
    info!("cleared all api key sets");
    ClearOutcome
  }

  fn delete_legacy_keys(&mut self) {
    for key in legacy_keys() {
      if let Err(err) =
        self.store.delete(&key)
      {
        warn!(
          key = %key,
          error = %format!("{err:#}"),
          "failed removing legacy api key"
        );
      }
    }
  }
}

/// Hides all but the last four characters
/// of a secret.
pub fn masked(secret: &str) -> String {
  let chars =
    secret.chars().collect::<Vec<_>>();
  if chars.len() <= 4 {
    return "*".repeat(chars.len());
  }

  let visible = chars[chars.len() - 4..]
    .iter()
    .collect::<String>();
  format!(
    "{}{visible}",
    "*".repeat(chars.len() - 4)
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryStore;

  fn editor()
  -> KeySetEditor<MemoryStore> {
    KeySetEditor::new(
      MemoryStore::new(),
      KeysConfig::default()
    )
  }

  fn stored(
    editor: &KeySetEditor<MemoryStore>,
    key: &str
  ) -> Option<Vec<String>> {
    read_string_list(editor.store(), key)
      .expect("read stored list")
  }

  #[test]
  fn empty_store_loads_blank_slots() {
    let mut keys = editor();
    keys.load();
    for provider in Provider::ALL {
      assert_eq!(
        keys.entries(provider),
        &[String::new()]
      );
    }
    assert!(
      keys.is_expanded(Provider::OpenRouter)
    );
    assert!(!keys.is_expanded(Provider::Groq));
    assert!(!keys.has_any_active());
  }

  #[test]
  fn load_expands_providers_with_keys() {
    let mut store = MemoryStore::new();
    store
      .set(
        "groq_api_keys",
        "[\"gsk_1\",\"  \"]"
      )
      .expect("set");
    store
      .set("gemini_api_keys", "[\"\"]")
      .expect("set");

    let mut keys = KeySetEditor::new(
      store,
      KeysConfig::default()
    );
    keys.load();

    assert!(keys.is_expanded(Provider::Groq));
    assert!(
      !keys.is_expanded(Provider::OpenRouter)
    );
    assert!(
      !keys.is_expanded(Provider::Gemini)
    );
    assert_eq!(
      keys.active_count(Provider::Groq),
      1
    );
    assert_eq!(
      keys.entries(Provider::Groq).len(),
      2
    );
  }

  #[test]
  fn malformed_json_fails_closed() {
    let mut store = MemoryStore::new();
    store
      .set("openai_api_keys", "{oops")
      .expect("set");
    store
      .set("groq_api_keys", "[]")
      .expect("set");

    let mut keys = KeySetEditor::new(
      store,
      KeysConfig::default()
    );
    keys.load();
    assert_eq!(
      keys.entries(Provider::OpenAi),
      &[String::new()]
    );
    assert_eq!(
      keys.entries(Provider::Groq),
      &[String::new()]
    );
  }

  /// Store whose reads and writes fail for
  /// every key starting with `prefix`.
  #[derive(Debug, Clone, PartialEq)]
  struct FailingStore {
    inner:  MemoryStore,
    prefix: &'static str
  }

  impl FailingStore {
    fn check(
      &self,
      key: &str
    ) -> anyhow::Result<()> {
      if key.starts_with(self.prefix) {
        anyhow::bail!("store offline for {key}");
      }
      Ok(())
    }
  }

  impl KeyValueStore for FailingStore {
    fn get(
      &self,
      key: &str
    ) -> anyhow::Result<Option<String>> {
      self.check(key)?;
      self.inner.get(key)
    }

    fn set(
      &mut self,
      key: &str,
      value: &str
    ) -> anyhow::Result<()> {
      self.check(key)?;
      self.inner.set(key, value)
    }

    fn delete(
      &mut self,
      key: &str
    ) -> anyhow::Result<()> {
      self.inner.delete(key)
    }
  }

  #[test]
  fn unreadable_provider_loads_blank_slot() {
    let mut inner = MemoryStore::new();
    inner
      .set("groq_api_keys", "[\"gsk_1\"]")
      .expect("set");
    inner
      .set("openai_api_keys", "[\"sk-1\"]")
      .expect("set");

    let mut keys = KeySetEditor::new(
      FailingStore {
        inner,
        prefix: "groq_"
      },
      KeysConfig::default()
    );
    keys.load();

    assert_eq!(
      keys.entries(Provider::Groq),
      &[String::new()]
    );
    assert_eq!(
      keys.entries(Provider::OpenAi),
      &["sk-1".to_string()]
    );
    assert!(!keys.is_expanded(Provider::Groq));
  }

  #[test]
  fn failed_write_is_not_counted() {
    let mut keys = KeySetEditor::new(
      FailingStore {
        inner:  MemoryStore::new(),
        prefix: "groq_"
      },
      KeysConfig::default()
    );
    keys.load();
    keys.update_entry(
      Provider::Groq,
      0,
      "gsk_live"
    );
    keys.update_entry(
      Provider::OpenAi,
      0,
      "sk-live"
    );

    assert_eq!(
      keys.save(),
      SaveOutcome::Saved { total: 1 }
    );
    assert!(
      keys
        .store()
        .inner
        .contains_key("openai_api_keys")
    );
    assert!(
      !keys
        .store()
        .inner
        .contains_key("groq_api_keys")
    );
  }

  #[test]
  fn oversized_stored_list_is_truncated() {
    let mut store = MemoryStore::new();
    store
      .set(
        "openrouter_api_keys",
        "[\"k1\",\"k2\",\"k3\",\"k4\",\
         \"k5\",\"k6\",\"k7\"]"
      )
      .expect("set");

    let mut keys = KeySetEditor::new(
      store,
      KeysConfig::default()
    );
    keys.load();

    let entries =
      keys.entries(Provider::OpenRouter);
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[4], "k5");
    assert!(
      !keys.can_add(Provider::OpenRouter)
    );
  }

  #[test]
  fn slot_count_stays_between_one_and_five()
  {
    let mut keys = editor();
    keys.load();
    assert!(
      !keys.remove_entry(Provider::OpenAi, 0)
    );
    for _ in 0..10 {
      keys.add_entry(Provider::OpenAi);
    }
    assert_eq!(
      keys.entries(Provider::OpenAi).len(),
      5
    );
    assert!(!keys.can_add(Provider::OpenAi));

    for _ in 0..10 {
      keys.remove_entry(Provider::OpenAi, 0);
    }
    assert_eq!(
      keys.entries(Provider::OpenAi).len(),
      1
    );
  }

  #[test]
  fn remove_out_of_bounds_is_ignored() {
    let mut keys = editor();
    keys.add_entry(Provider::Groq);
    assert!(
      !keys.remove_entry(Provider::Groq, 7)
    );
    assert_eq!(
      keys.entries(Provider::Groq).len(),
      2
    );
  }

  #[test]
  fn save_persists_only_non_blank_keys() {
    let mut keys = editor();
    keys.load();
    keys.add_entry(Provider::OpenAi);
    keys.add_entry(Provider::OpenAi);
    keys.update_entry(
      Provider::OpenAi,
      0,
      "sk-first"
    );
    keys.update_entry(
      Provider::OpenAi,
      1,
      "   "
    );
    keys.update_entry(
      Provider::OpenAi,
      2,
      "sk-third"
    );

    let outcome = keys.save();
    assert_eq!(
      outcome,
      SaveOutcome::Saved { total: 2 }
    );
    assert_eq!(
      stored(&keys, "openai_api_keys"),
      Some(vec![
        "sk-first".to_string(),
        "sk-third".to_string()
      ])
    );
    assert_eq!(
      stored(&keys, "groq_api_keys"),
      None
    );
  }

  #[test]
  fn save_drops_legacy_and_emptied_sets() {
    let mut store = MemoryStore::new();
    for key in legacy_keys() {
      store.set(&key, "old").expect("set");
    }
    store
      .set("gemini_api_keys", "[\"AIza1\"]")
      .expect("set");

    let mut keys = KeySetEditor::new(
      store,
      KeysConfig::default()
    );
    keys.load();
    keys.update_entry(
      Provider::Gemini,
      0,
      ""
    );

    assert_eq!(
      keys.save(),
      SaveOutcome::NothingToSave
    );
    assert!(keys.store().is_empty());
  }

  #[test]
  fn clear_then_load_is_blank() {
    let mut keys = editor();
    keys.update_entry(
      Provider::Groq,
      0,
      "gsk_live"
    );
    keys.save();
    keys
      .toggle_expanded(Provider::Gemini);

    keys.clear();
    assert!(keys.store().is_empty());

    keys.load();
    for provider in Provider::ALL {
      assert_eq!(
        keys.entries(provider),
        &[String::new()]
      );
    }
    assert!(
      keys.is_expanded(Provider::OpenRouter)
    );
  }

  #[test]
  fn reveal_flags_follow_removed_slots() {
    let mut keys = editor();
    keys.add_entry(Provider::OpenRouter);
    keys.add_entry(Provider::OpenRouter);
    keys.toggle_revealed(
      Provider::OpenRouter,
      2
    );
    keys.remove_entry(
      Provider::OpenRouter,
      0
    );
    assert!(
      keys.is_revealed(Provider::OpenRouter, 1)
    );
    assert!(
      !keys.is_revealed(Provider::OpenRouter, 2)
    );
  }

  #[test]
  fn outcome_texts_mention_totals() {
    assert!(
      SaveOutcome::Saved { total: 3 }
        .description()
        .contains("3 total")
    );
    assert_eq!(
      SaveOutcome::NothingToSave.total(),
      0
    );
  }

  #[test]
  fn masks_all_but_last_four() {
    assert_eq!(masked("sk-abcdef"), "*****cdef");
    assert_eq!(masked("abc"), "***");
    assert_eq!(masked(""), "");
  }
}
