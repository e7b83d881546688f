use std::collections::BTreeMap;

use anyhow::Context;

/// Flat string key-value storage the
/// widgets persist through. Browser
/// `localStorage`, a JSON file or an
/// in-memory map all fit behind it.
pub trait KeyValueStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;

  fn delete(
    &mut self,
    key: &str
  ) -> anyhow::Result<()>;
}

impl<T> KeyValueStore for &mut T
where
  T: KeyValueStore + ?Sized
{
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    (**self).get(key)
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    (**self).set(key, value)
  }

  fn delete(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    (**self).delete(key)
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains_key(
    &self,
    key: &str
  ) -> bool {
    self.entries.contains_key(key)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn delete(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self.entries.remove(key);
    Ok(())
  }
}

/// Reads a JSON array of strings. A
/// missing key is `Ok(None)`; malformed
/// JSON is an error for the caller to
/// absorb.
pub fn read_string_list<S>(
  store: &S,
  key: &str
) -> anyhow::Result<Option<Vec<String>>>
where
  S: KeyValueStore + ?Sized
{
  let Some(raw) = store.get(key)? else {
    return Ok(None);
  };

  let values =
    serde_json::from_str::<Vec<String>>(
      &raw
    )
    .with_context(|| {
      format!(
        "stored value for {key} is not \
         a JSON string array"
      )
    })?;
  Ok(Some(values))
}

pub fn write_string_list<S>(
  store: &mut S,
  key: &str,
  values: &[String]
) -> anyhow::Result<()>
where
  S: KeyValueStore + ?Sized
{
  let json = serde_json::to_string(values)
    .with_context(|| {
      format!("failed encoding {key}")
    })?;
  store.set(key, &json)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn string_lists_round_trip_through_json(
  ) {
    let mut store = MemoryStore::new();
    write_string_list(
      &mut store,
      "groq_api_keys",
      &["gsk_a".to_string()]
    )
    .expect("write list");

    assert_eq!(
      store
        .get("groq_api_keys")
        .expect("get")
        .as_deref(),
      Some("[\"gsk_a\"]")
    );
    assert_eq!(
      read_string_list(
        &store,
        "groq_api_keys"
      )
      .expect("read list"),
      Some(vec!["gsk_a".to_string()])
    );
  }

  #[test]
  fn missing_key_reads_as_none() {
    let store = MemoryStore::new();
    assert_eq!(
      read_string_list(&store, "absent")
        .expect("read list"),
      None
    );
  }

  #[test]
  fn malformed_json_is_an_error() {
    let mut store = MemoryStore::new();
    store
      .set("openai_api_keys", "sk-raw")
      .expect("set");
    assert!(
      read_string_list(
        &store,
        "openai_api_keys"
      )
      .is_err()
    );
  }
}
