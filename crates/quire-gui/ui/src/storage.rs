use anyhow::anyhow;
use quire_core::KeyValueStore;

/// `window.localStorage` behind the
/// widgets' store interface. A missing
/// storage (private mode, no window)
/// reads as empty and fails writes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStorageStore {
  storage: Option<web_sys::Storage>
}

impl LocalStorageStore {
  pub fn from_window() -> Self {
    let storage = web_sys::window()
      .and_then(|window| {
        window
          .local_storage()
          .ok()
          .flatten()
      });
    if storage.is_none() {
      tracing::warn!(
        "local storage unavailable; \
         api keys will not persist"
      );
    }
    Self { storage }
  }

  fn storage(
    &self
  ) -> anyhow::Result<&web_sys::Storage>
  {
    self.storage.as_ref().ok_or_else(|| {
      anyhow!("local storage unavailable")
    })
  }
}

impl KeyValueStore for LocalStorageStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    let Some(storage) = self.storage.as_ref()
    else {
      return Ok(None);
    };
    storage.get_item(key).map_err(|error| {
      anyhow!(
        "failed reading {key} from local \
         storage: {error:?}"
      )
    })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .storage()?
      .set_item(key, value)
      .map_err(|error| {
        anyhow!(
          "failed writing {key} to local \
           storage: {error:?}"
        )
      })
  }

  fn delete(
    &mut self,
    key: &str
  ) -> anyhow::Result<()> {
    self
      .storage()?
      .remove_item(key)
      .map_err(|error| {
        anyhow!(
          "failed removing {key} from \
           local storage: {error:?}"
        )
      })
  }
}
