use anyhow::anyhow;
use ticklist_core::KeyValueStorage;

/// `window.localStorage`, looked up on
/// every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage()
-> anyhow::Result<web_sys::Storage> {
  let window = web_sys::window()
    .ok_or_else(|| {
      anyhow!("no window available")
    })?;
  window
    .local_storage()
    .map_err(|error| {
      anyhow!(
        "local storage unavailable: \
         {error:?}"
      )
    })?
    .ok_or_else(|| {
      anyhow!(
        "local storage is disabled"
      )
    })
}

impl KeyValueStorage for BrowserStorage {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    local_storage()?
      .get_item(key)
      .map_err(|error| {
        anyhow!(
          "failed reading {key}: \
           {error:?}"
        )
      })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    local_storage()?
      .set_item(key, value)
      .map_err(|error| {
        anyhow!(
          "failed writing {key}: \
           {error:?}"
        )
      })
  }
}
