use anyhow::Context;
use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

pub const DEFAULT_STORAGE_KEY: &str =
  "ticklist.todos.v1";
pub const DEFAULT_TITLE: &str =
  "Ticklist";
pub const DEFAULT_INPUT_PLACEHOLDER:
  &str = "What needs to be done? \
          (Press Enter to add)";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct AppConfig {
  pub storage: StorageConfig,
  pub ui:      UiConfig
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct StorageConfig {
  pub key: String
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      key: DEFAULT_STORAGE_KEY
        .to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct UiConfig {
  pub title:             String,
  pub input_placeholder: String
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      title:             DEFAULT_TITLE
        .to_string(),
      input_placeholder:
        DEFAULT_INPUT_PLACEHOLDER
          .to_string()
    }
  }
}

impl AppConfig {
  #[tracing::instrument(skip_all)]
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut cfg =
      toml::from_str::<AppConfig>(text)
        .context(
          "failed to parse ticklist \
           config"
        )?;
    cfg.normalize();
    debug!(
      storage_key = %cfg.storage.key,
      title = %cfg.ui.title,
      "loaded config"
    );
    Ok(cfg)
  }

  /// Trims every value and puts
  /// defaults back in place of blanks.
  fn normalize(&mut self) {
    let defaults = AppConfig::default();
    fill_blank(
      &mut self.storage.key,
      &defaults.storage.key
    );
    fill_blank(
      &mut self.ui.title,
      &defaults.ui.title
    );
    fill_blank(
      &mut self.ui.input_placeholder,
      &defaults.ui.input_placeholder
    );
  }
}

fn fill_blank(
  value: &mut String,
  fallback: &str
) {
  let trimmed = value.trim();
  *value = if trimmed.is_empty() {
    fallback.to_string()
  } else {
    trimmed.to_string()
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg =
      AppConfig::from_toml_str("")
        .unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(
      cfg.storage.key,
      DEFAULT_STORAGE_KEY
    );
  }

  #[test]
  fn partial_sections_keep_other_defaults()
  {
    let cfg = AppConfig::from_toml_str(
      "[ui]\ntitle = \"  Groceries  \"\n"
    )
    .unwrap();
    assert_eq!(cfg.ui.title, "Groceries");
    assert_eq!(
      cfg.ui.input_placeholder,
      DEFAULT_INPUT_PLACEHOLDER
    );
    assert_eq!(
      cfg.storage.key,
      DEFAULT_STORAGE_KEY
    );
  }

  #[test]
  fn blank_storage_key_falls_back() {
    let cfg = AppConfig::from_toml_str(
      "[storage]\nkey = \"   \"\n"
    )
    .unwrap();
    assert_eq!(
      cfg.storage.key,
      DEFAULT_STORAGE_KEY
    );
  }

  #[test]
  fn invalid_toml_is_an_error() {
    assert!(
      AppConfig::from_toml_str(
        "[storage\nkey = 1"
      )
      .is_err()
    );
  }
}
