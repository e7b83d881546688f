use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

/// Legacy scalar keys without a current
/// provider counterpart.
pub const ORPHANED_LEGACY_KEYS: [&str; 1] =
  ["nvidia_api_key"];

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
  OpenAi,
  Gemini,
  Groq,
  OpenRouter
}

impl Provider {
  /// Persistence order.
  pub const ALL: [Provider; 4] = [
    Provider::OpenAi,
    Provider::Gemini,
    Provider::Groq,
    Provider::OpenRouter
  ];

  /// Order the dialog lists providers in.
  pub const DISPLAY_ORDER: [Provider; 4] = [
    Provider::OpenRouter,
    Provider::OpenAi,
    Provider::Gemini,
    Provider::Groq
  ];

  pub fn id(self) -> &'static str {
    match self {
      | Self::OpenAi => "openai",
      | Self::Gemini => "gemini",
      | Self::Groq => "groq",
      | Self::OpenRouter => "openrouter"
    }
  }

  pub fn storage_key(self) -> String {
    format!("{}_api_keys", self.id())
  }

  pub fn legacy_key(self) -> String {
    format!("{}_api_key", self.id())
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::OpenAi => "OpenAI API Keys",
      | Self::Gemini => {
        "Google Gemini API Keys"
      }
      | Self::Groq => "Groq API Keys",
      | Self::OpenRouter => {
        "OpenRouter API Keys"
      }
    }
  }

  pub fn placeholder(self) -> &'static str {
    match self {
      | Self::OpenAi => "sk-...",
      | Self::Gemini => "AIza...",
      | Self::Groq => "gsk_...",
      | Self::OpenRouter => "sk-or-v1-..."
    }
  }

  pub fn help(self) -> &'static str {
    match self {
      | Self::OpenAi => {
        "Get your API keys from \
         platform.openai.com"
      }
      | Self::Gemini => {
        "Get your API keys from \
         aistudio.google.com"
      }
      | Self::Groq => {
        "Get your API keys from \
         console.groq.com"
      }
      | Self::OpenRouter => {
        "Access Claude, GPT, Llama, and \
         200+ models with lower costs. \
         Get your API keys from \
         openrouter.ai"
      }
    }
  }
}

impl fmt::Display for Provider {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl std::str::FromStr for Provider {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let wanted =
      s.trim().to_ascii_lowercase();
    Self::ALL
      .into_iter()
      .find(|provider| {
        provider.id() == wanted
      })
      .ok_or_else(|| {
        anyhow::anyhow!(
          "unknown provider: {s} \
           (expected one of openai, \
           gemini, groq, openrouter)"
        )
      })
  }
}

/// Every deprecated scalar key that must
/// be removed on save and clear.
pub fn legacy_keys() -> Vec<String> {
  Provider::ALL
    .into_iter()
    .map(Provider::legacy_key)
    .chain(
      ORPHANED_LEGACY_KEYS
        .iter()
        .map(|key| (*key).to_string())
    )
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_keys_follow_provider_ids() {
    assert_eq!(
      Provider::OpenRouter.storage_key(),
      "openrouter_api_keys"
    );
    assert_eq!(
      Provider::Gemini.legacy_key(),
      "gemini_api_key"
    );
  }

  #[test]
  fn legacy_keys_include_nvidia() {
    let keys = legacy_keys();
    assert_eq!(keys.len(), 5);
    assert!(
      keys
        .iter()
        .any(|key| key == "nvidia_api_key")
    );
  }

  #[test]
  fn parses_provider_ids() {
    assert_eq!(
      " Groq "
        .parse::<Provider>()
        .expect("parse provider"),
      Provider::Groq
    );
    assert!(
      "nvidia".parse::<Provider>().is_err()
    );
  }
}
