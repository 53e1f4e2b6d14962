//! Backend-owned settings mirrored for display and edit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settings reported by `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Where memories are physically stored.
    #[serde(default)]
    pub vault_path: String,
    /// Chat model powering analysis.
    #[serde(default)]
    pub chat_model: String,
    /// Models the backend offers.
    #[serde(default)]
    pub available_models: Vec<String>,
}

impl BackendConfig {
    /// Returns the current value of an editable field.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::VaultPath => &self.vault_path,
            ConfigField::ChatModel => &self.chat_model,
        }
    }

    /// Sets an editable field.
    pub fn set(&mut self, field: ConfigField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ConfigField::VaultPath => self.vault_path = value,
            ConfigField::ChatModel => self.chat_model = value,
        }
    }
}

/// Keys accepted by `POST /config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// Vault location.
    VaultPath,
    /// Chat model name.
    ChatModel,
}

impl ConfigField {
    /// Returns all editable fields.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::VaultPath, Self::ChatModel]
    }

    /// Returns the wire key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VaultPath => "vault_path",
            Self::ChatModel => "chat_model",
        }
    }

    /// Returns the label shown in the settings view.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VaultPath => "Vault Location",
            Self::ChatModel => "Cortex Model",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vault_path" | "vault" => Ok(Self::VaultPath),
            "chat_model" | "model" => Ok(Self::ChatModel),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown config field '{other}' (expected vault_path or chat_model)"
            ))),
        }
    }
}

/// Response to `POST /config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigUpdateReceipt {
    /// Backend status string.
    #[serde(default)]
    pub status: String,
    /// Whether Cortex must restart for the change to take effect.
    #[serde(default)]
    pub requires_restart: bool,
}
