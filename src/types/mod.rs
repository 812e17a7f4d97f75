//! Wire model for the backend's application snapshot.
//!
//! Field names mirror the backend's JSON casing exactly: PascalCase for the
//! snapshot itself, camelCase for file associations. Every struct defaults
//! missing fields and ignores unknown ones — the backend sends more than
//! this client consumes.

use serde::{Deserialize, Serialize};

/// Authoritative application snapshot from `/api/app-data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppData {
    pub logged_in: bool,
    pub account_data: AccountData,
}

impl AppData {
    /// Whether any account carries a character with this ID.
    pub fn has_character(&self, character_id: i64) -> bool {
        self.account_data
            .accounts
            .iter()
            .flat_map(|account| account.characters.iter())
            .any(|identity| identity.character.character_id == character_id)
    }

    /// Total characters across all accounts.
    pub fn character_count(&self) -> usize {
        self.account_data
            .accounts
            .iter()
            .map(|account| account.characters.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountData {
    pub accounts: Vec<Account>,
    pub associations: Vec<Association>,
}

/// Clone-state tier of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[default]
    Alpha,
    Omega,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Account {
    pub name: String,
    pub status: AccountStatus,
    pub characters: Vec<CharacterIdentity>,
    #[serde(rename = "ID")]
    pub id: i64,
    pub visible: bool,
}

/// One character as attached to an account, with its in-app annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CharacterIdentity {
    pub character: Character,
    pub role: String,
    #[serde(rename = "MCT")]
    pub mct: bool,
    pub training: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    #[serde(rename = "CharacterID")]
    pub character_id: i64,
    #[serde(rename = "CharacterName")]
    pub character_name: String,
}

/// Link between a settings user file and a character file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Association {
    pub user_id: String,
    pub char_id: String,
    pub char_name: String,
}
