// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod schema;
mod loader;
mod store;

pub use schema::*;
pub use loader::{load, settings_path};
pub use store::{SettingKey, SettingValue, SettingsError, SettingsStore};
