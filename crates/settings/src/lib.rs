//! Persisted preferences that feed the XML writers and the DTD resolver.
//! 提供 XML 寫入器與 DTD 解析器所需的持久化偏好設定。

pub mod preferences;
mod util;

pub use preferences::{
    PathPreferences, Preferences, PreferencesError, PreferencesStore, ProjectPreferences,
    UserPreferences,
};
pub use util::{write_atomic, write_atomic_with};
