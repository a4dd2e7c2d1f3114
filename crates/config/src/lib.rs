//! Configuration types and loading for csvsync.
//!
//! A config file is a single RON struct. Only `data_file` is required:
//!
//! ```ron
//! (
//!     data_file: "scoreboard.csv",
//!     obs: (host: "127.0.0.1", port: 4455, password: "secret"),
//!     mapping: {
//!         "Player 1 Name": "player_1_name",
//!         "Player 1 Color": "player_1_color",
//!     },
//! )
//! ```

use std::{
    env,
    path::{Path, PathBuf},
};

mod defaults;
mod error;
mod loader;
mod types;

#[cfg(test)]
mod test_parse;

pub use error::Error;
pub use loader::{load_from_path, load_from_str, to_ron_string};
pub use types::{Config, FieldMapping, Obs, Retry};

/// Determine the preferred user config path (`~/.csvsync/config.ron`).
pub fn default_config_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".csvsync");
    p.push("config.ron");
    p
}

/// Resolve the effective config path using the default policy.
///
/// Policy:
/// 1) Use `explicit` when provided.
/// 2) Else use `~/.csvsync/config.ron` when it exists.
/// 3) Else return a clear "no config found" error.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let preferred = default_config_path();
    if preferred.exists() {
        return Ok(preferred);
    }

    Err(Error::Read {
        path: Some(preferred),
        message: "No config found. Create ~/.csvsync/config.ron or pass --config <PATH>"
            .to_string(),
    })
}
