//! Parse and load user configuration.

use std::{ffi::OsStr, fs, path::Path};

use ron::{Options, extensions::Extensions, ser::PrettyConfig};
use tracing::debug;

use crate::{Config, Error};

/// RON options used for config files: `Some(..)` may be omitted around optional values.
fn ron_options() -> Options {
    Options::default().with_default_extension(Extensions::IMPLICIT_SOME)
}

/// Parse and validate a config from RON text.
///
/// Relative paths are resolved against `base` when provided.
pub fn load_from_str(text: &str, base: Option<&Path>) -> Result<Config, Error> {
    let mut config: Config = ron_options()
        .from_str(text)
        .map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })?;
    if let Some(base) = base {
        config.resolve_paths(base);
    }
    config.validate()?;
    Ok(config)
}

/// Load a fully resolved `Config` from a RON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported config format (expected a .ron file)".to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    debug!("Loading config from {}", path.display());
    load_from_str(&text, Some(base)).map_err(|e| e.with_path(path))
}

/// Render a config back to pretty RON, for `check --dump`.
pub fn to_ron_string(config: &Config) -> Result<String, Error> {
    ron_options()
        .to_string_pretty(config, PrettyConfig::default())
        .map_err(|e| Error::Parse {
            path: None,
            message: e.to_string(),
        })
}
