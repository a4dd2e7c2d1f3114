//! Subcommand implementations.

use std::{fmt::Write, path::Path};

use config::Config;
use obs_client::Client;
use sync_engine::{
    Runner, SourceKind, columns, connect_options, extract_file, record, sync_once,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{error::Result, signal};

/// Watch and sync until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();
    signal::cancel_on_shutdown(cancel.clone());
    let client = Client::new(connect_options(&config));
    let mut runner = Runner::new(config, client, cancel);
    runner.run().await?;
    Ok(())
}

/// Push the current data once. Returns whether every source updated.
pub async fn sync(config: &Config) -> Result<bool> {
    let client = Client::new(connect_options(config));
    let ok = sync_once(config, client).await?;
    info!(success = ok, "One-shot sync finished");
    Ok(ok)
}

/// Render the validated configuration, as RON when `dump` is set.
pub fn check(config: &Config, dump: bool) -> Result<String> {
    if dump {
        Ok(config::to_ron_string(config)?)
    } else {
        Ok("OK".to_string())
    }
}

/// Render the columns of `path`, grouped by prefix.
pub fn columns(path: &Path) -> Result<String> {
    let cols = record::columns(path)?;
    let mut out = String::new();
    for group in columns::group_columns(&cols) {
        let _ignored = writeln!(out, "{}:", group.label());
        for col in &group.columns {
            let _ignored = writeln!(out, "  {col}");
        }
    }
    Ok(out)
}

/// Render a starter config for `path` with one suggested source per column.
pub fn suggest(path: &Path) -> Result<String> {
    let cols = record::columns(path)?;
    let mut cfg = Config::new(path);
    cfg.mapping = columns::suggest_mapping(&cols);
    Ok(config::to_ron_string(&cfg)?)
}

/// Render the desired state the current data would produce.
pub fn preview(config: &Config) -> Result<String> {
    let desired = extract_file(&config.data_file, &config.mapping)?;
    if desired.is_empty() {
        return Ok("Nothing mapped\n".to_string());
    }
    let width = desired.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (source, value) in &desired {
        let kind = SourceKind::from_source_name(source).input_kind(&config.text_input_kind);
        let _ignored = writeln!(out, "{source:<width$}  {kind:<18} {value}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn data_dir(csv: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.csv");
        fs::write(&data, csv).unwrap();
        (dir, Config::new(data))
    }

    #[test]
    fn columns_are_grouped() {
        let (_d, cfg) = data_dir("player_1_name,player_1_color,round\nAda,FF5733,3\n");
        let out = columns(&cfg.data_file).unwrap();
        assert_eq!(out, "Player 1:\n  player_1_name\n  player_1_color\nOther:\n  round\n");
    }

    #[test]
    fn suggestion_is_a_loadable_config() {
        let (_d, cfg) = data_dir("player_1_name,round\n");
        let text = suggest(&cfg.data_file).unwrap();
        let parsed = config::load_from_str(&text, None).unwrap();
        assert_eq!(parsed.mapping["Player 1 Name"], "player_1_name");
        assert_eq!(parsed.mapping["Round"], "round");
        assert_eq!(parsed.data_file, cfg.data_file);
    }

    #[test]
    fn preview_lists_typed_values() {
        let (_d, mut cfg) = data_dir("player_1_name,player_1_color\nAda,FF5733\n");
        cfg.mapping.insert("P1 Name".into(), "player_1_name".into());
        cfg.mapping.insert("P1 Color".into(), "player_1_color".into());
        let out = preview(&cfg).unwrap();
        assert!(out.contains("color_source_v3"));
        assert!(out.contains("0xFF3357FF"));
        assert!(out.contains("\"Ada\""));
    }

    #[test]
    fn preview_without_mapping() {
        let (_d, cfg) = data_dir("a\n1\n");
        assert_eq!(preview(&cfg).unwrap(), "Nothing mapped\n");
    }

    #[test]
    fn check_dump_round_trips() {
        let (_d, cfg) = data_dir("a\n1\n");
        assert_eq!(check(&cfg, false).unwrap(), "OK");
        let dumped = check(&cfg, true).unwrap();
        assert_eq!(config::load_from_str(&dumped, None).unwrap(), cfg);
    }
}
