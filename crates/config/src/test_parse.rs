#[cfg(test)]
mod tests {
    use std::{fs, path::Path, time::Duration};

    use crate::*; // bring Config and helpers into scope

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = load_from_str(r#"(data_file: "/data/scores.csv")"#, None).unwrap();
        assert_eq!(cfg.data_file, Path::new("/data/scores.csv"));
        assert_eq!(cfg.obs.host, "127.0.0.1");
        assert_eq!(cfg.obs.port, 4455);
        assert_eq!(cfg.obs.password(), None);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.delay(), Duration::from_secs(5));
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert!(cfg.require_connection);
        assert_eq!(cfg.text_input_kind, "text_ft2_source_v2");
        assert!(cfg.mapping.is_empty());
        assert_eq!(cfg, Config::new("/data/scores.csv"));
    }

    #[test]
    fn full_config_parses() {
        let ron = r#"(
            data_file: "/data/scores.csv",
            obs: (host: "10.0.0.41", port: 4456, password: "pw", request_timeout_ms: 750),
            retry: (max_attempts: 5, delay_ms: 10),
            poll_interval_ms: 250,
            reconnect_interval_ms: 2000,
            require_connection: false,
            scene: "Overlay",
            text_input_kind: "text_gdiplus_v2",
            mapping: {
                "P1 Name": "player_1_name",
                "P1 Color": "player_1_color",
            },
            log_level: "debug",
        )"#;
        let cfg = load_from_str(ron, None).unwrap();
        assert_eq!(cfg.obs.host, "10.0.0.41");
        assert_eq!(cfg.obs.password(), Some("pw"));
        assert_eq!(cfg.obs.request_timeout(), Duration::from_millis(750));
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.poll_interval_ms, 250);
        assert!(!cfg.require_connection);
        assert_eq!(cfg.scene.as_deref(), Some("Overlay"));
        assert_eq!(cfg.mapping.len(), 2);
        assert_eq!(cfg.mapping["P1 Color"], "player_1_color");
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_password_means_none() {
        let cfg = load_from_str(r#"(data_file: "x.csv", obs: (password: ""))"#, None).unwrap();
        assert_eq!(cfg.obs.password(), None);
    }

    #[test]
    fn unknown_field_fails() {
        // misspelled poll_interval_ms => pol_interval_ms should error
        let res = load_from_str(r#"(data_file: "x.csv", pol_interval_ms: 5)"#, None);
        assert!(matches!(res, Err(Error::Parse { .. })));
    }

    #[test]
    fn missing_data_file_fails() {
        let res = load_from_str("(poll_interval_ms: 5)", None);
        assert!(matches!(res, Err(Error::Parse { .. })));
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        for (ron, field) in [
            (r#"(data_file: "x.csv", obs: (port: 0))"#, "obs.port"),
            (r#"(data_file: "x.csv", retry: (max_attempts: 0))"#, "retry.max_attempts"),
            (r#"(data_file: "x.csv", poll_interval_ms: 0)"#, "poll_interval_ms"),
            (r#"(data_file: "x.csv", mapping: {"": "col"})"#, "mapping"),
            (r#"(data_file: "x.csv", mapping: {"Src": " "})"#, "mapping"),
        ] {
            match load_from_str(ron, None) {
                Err(Error::Validation { field: f, .. }) => assert_eq!(f, field, "{ron}"),
                other => panic!("expected validation error for {ron}, got {other:?}"),
            }
        }
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(
            &path,
            r#"(data_file: "data/scores.csv", log_file: "csvsync.log")"#,
        )
        .unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.data_file, dir.path().join("data/scores.csv"));
        assert_eq!(cfg.log_file, Some(dir.path().join("csvsync.log")));
    }

    #[test]
    fn load_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(data_file: ").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(err.pretty().contains("config.ron"));

        let wrong_ext = dir.path().join("config.toml");
        assert!(matches!(
            load_from_path(&wrong_ext),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn dump_round_trips() {
        let mut cfg = Config::new("/data/scores.csv");
        cfg.mapping.insert("Score".into(), "score".into());
        cfg.obs.password = Some("pw".into());
        let text = to_ron_string(&cfg).unwrap();
        assert_eq!(load_from_str(&text, None).unwrap(), cfg);
    }

    #[test]
    fn explicit_config_path_wins() {
        let p = resolve_config_path(Some(Path::new("/etc/csvsync.ron"))).unwrap();
        assert_eq!(p, Path::new("/etc/csvsync.ron"));
    }
}
