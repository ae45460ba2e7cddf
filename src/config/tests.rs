use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("https://file.example.com".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = ConfigArgs {
        api_base_url: Some("https://cli.example.com".to_string()),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.api.base_url.as_str(), "https://cli.example.com/");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_point_at_standard_endpoints() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.api.base_url.as_str(), DEFAULT_BASE_URL);
    assert_eq!(settings.api.graphql_path, "api/graphql");
    assert_eq!(settings.api.refresh_path, "api/token/refresh");
    assert_eq!(settings.api.login_path, "api/login");
    assert_eq!(settings.api.register_path, "api/register");
    assert_eq!(
        settings.auth.store,
        TokenStoreKind::File(PathBuf::from(DEFAULT_TOKEN_FILE))
    );
    assert_eq!(settings.logging.level, LevelFilter::WARN);
}

#[test]
fn base_url_gains_trailing_slash() {
    let api = ApiSettings::for_base_url("https://example.com/blog").expect("valid url");
    assert_eq!(api.base_url.as_str(), "https://example.com/blog/");
    assert_eq!(
        api.base_url.join(&api.graphql_path).expect("join").as_str(),
        "https://example.com/blog/api/graphql"
    );
}

#[test]
fn leading_slashes_are_stripped_from_paths() {
    let mut raw = RawSettings::default();
    raw.api.refresh_path = Some("/api/token/refresh".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.api.refresh_path, "api/token/refresh");
}

#[test]
fn empty_path_is_rejected() {
    let mut raw = RawSettings::default();
    raw.api.graphql_path = Some("/".to_string());
    let err = Settings::from_raw(raw).expect_err("empty path");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "api.graphql_path",
            ..
        }
    ));
}

#[test]
fn non_http_scheme_is_rejected() {
    let err = ApiSettings::for_base_url("ftp://example.com").expect_err("bad scheme");
    assert!(matches!(err, LoadError::Invalid { key: "api.base_url", .. }));
}

#[test]
fn memory_store_can_be_selected() {
    let mut raw = RawSettings::default();
    raw.auth.store = Some("memory".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.auth.store, TokenStoreKind::Memory);
}

#[test]
fn unknown_store_is_rejected() {
    let mut raw = RawSettings::default();
    raw.auth.store = Some("keychain".to_string());
    let err = Settings::from_raw(raw).expect_err("unknown store");
    assert!(matches!(err, LoadError::Invalid { key: "auth.store", .. }));
}

#[test]
fn token_file_override_applies() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&ConfigArgs {
        token_file: Some(PathBuf::from("/tmp/tokens.json")),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.auth.store,
        TokenStoreKind::File(PathBuf::from("/tmp/tokens.json"))
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&ConfigArgs {
        log_json: Some(true),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(matches!(err, LoadError::Invalid { key: "logging.level", .. }));
}

#[test]
fn config_file_is_layered_under_overrides() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("client.toml");
    std::fs::write(
        &path,
        "[api]\nbase_url = \"https://file.example.com\"\ngraphql_path = \"graphql\"\n\n[auth]\nstore = \"memory\"\n",
    )
    .expect("write config");

    let settings = load(&ConfigArgs {
        config_file: Some(path),
        api_base_url: Some("https://cli.example.com/".to_string()),
        ..Default::default()
    })
    .expect("settings");

    assert_eq!(settings.api.base_url.as_str(), "https://cli.example.com/");
    assert_eq!(settings.api.graphql_path, "graphql");
    assert_eq!(settings.auth.store, TokenStoreKind::Memory);
}
