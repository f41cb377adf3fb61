use clap::Parser;

use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.directory, PathBuf::from(DEFAULT_CACHE_DIR));
    assert_eq!(settings.channels.directory, PathBuf::from(DEFAULT_CHANNELS_DIR));
    assert_eq!(settings.site.public_url.as_str(), DEFAULT_PUBLIC_URL);
    assert_eq!(settings.site.home_url, DEFAULT_PUBLIC_URL);
}

#[test]
fn public_url_gains_trailing_slash() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("https://example.com/blog".to_string());
    raw.site.home_url = Some("https://example.com/".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.site.public_url.as_str(), "https://example.com/blog/");
    assert_eq!(settings.site.home_url, "https://example.com/");
}

#[test]
fn relative_public_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.public_url = Some("feeds/".to_string());

    let err = Settings::from_raw(raw).expect_err("relative url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.public_url",
            ..
        }
    ));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn storage_overrides_apply_to_render() {
    let mut raw = RawSettings::default();
    raw.cache.enabled = Some(true);
    let overrides = StorageOverrides {
        channels_directory: Some(PathBuf::from("/srv/channels")),
        cache_directory: Some(PathBuf::from("/var/cache/feeds")),
        cache_enabled: Some(false),
    };

    raw.apply_storage_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.channels.directory, PathBuf::from("/srv/channels"));
    assert_eq!(settings.cache.directory, PathBuf::from("/var/cache/feeds"));
    assert!(!settings.cache.enabled);
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["channelcast"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "channelcast",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--cache-enabled",
        "false",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(serve.overrides.storage.cache_enabled, Some(false));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "channelcast",
        "render",
        "--channels-directory",
        "/tmp/channels",
        "news.atom",
    ]);

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert_eq!(render.segment, "news.atom");
            assert_eq!(
                render.storage.channels_directory.as_deref(),
                Some(std::path::Path::new("/tmp/channels"))
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_drop_cache_arguments() {
    let args = CliArgs::parse_from(["channelcast", "drop-cache", "--format", "atom", "news"]);

    match args.command.expect("drop-cache command") {
        Command::DropCache(drop) => {
            assert_eq!(drop.channel.as_deref(), Some("news"));
            assert_eq!(drop.format.as_deref(), Some("atom"));
        }
        _ => panic!("wrong command parsed"),
    }

    let args = CliArgs::parse_from(["channelcast", "drop-cache"]);
    match args.command.expect("drop-cache command") {
        Command::DropCache(drop) => assert!(drop.channel.is_none()),
        _ => panic!("wrong command parsed"),
    }
}
