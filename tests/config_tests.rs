use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use marquee::config::Config;
use marquee::domain::{Symbol, SymbolKind};
use marquee::error::{ConfigError, Error};
use marquee::refresh::MIN_INTERVAL;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes())
        .expect("write temp config");
    file
}

#[test]
fn full_config_builds_a_plan() {
    let toml = r#"
[stocks]
symbols = ["aapl", "NVDA"]

[crypto]
symbols = ["BTC-USD"]

[refresh]
interval_secs = 300
timeout_secs = 5
max_retries = 2
priority = 7
staleness_threshold_secs = 600
fetch_concurrency = 2

[display]
show_change = true
show_percentage = false

[logging]
level = "debug"
format = "json"
"#;

    let file = write_temp_config(toml);
    let config = Config::load(file.path()).expect("config loads");

    let plan = config.refresh_plan().expect("plan builds");
    assert_eq!(
        plan.symbols(),
        &[
            Symbol::stock("AAPL"),
            Symbol::stock("NVDA"),
            Symbol::crypto("BTC"),
        ]
    );
    assert_eq!(plan.interval(), Duration::from_secs(300));
    assert_eq!(plan.timeout(), Duration::from_secs(5));
    assert_eq!(plan.max_retries(), 2);
    assert_eq!(plan.priority(), 7);

    let options = config.feed_options();
    assert_eq!(options.staleness_threshold, Duration::from_secs(600));
    assert_eq!(options.fetch_concurrency, 2);

    let render = config.render_options();
    assert!(render.show_change);
    assert!(!render.show_percentage);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn sub_second_interval_is_clamped_not_rejected() {
    let toml = r#"
[stocks]
symbols = ["AAPL"]

[refresh]
interval_secs = 0
"#;

    let file = write_temp_config(toml);
    let config = Config::load(file.path()).expect("config loads");

    let plan = config.refresh_plan().expect("plan builds");
    assert_eq!(plan.interval(), MIN_INTERVAL);
}

#[test]
fn zero_timeout_is_rejected_at_load_time() {
    let toml = r#"
[refresh]
timeout_secs = 0
"#;

    let file = write_temp_config(toml);
    let result = Config::load(file.path());

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "refresh.timeout_secs",
            ..
        })) => {}
        Err(err) => panic!("expected invalid timeout error, got {err}"),
        Ok(_) => panic!("expected zero timeout to be rejected"),
    }
}

#[test]
fn zero_staleness_threshold_is_rejected_at_load_time() {
    let toml = r#"
[refresh]
staleness_threshold_secs = 0
"#;

    let file = write_temp_config(toml);
    let result = Config::load(file.path());

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "refresh.staleness_threshold_secs",
            ..
        }))
    ));
}

#[test]
fn invalid_ticker_is_rejected_at_load_time() {
    let toml = r#"
[stocks]
symbols = ["AA PL"]
"#;

    let file = write_temp_config(toml);
    let result = Config::load(file.path());

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "stocks.symbols",
            ..
        })) => {}
        Err(err) => panic!("expected invalid ticker error, got {err}"),
        Ok(_) => panic!("expected invalid ticker to be rejected"),
    }
}

#[test]
fn missing_file_reports_read_error() {
    let result = Config::load("/nonexistent/marquee.toml");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn malformed_toml_reports_parse_error() {
    let file = write_temp_config("this is not toml [[[");
    let result = Config::load(file.path());
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn duplicate_symbols_collapse_in_the_plan() {
    let toml = r#"
[stocks]
symbols = ["AAPL", "aapl", "NVDA"]
"#;

    let file = write_temp_config(toml);
    let config = Config::load(file.path()).expect("config loads");

    let plan = config.refresh_plan().expect("plan builds");
    assert_eq!(
        plan.symbols(),
        &[Symbol::stock("AAPL"), Symbol::stock("NVDA")]
    );
}

#[test]
fn symbol_kinds_come_from_their_sections() {
    let toml = r#"
[stocks]
symbols = ["COIN"]

[crypto]
symbols = ["BTC"]
"#;

    let file = write_temp_config(toml);
    let config = Config::load(file.path()).expect("config loads");

    let symbols = config.watched_symbols().expect("symbols build");
    assert_eq!(symbols[0].kind(), SymbolKind::Stock);
    assert_eq!(symbols[1].kind(), SymbolKind::Crypto);
}
