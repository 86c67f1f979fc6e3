use rstest::rstest;
use scale_config::{load_file, load_toml};
use std::fs;
use tempfile::tempdir;

#[rstest]
#[case("[serial]\nport = \"\"\n", "serial.port must not be empty")]
#[case("[serial]\nbaud_rate = 0\n", "serial.baud_rate must be > 0")]
#[case("[serial]\ntimeout_ms = 0\n", "serial.timeout_ms must be >= 1")]
#[case("[parser]\nchunk_size = 0\n", "parser.chunk_size must be in")]
#[case("[parser]\nchunk_size = 65536\n", "parser.chunk_size must be in")]
#[case("[parser]\npace_ms = 60000\n", "parser.pace_ms is unreasonably large")]
#[case("[parser]\nmax_iterations = 0\n", "parser.max_iterations must be >= 1")]
#[case("[parser]\noverall_timeout_ms = 0\n", "parser.overall_timeout_ms must be >= 1")]
#[case("[logging]\nlevel = \"loud\"\n", "logging.level must be one of")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error {err} does not mention {needle}"
    );
}

#[test]
fn accepts_full_config() {
    let toml = r#"
[serial]
port = "/dev/ttyS1"
baud_rate = 19200
timeout_ms = 250

[parser]
chunk_size = 64
pace_ms = 0
max_iterations = 500
overall_timeout_ms = 30000

[logging]
file = "scale.log"
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.serial.port, "/dev/ttyS1");
    assert_eq!(cfg.serial.baud_rate, 19200);
    assert_eq!(cfg.parser.max_iterations, Some(500));
    assert_eq!(cfg.parser.overall_timeout_ms, Some(30_000));
    assert_eq!(cfg.logging.file.as_deref(), Some("scale.log"));
}

#[test]
fn load_file_validates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "[serial]\nbaud_rate = 0\n").unwrap();
    let err = load_file(&path).expect_err("invalid file must fail");
    assert!(format!("{err}").contains("baud_rate"));
}

#[test]
fn load_file_reports_missing_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_file(&path).expect_err("missing file must fail");
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn shipped_sample_config_is_valid() {
    let cfg = scale_config::load_toml(include_str!("../../etc/scale_config.toml")).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.serial.baud_rate, 9600);
    assert_eq!(cfg.parser.max_iterations, None);
}
