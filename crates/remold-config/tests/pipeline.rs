//! End-to-end tests: TOML configuration plus a data document through a
//! configured decoder.

use std::time::Duration;

use remold_config::{ConfigError, decode_file, load_file};
use remold_core::{RecordShape, Shape, Value};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn service_shape() -> Shape {
    Shape::Record(
        RecordShape::new("Service")
            .field("listen", Shape::AddrPort)
            .field("timeout", Shape::Duration)
            .field("peers", Shape::seq(Shape::Ip))
            .field("tags", Shape::seq(Shape::Text))
            .field("retries", Shape::U8)
            .field("verbose", Shape::Bool),
    )
}

#[test]
fn test_toml_document_through_configured_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(
        &dir,
        "remold.toml",
        r#"
        [decode]
        hooks = ["string_to_slice", "string_to_duration", "string_to_addr_port", "string_to_ip"]
        slice_delimiter = ";"
        weakly_typed = true
        "#,
    );
    let doc_path = write(
        &dir,
        "service.toml",
        r#"
        listen = "127.0.0.1:9000"
        timeout = "1.5s"
        peers = ["10.0.0.1", "10.0.0.2"]
        tags = "edge;canary"
        retries = "3"
        verbose = 1
        "#,
    );

    let config = load_file(&config_path).unwrap();
    let decoder = config.decode.build_decoder().unwrap();
    let Value::Record(service) = decode_file(&doc_path, &service_shape(), &decoder).unwrap()
    else {
        panic!("expected record");
    };

    assert_eq!(
        service.get("listen"),
        Some(&Value::AddrPort("127.0.0.1:9000".parse().unwrap()))
    );
    let Some(Value::Duration(timeout)) = service.get("timeout") else {
        panic!("expected duration");
    };
    assert_eq!(timeout.to_std().unwrap(), Duration::from_millis(1500));
    assert_eq!(
        service.get("peers"),
        Some(&Value::Seq(vec![
            Value::Ip("10.0.0.1".parse().unwrap()),
            Value::Ip("10.0.0.2".parse().unwrap()),
        ]))
    );
    assert_eq!(service.get("tags"), Some(&Value::seq(["edge", "canary"])));
    assert_eq!(service.get("retries"), Some(&Value::U8(3)));
    assert_eq!(service.get("verbose"), Some(&Value::Bool(true)));
}

#[test]
fn test_strict_pipeline_reports_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(
        &dir,
        "remold.toml",
        "[decode]\nhooks = [\"string_to_duration\", \"string_to_ip\"]\n",
    );
    let doc_path = write(
        &dir,
        "service.json",
        r#"{"timeout": "soon", "peers": ["not-an-ip"], "retries": 300}"#,
    );

    let decoder = load_file(&config_path)
        .unwrap()
        .decode
        .build_decoder()
        .unwrap();
    let err = decode_file(&doc_path, &service_shape(), &decoder).unwrap_err();
    assert!(matches!(err, ConfigError::Decode(_)));

    let message = err.to_string();
    assert!(message.starts_with("3 error(s) decoding:"), "{message}");
    assert!(message.contains("'timeout'"), "{message}");
    assert!(message.contains("'peers[0]'"), "{message}");
    assert!(message.contains("'retries'"), "{message}");
}

#[test]
fn test_unknown_hook_name_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write(&dir, "remold.toml", "[decode]\nhooks = [\"string_to_yaml\"]\n");
    let config = load_file(&config_path).unwrap();
    assert!(matches!(
        config.decode.build_decoder(),
        Err(ConfigError::UnknownHook { .. })
    ));
}
