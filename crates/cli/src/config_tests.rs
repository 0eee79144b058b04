use super::*;

#[test]
fn defaults_apply_when_fields_omitted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "data_root: /tmp/echocast\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.data_root, PathBuf::from("/tmp/echocast"));
    assert_eq!(config.bind_addr, "0.0.0.0:8000");
    assert_eq!(config.retention_cap, echocast_storage::RETENTION_CAP);
    assert_eq!(config.max_retries, 3);
    assert!(config.need_summary);
    assert!(config.llm_providers.is_empty());
}

#[test]
fn provider_candidates_parse_in_declared_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "data_root: /tmp/echocast\n\
         llm_providers:\n\
         \x20\x20- vendor: openai_compatible\n\
         \x20\x20\x20\x20model: gpt-4o-mini\n\
         \x20\x20\x20\x20base_url: https://api.openai.com/v1\n\
         \x20\x20\x20\x20credential_env: OPENAI_API_KEY\n\
         \x20\x20\x20\x20priority: 0\n\
         \x20\x20- vendor: nvidia\n\
         \x20\x20\x20\x20model: meta/llama-3.1-8b-instruct\n\
         \x20\x20\x20\x20credential_env: NVIDIA_API_KEY\n\
         \x20\x20\x20\x20priority: 1\n\
         tts_providers:\n\
         \x20\x20- vendor: bytedance\n\
         \x20\x20\x20\x20credential_env: BYTEDANCE_CREDENTIAL\n\
         \x20\x20\x20\x20priority: 0\n\
         \x20\x20- vendor: edge_tts\n\
         \x20\x20\x20\x20voice: en-US-AriaNeural\n\
         \x20\x20\x20\x20priority: 1\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.llm_providers.len(), 2);
    assert_eq!(config.llm_providers[0].vendor, "openai_compatible");
    assert_eq!(config.llm_providers[1].vendor, "nvidia");
    assert_eq!(config.tts_providers[0].vendor, "bytedance");
    assert_eq!(config.tts_providers[1].voice.as_deref(), Some("en-US-AriaNeural"));
}

#[test]
fn missing_file_is_a_read_error() {
    let err = Config::load(Path::new("/nonexistent/echocast.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "data_root: [unterminated\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
