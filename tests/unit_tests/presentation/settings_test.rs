use config::{Config, File, FileFormat};

use chatforge::infrastructure::crawler::DEFAULT_MAX_PAGE_BYTES;
use chatforge::presentation::{Environment, Settings};

#[test]
fn given_known_names_when_parsing_environment_then_aliases_are_accepted() {
    let cases = [
        ("local", Environment::Local),
        ("Development", Environment::Local),
        ("test", Environment::Test),
        (" PROD ", Environment::Prod),
        ("production", Environment::Prod),
    ];

    for (raw, expected) in cases {
        let parsed = Environment::try_from(raw.to_string()).expect("known environment");
        assert_eq!(parsed, expected, "{raw:?}");
    }
}

#[test]
fn given_unknown_name_when_parsing_environment_then_error_names_it() {
    let error = Environment::try_from("staging".to_string()).expect_err("rejected");

    assert!(error.contains("staging"));
}

#[test]
fn given_default_settings_when_deriving_service_options_then_section_values_are_used() {
    let settings = Settings::default();

    let rag = settings.rag_options();
    assert_eq!(rag.top_k, 5);
    assert_eq!(rag.similarity_threshold, 0.7);
    assert_eq!(rag.max_context_tokens, 3000);
    assert_eq!(rag.history_limit, 10);

    let model = settings.model_defaults();
    assert_eq!(model.model, settings.llm.model);
    assert_eq!(model.temperature, settings.llm.temperature);
    assert_eq!(model.max_tokens, settings.llm.max_tokens);

    assert_eq!(settings.ingestion.queue_capacity, 100);
    assert_eq!(settings.ingestion.max_upload_bytes, 20 * 1024 * 1024);
    assert_eq!(settings.crawler.max_pages, 20);
    assert_eq!(settings.crawler.max_page_bytes, DEFAULT_MAX_PAGE_BYTES);
}

#[test]
fn given_partial_toml_when_deserializing_then_missing_keys_fall_back_to_defaults() {
    let toml = r#"
        [server]
        port = 8080

        [rag]
        top_k = 8
        similarity_threshold = 0.5

        [logging]
        json_format = true
    "#;

    let settings: Settings = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .expect("config built")
        .try_deserialize()
        .expect("settings deserialized");

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.rag.top_k, 8);
    assert_eq!(settings.rag.similarity_threshold, 0.5);
    assert_eq!(settings.rag.history_limit, 10);
    assert_eq!(settings.chunking.chunk_size, 1000);
    assert!(settings.logging.json_format);
}

#[test]
fn given_settings_when_building_tracing_config_then_environment_and_format_carry_over() {
    let mut settings = Settings::default();
    settings.environment = Environment::Prod;
    settings.logging.json_format = true;
    settings.logging.filter = "warn".to_string();

    let tracing = settings.tracing_config();

    assert_eq!(tracing.environment, "prod");
    assert!(tracing.json_format);
    assert_eq!(tracing.default_filter, "warn");
}
