use std::env;

use serial_test::serial;

use foodscan::config::{parse_llm_provider_model, Config, KNOWN_LLM_PROVIDERS};

const LLM_VARS: [&str; 6] = [
    "LLM_MODEL",
    "LLM_API_KEY",
    "OPENAI_API_KEY",
    "LLM_BASE_URL",
    "LLM_TIMEOUT",
    "LLM_MAX_RETRIES",
];

fn clear_llm_env() {
    for var in LLM_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_llm_config_openrouter() {
    let (provider, model) = parse_llm_provider_model("openrouter/anthropic/claude-3.5-sonnet");
    assert_eq!(provider, "openrouter");
    assert_eq!(model, "anthropic/claude-3.5-sonnet");
}

#[test]
fn test_llm_config_unknown_prefix_defaults_to_local() {
    let (provider, model) = parse_llm_provider_model("unknown/model-name");
    assert_eq!(provider, "local");
    assert_eq!(model, "unknown/model-name");
}

#[test]
fn test_known_llm_providers_constant() {
    assert!(KNOWN_LLM_PROVIDERS.contains(&"openai"));
    assert!(KNOWN_LLM_PROVIDERS.contains(&"ollama"));
    assert_eq!(KNOWN_LLM_PROVIDERS.len(), 4);
}

#[test]
#[serial]
fn test_llm_defaults_make_a_single_call() {
    clear_llm_env();

    let config = Config::from_env();

    assert_eq!(config.llm.model, "openai/gpt-4o-mini");
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.llm.max_retries, 0);
    assert_eq!(config.llm.max_tokens, 500);
    assert_eq!(config.llm.timeout_secs, 30);
}

#[test]
#[serial]
fn test_openai_api_key_is_a_fallback() {
    clear_llm_env();
    env::set_var("OPENAI_API_KEY", "sk-fallback");

    assert_eq!(
        Config::from_env().llm.api_key.as_deref(),
        Some("sk-fallback")
    );

    env::set_var("LLM_API_KEY", "sk-primary");
    assert_eq!(
        Config::from_env().llm.api_key.as_deref(),
        Some("sk-primary")
    );

    clear_llm_env();
}

#[test]
#[serial]
fn test_invalid_numeric_env_falls_back() {
    clear_llm_env();
    env::set_var("LLM_TIMEOUT", "soon");
    env::set_var("LLM_MAX_RETRIES", "-1");

    let config = Config::from_env();
    assert_eq!(config.llm.timeout_secs, 30);
    assert_eq!(config.llm.max_retries, 0);

    clear_llm_env();
}

#[test]
#[serial]
fn test_server_env_overrides() {
    env::set_var("FOODSCAN_PORT", "8088");
    env::set_var("FOODSCAN_HOST", "127.0.0.1");

    let config = Config::from_env();
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "127.0.0.1");

    env::remove_var("FOODSCAN_PORT");
    env::remove_var("FOODSCAN_HOST");
    let config = Config::from_env();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.host, "0.0.0.0");
}
