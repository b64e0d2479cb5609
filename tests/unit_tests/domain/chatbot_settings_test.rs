use chatforge::domain::{
    AnalyticsDelta, ChatbotAnalytics, ChatbotSettings, DeploymentStatus, ModelParameters,
};

fn defaults() -> ModelParameters {
    ModelParameters {
        model: "gpt-4o-mini".to_string(),
        temperature: 0.7,
        max_tokens: 1024,
    }
}

#[test]
fn given_default_settings_when_resolving_then_service_defaults_apply() {
    let resolved = ChatbotSettings::default().resolve(&defaults());

    assert_eq!(resolved, defaults());
}

#[test]
fn given_overrides_when_resolving_then_chatbot_values_win() {
    let settings = ChatbotSettings {
        model: Some("gpt-4o".to_string()),
        temperature: Some(0.2),
        max_tokens: Some(256),
        ..ChatbotSettings::default()
    };

    let resolved = settings.resolve(&defaults());

    assert_eq!(resolved.model, "gpt-4o");
    assert_eq!(resolved.temperature, 0.2);
    assert_eq!(resolved.max_tokens, 256);
}

#[test]
fn given_unusable_overrides_when_resolving_then_they_fall_back_or_clamp() {
    let settings = ChatbotSettings {
        model: Some("   ".to_string()),
        temperature: Some(9.0),
        max_tokens: Some(0),
        ..ChatbotSettings::default()
    };

    let resolved = settings.resolve(&defaults());

    assert_eq!(resolved.model, "gpt-4o-mini");
    assert_eq!(resolved.temperature, 2.0);
    assert_eq!(resolved.max_tokens, 1024);
}

#[test]
fn given_nan_temperature_when_resolving_then_default_is_used() {
    let settings = ChatbotSettings {
        temperature: Some(f32::NAN),
        ..ChatbotSettings::default()
    };

    assert_eq!(settings.resolve(&defaults()).temperature, 0.7);
}

#[test]
fn given_deltas_when_applied_then_counters_accumulate() {
    let mut analytics = ChatbotAnalytics::default();
    let now = chrono::Utc::now();

    analytics.apply(AnalyticsDelta::new_session(), now);
    analytics.apply(AnalyticsDelta::exchange(), now);
    analytics.apply(AnalyticsDelta::exchange(), now);

    assert_eq!(analytics.total_sessions, 1);
    assert_eq!(analytics.total_messages, 2);
    assert_eq!(analytics.total_responses, 2);
    assert_eq!(analytics.last_active_at, Some(now));
    assert!(AnalyticsDelta::default().is_empty());
}

#[test]
fn given_deployment_statuses_when_checking_chat_then_only_paused_refuses() {
    assert!(DeploymentStatus::Draft.accepts_chat());
    assert!(DeploymentStatus::Deployed.accepts_chat());
    assert!(!DeploymentStatus::Paused.accepts_chat());
    assert_eq!(
        "PAUSED".parse::<DeploymentStatus>(),
        Ok(DeploymentStatus::Paused)
    );
    assert!("paused".parse::<DeploymentStatus>().is_err());
}
