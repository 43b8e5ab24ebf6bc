use crate::config::{
    Config, ConfigError, MockSecretSource, ProcessEnv, Registry, Role, SecretSource,
};
use mockall::predicate::*;
use serial_test::serial;
use std::env;

fn registry_with(source_key: Option<&str>, target_key: Option<&str>) -> Registry<MockSecretSource> {
    let source_key = source_key.map(str::to_string);
    let target_key = target_key.map(str::to_string);

    let mut secrets = MockSecretSource::new();
    secrets
        .expect_lookup()
        .with(eq("SOURCE_SERVICE_KEY"))
        .returning(move |_| source_key.clone());
    secrets
        .expect_lookup()
        .with(eq("TARGET_SERVICE_KEY"))
        .returning(move |_| target_key.clone());

    Registry::from_config(&Config::default(), secrets)
}

#[test]
fn resolve_returns_profile_when_credential_present() {
    let registry = registry_with(Some("prod-key"), Some("dev-key"));

    let source = registry.resolve(Role::Source).unwrap();
    assert_eq!(source.name, "Production");
    assert_eq!(source.endpoint, "https://detailing-prod.supabase.co");
    assert_eq!(source.credential.expose(), "prod-key");

    let target = registry.resolve(Role::Target).unwrap();
    assert_eq!(target.name, "Development");
    assert_eq!(target.credential.expose(), "dev-key");
}

#[test]
fn resolve_fails_when_credential_unset() {
    let registry = registry_with(None, Some("dev-key"));

    let err = registry.resolve(Role::Source).unwrap_err();
    match err {
        ConfigError::MissingCredential { role, variable } => {
            assert_eq!(role, Role::Source);
            assert_eq!(variable, "SOURCE_SERVICE_KEY");
        }
        other => panic!("expected MissingCredential, got {:?}", other),
    }
    assert!(registry.resolve(Role::Target).is_ok());
}

#[test]
fn resolve_fails_when_credential_empty_or_blank() {
    for blank in ["", "   ", "\n"] {
        let registry = registry_with(Some("prod-key"), Some(blank));
        assert!(
            matches!(
                registry.resolve(Role::Target),
                Err(ConfigError::MissingCredential {
                    role: Role::Target,
                    ..
                })
            ),
            "credential {:?} should be rejected",
            blank
        );
    }
}

#[test]
fn missing_credential_message_names_variable() {
    let registry = registry_with(None, None);
    let message = registry.resolve(Role::Target).unwrap_err().to_string();
    assert!(message.contains("TARGET_SERVICE_KEY"), "got: {}", message);
    assert!(message.contains("target"), "got: {}", message);
}

#[test]
fn profile_debug_never_prints_credential() {
    let registry = registry_with(Some("super-secret-value"), None);
    let profile = registry.resolve(Role::Source).unwrap();
    let rendered = format!("{:?}", profile);
    assert!(!rendered.contains("super-secret-value"));
}

#[test]
#[serial]
fn process_env_reads_environment_variables() {
    unsafe {
        env::set_var("DETAIL_OPS_TEST_SECRET", "from-env");
    }

    assert_eq!(
        ProcessEnv.lookup("DETAIL_OPS_TEST_SECRET"),
        Some("from-env".to_string())
    );

    unsafe {
        env::remove_var("DETAIL_OPS_TEST_SECRET");
    }
    assert_eq!(ProcessEnv.lookup("DETAIL_OPS_TEST_SECRET"), None);
}
