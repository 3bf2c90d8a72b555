//! Credential resolution for both auth modes.
//!
//! Two-factor secrets never touch the parent process environment: they are
//! returned as an explicit overlay that the exec layer passes to the spawn
//! call, so cleanup is structural rather than best-effort.

use serde::Deserialize;

use crate::errors::TaskError;
use crate::inputs::{nonempty, require, AuthInputs, AuthType};

/// Environment variable names fastlane reads for two-factor auth. Fixed by
/// fastlane itself; set only on the fastlane invocation's overlay.
pub const FASTLANE_SESSION_VAR: &str = "FASTLANE_SESSION";
pub const APP_SPECIFIC_PASSWORD_VAR: &str = "FASTLANE_APPLE_APPLICATION_SPECIFIC_PASSWORD";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub app_specific_password: Option<String>,
    pub fastlane_session: Option<String>,
}

impl Credentials {
    pub fn uses_two_factor(&self) -> bool {
        self.app_specific_password.is_some()
    }

    /// Environment overlay for the fastlane invocation. Empty unless
    /// two-factor auth was configured; resolution guarantees the session
    /// token is present whenever the app-specific password is.
    pub fn two_factor_env(&self) -> Vec<(String, String)> {
        let mut env = Vec::new();
        if let Some(ref password) = self.app_specific_password {
            if let Some(ref session) = self.fastlane_session {
                env.push((FASTLANE_SESSION_VAR.to_string(), session.clone()));
                env.push((APP_SPECIFIC_PASSWORD_VAR.to_string(), password.clone()));
            }
        }
        env
    }
}

/// Auth blob published by the host for a named service endpoint, as JSON
/// under `ENDPOINT_AUTH_<name>`.
#[derive(Debug, Deserialize)]
struct EndpointAuth {
    #[serde(default)]
    parameters: EndpointParameters,
}

#[derive(Debug, Default, Deserialize)]
struct EndpointParameters {
    username: Option<String>,
    password: Option<String>,
    #[serde(rename = "appSpecificPassword")]
    app_specific_password: Option<String>,
    #[serde(rename = "fastlaneSession")]
    fastlane_session: Option<String>,
}

pub fn endpoint_auth_var(endpoint: &str) -> String {
    format!("ENDPOINT_AUTH_{endpoint}")
}

pub fn resolve(auth: &AuthInputs) -> Result<Credentials, TaskError> {
    resolve_with(auth, |key| std::env::var(key).ok())
}

/// Resolution with an injectable environment lookup, so the endpoint path
/// is testable without mutating process state.
pub fn resolve_with(
    auth: &AuthInputs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, TaskError> {
    match auth.auth_type()? {
        AuthType::UserAndPass => {
            let username = require(&auth.username, "username")?.to_string();
            let password = require(&auth.password, "password")?.to_string();
            let app_specific_password =
                nonempty(&auth.app_specific_password).map(str::to_string);
            // App-specific-password auth requires a companion session token.
            let fastlane_session = if app_specific_password.is_some() {
                Some(require(&auth.fastlane_session, "fastlaneSession")?.to_string())
            } else {
                nonempty(&auth.fastlane_session).map(str::to_string)
            };
            Ok(Credentials {
                username,
                password,
                app_specific_password,
                fastlane_session,
            })
        }
        AuthType::ServiceEndpoint => {
            let endpoint = require(&auth.service_endpoint, "serviceEndpoint")?;
            let raw = lookup(&endpoint_auth_var(endpoint))
                .ok_or(TaskError::InputRequired("serviceEndpoint"))?;
            let parsed: EndpointAuth = serde_json::from_str(&raw)
                .map_err(|_| TaskError::InputRequired("serviceEndpoint"))?;
            let p = parsed.parameters;
            let username = trimmed(p.username).ok_or(TaskError::InputRequired("username"))?;
            let password = trimmed(p.password).ok_or(TaskError::InputRequired("password"))?;
            let app_specific_password = trimmed(p.app_specific_password);
            let fastlane_session = trimmed(p.fastlane_session);
            // The endpoint carries both two-factor parameters or neither.
            if app_specific_password.is_some() && fastlane_session.is_none() {
                return Err(TaskError::FastlaneSessionEmpty);
            }
            Ok(Credentials {
                username,
                password,
                app_specific_password,
                fastlane_session,
            })
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn userpass(username: &str, password: &str) -> AuthInputs {
        AuthInputs {
            auth_type: Some("UserAndPass".into()),
            username: Some(username.into()),
            password: Some(password.into()),
            ..AuthInputs::default()
        }
    }

    #[test]
    fn userpass_requires_username_then_password() {
        let mut auth = AuthInputs {
            auth_type: Some("UserAndPass".into()),
            ..AuthInputs::default()
        };
        assert!(matches!(
            resolve_with(&auth, |_| None),
            Err(TaskError::InputRequired("username"))
        ));
        auth.username = Some("creds-username".into());
        assert!(matches!(
            resolve_with(&auth, |_| None),
            Err(TaskError::InputRequired("password"))
        ));
    }

    #[test]
    fn app_specific_password_requires_session_input() {
        let mut auth = userpass("creds-username", "creds-password");
        auth.app_specific_password = Some("p@$$w0rd".into());
        assert!(matches!(
            resolve_with(&auth, |_| None),
            Err(TaskError::InputRequired("fastlaneSession"))
        ));
        auth.fastlane_session = Some("session-token".into());
        let creds = resolve_with(&auth, |_| None).unwrap();
        assert!(creds.uses_two_factor());
        let env = creds.two_factor_env();
        assert_eq!(
            env,
            vec![
                (FASTLANE_SESSION_VAR.to_string(), "session-token".to_string()),
                (APP_SPECIFIC_PASSWORD_VAR.to_string(), "p@$$w0rd".to_string()),
            ]
        );
    }

    #[test]
    fn endpoint_without_session_is_a_two_factor_misconfiguration() {
        let auth = AuthInputs {
            auth_type: Some("ServiceEndpoint".into()),
            service_endpoint: Some("MyServiceEndpoint".into()),
            ..AuthInputs::default()
        };
        let blob = r#"{ "parameters": {"username": "creds-username", "password": "creds-password", "appSpecificPassword": "p@$$w0rd" }, "scheme": "whatever" }"#;
        let err = resolve_with(&auth, |key| {
            (key == "ENDPOINT_AUTH_MyServiceEndpoint").then(|| blob.to_string())
        })
        .unwrap_err();
        assert!(matches!(err, TaskError::FastlaneSessionEmpty));
    }

    #[test]
    fn endpoint_with_both_two_factor_parameters_resolves() {
        let auth = AuthInputs {
            auth_type: Some("ServiceEndpoint".into()),
            service_endpoint: Some("MyServiceEndpoint".into()),
            ..AuthInputs::default()
        };
        let blob = r#"{ "parameters": {"username": "creds-username", "password": "creds-password", "appSpecificPassword": "p@$$w0rd", "fastlaneSession": "session-token" } }"#;
        let creds = resolve_with(&auth, |key| {
            (key == "ENDPOINT_AUTH_MyServiceEndpoint").then(|| blob.to_string())
        })
        .unwrap();
        assert_eq!(creds.username, "creds-username");
        assert_eq!(creds.fastlane_session.as_deref(), Some("session-token"));
    }

    #[test]
    fn missing_endpoint_blob_reports_the_endpoint_input() {
        let auth = AuthInputs {
            auth_type: Some("ServiceEndpoint".into()),
            ..AuthInputs::default()
        };
        assert!(matches!(
            resolve_with(&auth, |_| None),
            Err(TaskError::InputRequired("serviceEndpoint"))
        ));

        let named = AuthInputs {
            auth_type: Some("ServiceEndpoint".into()),
            service_endpoint: Some("MyServiceEndpoint".into()),
            ..AuthInputs::default()
        };
        assert!(matches!(
            resolve_with(&named, |_| None),
            Err(TaskError::InputRequired("serviceEndpoint"))
        ));
    }
}
