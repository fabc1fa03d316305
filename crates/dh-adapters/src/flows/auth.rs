//! Flujo de verificación de autenticación contra el warehouse.
//!
//! Cinco pasos: emisión del JWT, lectura de secretos, armado de cabeceras,
//! sonda de disponibilidad y casos negativos. Los tres intermedios dependen
//! del anterior; el de casos negativos corre siempre.

use std::rc::Rc;
use std::time::Instant;

use chrono::Utc;
use dh_core::{probe_query, FlowDefinition, StepResult, StepStatus};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AuthCollaborators;
use crate::auth::{AuthHeaders, AUTHORIZATION, TOKEN_TYPE_HEADER};

pub const JWT_STEP: &str = "🔑 Step 1: Testing JWT token generation";
pub const SECRETS_STEP: &str = "🔐 Step 2: Testing Key Vault access";
pub const HEADERS_STEP: &str = "🌐 Step 3: Testing APIM headers setup";
pub const HEALTH_STEP: &str = "🏥 Step 4: Testing DataHive service health check";
pub const ERRORS_STEP: &str = "⚠️ Step 5: Testing error scenarios";

pub const INVALID_TABLE_QUERY: &str = "SELECT * FROM INVALID_TABLE_NAME_12345";
pub const EMPTY_QUERY: &str = "";

/// Nombres de secretos y datos de cuenta que el flujo reporta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    pub account: String,
    pub user: String,
    pub private_key_secret: String,
    pub subscription_secret: String,
    pub vault_url: String,
    pub gateway_header: String,
}

pub fn auth_flow(collaborators: AuthCollaborators, settings: AuthSettings) -> FlowDefinition {
    let c = Rc::new(collaborators);
    let s = Rc::new(settings);
    let (c1, s1) = (c.clone(), s.clone());
    let (c2, s2) = (c.clone(), s.clone());
    let (c3, s3) = (c.clone(), s);
    let (c4, c5) = (c.clone(), c);
    FlowDefinition::builder("datahive-auth").independent(JWT_STEP, move |_| Ok(jwt_generation(&c1, &s1)))
                                            .then(SECRETS_STEP, move |_| Ok(secret_retrieval(&c2, &s2)))
                                            .then(HEADERS_STEP, move |_| Ok(header_assembly(&c3, &s3)))
                                            .then(HEALTH_STEP, move |_| Ok(liveness_check(&c4)))
                                            .always(ERRORS_STEP, move |_| Ok(negative_path(&c5)))
                                            .build()
}

/// Sólo la sonda de disponibilidad.
pub fn health_check_only(collaborators: AuthCollaborators) -> FlowDefinition {
    FlowDefinition::builder("datahive-health").independent(HEALTH_STEP, move |_| Ok(liveness_check(&collaborators)))
                                              .build()
}

/// Sólo la emisión del token.
pub fn jwt_only(collaborators: AuthCollaborators, settings: AuthSettings) -> FlowDefinition {
    FlowDefinition::builder("datahive-jwt").independent(JWT_STEP, move |_| Ok(jwt_generation(&collaborators, &settings)))
                                           .build()
}

/// Un JWT compacto tiene exactamente tres segmentos separados por puntos.
pub fn is_compact_jwt(token: &str) -> bool {
    token.split('.').count() == 3
}

pub fn jwt_generation(c: &AuthCollaborators, s: &AuthSettings) -> StepResult {
    let started = Instant::now();
    let mut r = StepResult::info(JWT_STEP);
    match c.tokens.generate_token() {
        Ok(token) if token.trim().is_empty() => r.fail("❌ JWT token generation returned null or empty result"),
        Ok(token) if !is_compact_jwt(&token) => {
            r.fail("❌ Invalid JWT token format - expected 3 parts separated by dots");
            r.set_structured_data("tokenParts", json!(token.split('.').count()));
        }
        Ok(token) => {
            let ms = started.elapsed().as_millis();
            r.set_status(StepStatus::Success);
            r.add_detail(format!("✅ JWT token generated successfully in {ms}ms (Length: {} characters)",
                                 token.len()));
            r.set_structured_data("jwtToken", json!(format!("<redacted: {} chars>", token.len())));
            r.set_structured_data("tokenLength", json!(token.len()));
            r.set_structured_data("tokenParts", json!(3));
            r.set_structured_data("account", json!(s.account));
            r.set_structured_data("user", json!(s.user));
        }
        Err(e) => {
            warn!("token generation failed: {e}");
            r.fail(format!("❌ JWT token generation failed: {e}"));
        }
    }
    r.record_elapsed(started.elapsed());
    r
}

pub fn secret_retrieval(c: &AuthCollaborators, s: &AuthSettings) -> StepResult {
    let started = Instant::now();
    let mut r = StepResult::info(SECRETS_STEP);
    let fetched = c.secrets
                   .get_secret(&s.private_key_secret, &s.vault_url)
                   .and_then(|key| Ok((key, c.secrets.get_secret(&s.subscription_secret, &s.vault_url)?)));
    match fetched {
        Ok((key, sub)) => {
            let key_ok = !key.trim().is_empty();
            let sub_ok = !sub.trim().is_empty();
            if key_ok && sub_ok {
                r.set_status(StepStatus::Success);
                r.add_detail(format!("✅ Successfully retrieved secrets from Key Vault in {}ms",
                                     started.elapsed().as_millis()));
            } else {
                r.fail("❌ Failed to retrieve required secrets from Azure Key Vault");
            }
            r.set_structured_data("privateKeyRetrieved", json!(key_ok));
            r.set_structured_data("apimKeyRetrieved", json!(sub_ok));
        }
        Err(e) => {
            warn!("secret retrieval failed: {e}");
            r.fail(format!("❌ Key Vault access failed: {e}"));
        }
    }
    r.set_structured_data("keyVaultUrl", json!(s.vault_url));
    r.record_elapsed(started.elapsed());
    r
}

pub fn header_assembly(c: &AuthCollaborators, s: &AuthSettings) -> StepResult {
    let started = Instant::now();
    let mut r = StepResult::info(HEADERS_STEP);
    let assembled = c.tokens.generate_token().and_then(|token| {
                                                  let key = c.secrets.get_secret(&s.subscription_secret, &s.vault_url)?;
                                                  Ok(AuthHeaders::build(&token, &s.gateway_header, &key))
                                              });
    match assembled {
        Ok(headers) => {
            let has_auth = headers.contains(AUTHORIZATION);
            let has_type = headers.contains(TOKEN_TYPE_HEADER);
            let has_gateway = headers.contains(&s.gateway_header);
            debug!("assembled headers: {:?}", headers.names().collect::<Vec<_>>());
            if has_auth && has_type {
                r.set_status(StepStatus::Success);
                r.add_detail(format!("✅ APIM headers configured successfully in {}ms",
                                     started.elapsed().as_millis()));
                if !has_gateway {
                    r.add_detail(format!("ℹ️ {} header not set (subscription key is blank)", s.gateway_header));
                }
            } else {
                r.fail("❌ Failed to setup required APIM headers");
            }
            r.set_structured_data("headersCreated", json!(headers.len()));
            r.set_structured_data("hasAuthorizationHeader", json!(has_auth));
            r.set_structured_data("hasSnowflakeTokenType", json!(has_type));
        }
        Err(e) => {
            warn!("header assembly failed: {e}");
            r.fail(format!("❌ APIM headers setup failed: {e}"));
        }
    }
    r.record_elapsed(started.elapsed());
    r
}

pub fn liveness_check(c: &AuthCollaborators) -> StepResult {
    let started = Instant::now();
    let available = c.warehouse.is_service_available();
    let mut r = if available {
        StepResult::success(HEALTH_STEP,
                            format!("✅ DataHive service is available and responsive in {}ms",
                                    started.elapsed().as_millis()))
    } else {
        StepResult::failed(HEALTH_STEP, "❌ DataHive service is not available or not responding")
    };
    r.set_structured_data("serviceAvailable", json!(available));
    r.set_structured_data("timestamp", json!(Utc::now().to_rfc3339()));
    r.record_elapsed(started.elapsed());
    r
}

/// Las dos consultas inválidas deben fallar en el colaborador; cada fallo
/// cuenta como caso superado. Basta con la mitad (división entera).
pub fn negative_path(c: &AuthCollaborators) -> StepResult {
    let started = Instant::now();
    let invalid_handled = probe_query(&*c.warehouse, INVALID_TABLE_QUERY).faulted();
    let empty_handled = probe_query(&*c.warehouse, EMPTY_QUERY).faulted();
    let attempted = 2usize;
    let passed = usize::from(invalid_handled) + usize::from(empty_handled);

    let mut r = if passed >= attempted / 2 {
        StepResult::success(ERRORS_STEP,
                            format!("✅ Error handling validated: {passed}/{attempted} tests passed in {}ms",
                                    started.elapsed().as_millis()))
    } else {
        StepResult::failed(ERRORS_STEP, "❌ Error handling validation failed - unexpected behavior detected")
    };
    r.set_structured_data("errorTestsRun", json!(attempted));
    r.set_structured_data("errorTestsPassed", json!(passed));
    r.set_structured_data("errorDetails",
                          json!({ "invalidQueryHandled": invalid_handled, "emptyQueryHandled": empty_handled }));
    r.record_elapsed(started.elapsed());
    r
}
