//! License gate.
//!
//! The editor only needs a yes/no answer plus a set of feature tokens. The
//! [`LicenseGate`] trait is that contract; [`JwtLicenseGate`] is the
//! implementation used by the binary, verifying an RS256 token offline against
//! the public key from `config.toml`.

use crate::config::{self, ConfigError};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use std::{collections::BTreeSet, path::PathBuf};
use thiserror::Error;

/// Issuer every valid token must carry.
pub const EXPECTED_ISSUER: &str = "git-pal-licensing";

/// Feature token that enables suggestions on save.
pub const PRO: &str = "pro";

/// Opaque capability tokens granted by a license.
///
/// A token that is not present only disables the behavior it would unlock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features(BTreeSet<String>);

impl Features {
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Features {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Features(iter.into_iter().map(Into::into).collect())
    }
}

/// A verified license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub subject: String,
    pub issuer: String,
    pub expires_at: DateTime<Utc>,
    pub features: Features,
    pub purchase_id: Option<String>,
}

/// Why a license was rejected.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load license public key from config: {0}")]
    KeyMaterial(String),

    #[error("License has expired.")]
    Expired,

    #[error("Invalid license issuer.")]
    InvalidIssuer,

    #[error("Invalid license: {0}")]
    Invalid(String),

    #[error("License data is malformed: {0}")]
    Malformed(String),
}

/// Decides whether the editor may run, and with which features.
///
/// Called exactly once per session. Implementations do their own I/O; no
/// retries are expected from the caller.
pub trait LicenseGate {
    fn verify(&self) -> Result<License, LicenseError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    exp: i64,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    purchase_id: Option<String>,
}

/// Offline RS256 verification of the token stored in `config.toml`.
#[derive(Debug, Clone)]
pub struct JwtLicenseGate {
    config_path: Option<PathBuf>,
}

impl JwtLicenseGate {
    /// `config_path` is `None` when no location could be resolved; verification
    /// then fails with [`ConfigError::NoLocation`].
    pub fn new(config_path: Option<PathBuf>) -> Self {
        JwtLicenseGate { config_path }
    }
}

impl LicenseGate for JwtLicenseGate {
    fn verify(&self) -> Result<License, LicenseError> {
        let path = self.config_path.as_deref().ok_or(ConfigError::NoLocation)?;
        let config = config::load(path)?;
        verify_token(&config.license_token, &config.license.public_key)
    }
}

/// Verifies `token` against a PEM-encoded RSA public key.
///
/// `exp` and `iss` are required, the issuer must be [`EXPECTED_ISSUER`], and
/// the signature must be RS256. `exp` and `nbf` are checked with no leeway.
pub fn verify_token(token: &str, public_key_pem: &str) -> Result<License, LicenseError> {
    let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| LicenseError::KeyMaterial(e.to_string()))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[EXPECTED_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<Claims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => LicenseError::Expired,
            ErrorKind::InvalidIssuer => LicenseError::InvalidIssuer,
            ErrorKind::Json(inner) => LicenseError::Malformed(inner.to_string()),
            _ => LicenseError::Invalid(e.to_string()),
        }
    })?;

    let claims = data.claims;
    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| LicenseError::Malformed(format!("exp out of range: {}", claims.exp)))?;

    let license = License {
        subject: claims.sub,
        issuer: claims.iss,
        expires_at,
        features: claims.features.into_iter().collect(),
        purchase_id: claims.purchase_id,
    };

    tracing::info!(
        subject = %license.subject,
        expires_at = %license.expires_at,
        features = ?license.features,
        "license verified"
    );

    Ok(license)
}

#[cfg(test)]
mod tests {
    use super::{EXPECTED_ISSUER, Features, JwtLicenseGate, LicenseError, LicenseGate, verify_token};
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::json;

    const PRIVATE_KEY: &str = include_str!("../tests/fixtures/license_private.pem");
    const PUBLIC_KEY: &str = include_str!("../tests/fixtures/license_public.pem");
    const OTHER_PRIVATE_KEY: &str = include_str!("../tests/fixtures/other_private.pem");

    fn sign(claims: serde_json::Value, private_pem: &str) -> String {
        let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("fixture key");
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).expect("sign")
    }

    fn valid_claims() -> serde_json::Value {
        json!({
            "sub": "test@example.com",
            "iss": EXPECTED_ISSUER,
            "exp": Utc::now().timestamp() + 3600,
            "features": ["pro"],
        })
    }

    #[test]
    fn valid_token_yields_features() {
        let token = sign(valid_claims(), PRIVATE_KEY);
        let license = verify_token(&token, PUBLIC_KEY).expect("token should verify");
        assert_eq!(license.subject, "test@example.com");
        assert_eq!(license.issuer, EXPECTED_ISSUER);
        assert!(license.features.contains("pro"));
        assert!(!license.features.contains("team"));
    }

    #[test]
    fn features_default_to_empty() {
        let token = sign(
            json!({
                "sub": "test@example.com",
                "iss": EXPECTED_ISSUER,
                "exp": Utc::now().timestamp() + 3600,
            }),
            PRIVATE_KEY,
        );
        let license = verify_token(&token, PUBLIC_KEY).expect("token should verify");
        assert!(license.features.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = valid_claims();
        claims["exp"] = json!(Utc::now().timestamp() - 3600);
        let token = sign(claims, PRIVATE_KEY);
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Expired));
        assert_eq!(err.to_string(), "License has expired.");
    }

    #[test]
    fn token_expired_seconds_ago_is_rejected() {
        let mut claims = valid_claims();
        claims["exp"] = json!(Utc::now().timestamp() - 30);
        let token = sign(claims, PRIVATE_KEY);
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Expired));
    }

    #[test]
    fn token_not_yet_valid_is_rejected() {
        let mut claims = valid_claims();
        claims["exp"] = json!(Utc::now().timestamp() + 7200);
        claims["nbf"] = json!(Utc::now().timestamp() + 3600);
        let token = sign(claims, PRIVATE_KEY);
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Invalid(_)));
    }

    #[test]
    fn token_already_valid_passes_nbf() {
        let mut claims = valid_claims();
        claims["nbf"] = json!(Utc::now().timestamp() - 60);
        let token = sign(claims, PRIVATE_KEY);
        assert!(verify_token(&token, PUBLIC_KEY).is_ok());
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut claims = valid_claims();
        claims["iss"] = json!("someone-else");
        let token = sign(claims, PRIVATE_KEY);
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::InvalidIssuer));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = sign(valid_claims(), OTHER_PRIVATE_KEY);
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Invalid(_)));
    }

    #[test]
    fn missing_subject_is_malformed() {
        let token = sign(
            json!({
                "iss": EXPECTED_ISSUER,
                "exp": Utc::now().timestamp() + 3600,
            }),
            PRIVATE_KEY,
        );
        let err = verify_token(&token, PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Malformed(_)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_token("not-a-token", PUBLIC_KEY).unwrap_err();
        assert!(matches!(err, LicenseError::Invalid(_)));
    }

    #[test]
    fn bad_key_material_is_reported() {
        let token = sign(valid_claims(), PRIVATE_KEY);
        let err = verify_token(&token, "not a pem").unwrap_err();
        assert!(matches!(err, LicenseError::KeyMaterial(_)));
    }

    #[test]
    fn gate_reads_config_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.toml");
        let token = sign(valid_claims(), PRIVATE_KEY);
        std::fs::write(
            &path,
            format!(
                "license_token = \"{}\"\n\n[license]\npublic_key = \"\"\"{}\"\"\"\n",
                token, PUBLIC_KEY
            ),
        )
        .expect("failed to write config");

        let license = JwtLicenseGate::new(Some(path)).verify().expect("gate should pass");
        assert!(license.features.contains("pro"));
    }

    #[test]
    fn gate_without_config_fails() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let gate = JwtLicenseGate::new(Some(dir.path().join("config.toml")));
        assert!(matches!(gate.verify(), Err(LicenseError::Config(_))));

        let gate = JwtLicenseGate::new(None);
        assert!(matches!(gate.verify(), Err(LicenseError::Config(_))));
    }

    #[test]
    fn features_collect_from_strings() {
        let features: Features = ["pro", "beta"].into_iter().collect();
        assert_eq!(features.iter().collect::<Vec<_>>(), vec!["beta", "pro"]);
    }
}
