//! Session token verification.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use grader_core::config::auth::AuthConfig;
use grader_core::error::AppError;

use super::claims::Claims;
use super::encoder::parse_algorithm;
use super::error::TokenError;

/// Verifies session tokens against the configured key and algorithm.
///
/// Parsing is pure: it never consults the session store. Liveness is the
/// gate's job.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// The only algorithm a token header may declare.
    algorithm: Algorithm,
}

/// The part of a token header read before verification.
#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let algorithm: Algorithm = parse_algorithm(&config.jwt_algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.token_leeway_seconds;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            algorithm,
        })
    }

    /// Verifies signature, algorithm, and expiry, and returns the claims.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let declared = declared_algorithm(token)?;
        if Algorithm::from_str(&declared).ok() != Some(self.algorithm) {
            return Err(TokenError::UnsupportedAlgorithm);
        }
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Reads `alg` from the header segment. Names the library cannot
/// represent, such as `none`, come back as plain strings.
fn declared_algorithm(token: &str) -> Result<String, TokenError> {
    let segment = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("header encoding: {e}")))?;
    let header: DeclaredHeader = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("header: {e}")))?;
    Ok(header.alg)
}

impl fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}
