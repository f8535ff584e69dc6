//! String format validations.

use super::WithMessage;
use crate::core::config::Config;
use crate::core::dataset::{Dataset, IssueDetails};
use crate::core::issue::Requirement;
use crate::core::unit::{Unit, UnitMetadata};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Character classes are spelled out: `\d` and `\w` would match non-ASCII text.
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:[0-9]*\.)?[0-9]+$").expect("decimal pattern"));

static BASE64URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9A-Za-z_-]{4})*(?:[0-9A-Za-z_-]{2}(?:==)?|[0-9A-Za-z_-]{3}=?)?$")
        .expect("base64url pattern")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Za-z_+-]+(?:\.[0-9A-Za-z_+-]+)*@[0-9A-Za-z]+(?:[.-][0-9A-Za-z]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});

static POSSIBLE_JWT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9A-Za-z_-]+\.){2}[0-9A-Za-z_-]+$").expect("jwt pattern"));

/// URL-safe decoder that accepts padded and unpadded input.
const BASE64URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

// ============================================================================
// Pattern Checks
// ============================================================================

/// Validation of a string against a regular expression.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    meta: UnitMetadata,
    label: &'static str,
    pattern: Regex,
}

impl PatternCheck {
    fn new(meta: UnitMetadata, label: &'static str, pattern: Regex) -> Self {
        Self {
            meta: meta.requirement(Requirement::Pattern(pattern.as_str().to_string())),
            label,
            pattern,
        }
    }

    /// The pattern the value must match.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl WithMessage for PatternCheck {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for PatternCheck {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(text) = dataset.value.as_str() {
            if !self.pattern.is_match(text) {
                dataset.raise(&self.meta, self.label, config, IssueDetails::new());
            }
        }
        dataset
    }
}

/// Decimal digits with an optional sign and fraction.
pub fn decimal() -> PatternCheck {
    PatternCheck::new(UnitMetadata::validation("decimal"), "decimal", DECIMAL.clone())
}

/// URL-safe Base64, padded or not.
pub fn base64url() -> PatternCheck {
    PatternCheck::new(UnitMetadata::validation("base64url"), "Base64URL", BASE64URL.clone())
}

/// Email address.
pub fn email() -> PatternCheck {
    PatternCheck::new(UnitMetadata::validation("email"), "email", EMAIL.clone())
}

/// Custom regular expression. The pattern source is reported as `expected`.
pub fn regex(pattern: Regex) -> PatternCheck {
    let meta = UnitMetadata::validation("regex").expects(pattern.as_str().to_string());
    PatternCheck::new(meta, "format", pattern)
}

// ============================================================================
// JWT
// ============================================================================

/// Signing algorithm named in a token header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum JwtAlgorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
    PS256,
    PS384,
    PS512,
    #[serde(rename = "none")]
    None,
}

impl JwtAlgorithm {
    /// Header value of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            JwtAlgorithm::HS256 => "HS256",
            JwtAlgorithm::HS384 => "HS384",
            JwtAlgorithm::HS512 => "HS512",
            JwtAlgorithm::RS256 => "RS256",
            JwtAlgorithm::RS384 => "RS384",
            JwtAlgorithm::RS512 => "RS512",
            JwtAlgorithm::ES256 => "ES256",
            JwtAlgorithm::ES384 => "ES384",
            JwtAlgorithm::ES512 => "ES512",
            JwtAlgorithm::PS256 => "PS256",
            JwtAlgorithm::PS384 => "PS384",
            JwtAlgorithm::PS512 => "PS512",
            JwtAlgorithm::None => "none",
        }
    }
}

impl fmt::Display for JwtAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JwtAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [JwtAlgorithm; 13] = [
            JwtAlgorithm::HS256,
            JwtAlgorithm::HS384,
            JwtAlgorithm::HS512,
            JwtAlgorithm::RS256,
            JwtAlgorithm::RS384,
            JwtAlgorithm::RS512,
            JwtAlgorithm::ES256,
            JwtAlgorithm::ES384,
            JwtAlgorithm::ES512,
            JwtAlgorithm::PS256,
            JwtAlgorithm::PS384,
            JwtAlgorithm::PS512,
            JwtAlgorithm::None,
        ];
        ALL.into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| format!("unknown JWT algorithm '{}'", s))
    }
}

/// Validation of a JSON Web Token.
///
/// Checks the three-segment layout and decodes the header, which must be a
/// JSON object with `typ` set to `"JWT"` and, when an algorithm is given, a
/// matching `alg`. The signature is not verified.
#[derive(Debug, Clone)]
pub struct JwtCheck {
    meta: UnitMetadata,
    algorithm: Option<JwtAlgorithm>,
}

impl JwtCheck {
    /// The required algorithm, if any.
    pub fn algorithm(&self) -> Option<JwtAlgorithm> {
        self.algorithm
    }

    /// Whether `token` is acceptable.
    pub fn accepts(&self, token: &str) -> bool {
        if !POSSIBLE_JWT.is_match(token) {
            return false;
        }
        let Some(encoded) = token.split('.').next() else {
            return false;
        };
        let Ok(bytes) = BASE64URL_LENIENT.decode(encoded) else {
            return false;
        };
        let Ok(serde_json::Value::Object(header)) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            return false;
        };
        if header.get("typ").and_then(|typ| typ.as_str()) != Some("JWT") {
            return false;
        }
        match self.algorithm {
            Some(expected) => header.get("alg").and_then(|alg| alg.as_str()) == Some(expected.as_str()),
            None => true,
        }
    }
}

impl WithMessage for JwtCheck {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for JwtCheck {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(token) = dataset.value.as_str() {
            if !self.accepts(token) {
                dataset.raise(&self.meta, "JWT", config, IssueDetails::new());
            }
        }
        dataset
    }
}

/// JSON Web Token, optionally signed with a specific algorithm.
pub fn jwt(algorithm: Option<JwtAlgorithm>) -> JwtCheck {
    let requirement = match algorithm {
        Some(alg) => Requirement::Algorithm(alg.as_str().to_string()),
        None => Requirement::Pattern(POSSIBLE_JWT.as_str().to_string()),
    };
    JwtCheck {
        meta: UnitMetadata::validation("jwt").requirement(requirement),
        algorithm,
    }
}
