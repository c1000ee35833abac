//! Issuer policy for verified bearer tokens.
//!
//! Token verification (JWKS, signature, expiry) happens upstream; this crate
//! starts from the verified [`ClaimSet`] and decides whether it satisfies the
//! rules derived from the token's [`Issuer`].
//!
//! ```
//! use dusseldorf_auth::{AzureIssuer, ClaimRuleEvaluator, ClaimSet, Issuer};
//! use serde_json::json;
//! use url::Url;
//!
//! let issuer: Issuer = AzureIssuer::new(
//!     "https://login.microsoftonline.com/tenant/v2.0",
//!     Url::parse("https://login.microsoftonline.com/tenant/discovery/v2.0/keys").unwrap(),
//!     "api://k9-sak",
//!     "azure",
//! )
//! .with_required_groups(["g1"])
//! .into();
//!
//! let evaluator = ClaimRuleEvaluator::for_issuer(&issuer);
//! let claims = ClaimSet::from_value(json!({"aud": "api://k9-sak", "groups": ["g1", "g2"]}));
//! assert!(evaluator.evaluate(&claims).is_authorized());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod claims;
pub mod config;
pub mod evaluator;
pub mod issuer;
pub mod rule;

pub use claims::{ClaimName, ClaimSet};
pub use config::{ConfigError, IssuerConfig, Issuers};
pub use evaluator::{ClaimRuleEvaluator, Verdict, evaluate};
pub use issuer::{AzureIssuer, DeriveClaimRules, Issuer, StandardIssuer};
pub use rule::{AzureClaimRules, ClaimRule, ClaimRules, RuleKind, StandardClaimRules};
