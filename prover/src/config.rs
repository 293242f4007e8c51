//! Configuration Module
//!
//! Environment-variable driven, loaded once at startup. Missing values fall
//! back to the reference demo (A = "ABC", B = "AB", existence semantics).

use std::env;

use anyhow::{Context, Result};
use seq_match_circuits::{CircuitContract, MatchSemantics, Visibility};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Matching semantics the circuit is compiled for
    pub semantics: MatchSemantics,

    /// Visibility of the reference sequence B
    pub reference_visibility: Visibility,

    /// Private sequence A
    pub private_sequence: String,

    /// Reference sequence B
    pub reference_sequence: String,

    /// Claimed signal; `None` means "claim the honest value"
    pub expected_signal: Option<u64>,

    /// Seed for a reproducible setup (development only)
    pub setup_seed: Option<u64>,

    /// 환경 (development, staging, production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `MATCH_SEMANTICS`: existence | count | contiguous (default: existence)
    /// - `MATCH_REFERENCE_VISIBILITY`: public | secret (default: public)
    /// - `MATCH_PRIVATE`: private sequence A (default: ABC)
    /// - `MATCH_REFERENCE`: reference sequence B (default: AB)
    /// - `MATCH_EXPECTED`: claimed signal (default: honest value)
    /// - `MATCH_SETUP_SEED`: u64 seed for key generation
    /// - `ENVIRONMENT`: development | staging | production
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let semantics = env::var("MATCH_SEMANTICS")
            .unwrap_or_else(|_| "existence".to_string())
            .parse()
            .context("MATCH_SEMANTICS must be existence, count or contiguous")?;

        let reference_visibility = match env::var("MATCH_REFERENCE_VISIBILITY")
            .unwrap_or_else(|_| "public".to_string())
            .to_lowercase()
            .as_str()
        {
            "public" => Visibility::Public,
            "secret" | "private" => Visibility::Secret,
            other => anyhow::bail!("MATCH_REFERENCE_VISIBILITY must be public or secret, got '{other}'"),
        };

        let expected_signal = env::var("MATCH_EXPECTED")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("MATCH_EXPECTED must be a non-negative integer")?;

        let setup_seed = env::var("MATCH_SETUP_SEED")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("MATCH_SETUP_SEED must be a u64")?;

        let config = Config {
            semantics,
            reference_visibility,
            private_sequence: env::var("MATCH_PRIVATE").unwrap_or_else(|_| "ABC".to_string()),
            reference_sequence: env::var("MATCH_REFERENCE").unwrap_or_else(|_| "AB".to_string()),
            expected_signal,
            setup_seed,
            environment,
        };

        if config.is_production() && config.setup_seed.is_some() {
            anyhow::bail!("MATCH_SETUP_SEED must not be set in production");
        }

        Ok(config)
    }

    /// Contract implied by the configured sequences
    pub fn contract(&self) -> CircuitContract {
        CircuitContract::new(
            self.private_sequence.chars().count(),
            self.reference_sequence.chars().count(),
            self.semantics,
        )
        .with_reference_visibility(self.reference_visibility)
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
