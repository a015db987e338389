//! # Ledger Configuration
//!
//! Unified configuration for the ledger runtime.
//!
//! ## Requirements
//!
//! - The approver allow-list MUST NOT be empty
//! - The quorum threshold MUST be reachable by the allow-list

use dl_02_approval_quorum::{ApproverSet, QuorumConfig};
use shared_types::{ErrorKind, ReportableError};
use std::path::PathBuf;
use thiserror::Error;

/// Default approver allow-list.
pub const DEFAULT_APPROVERS: [&str; 3] = ["admin1", "admin2", "admin3"];

/// Default maximum number of submitted records per owner.
pub const DEFAULT_SUBMISSION_CAP: u32 = 3;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No approver may commit anything.
    #[error("Approver allow-list is empty")]
    EmptyAllowList,

    /// A zero threshold would commit without votes.
    #[error("Quorum threshold must be at least 1")]
    ZeroThreshold,

    /// More votes required than there are allowed approvers.
    #[error("Quorum threshold {threshold} exceeds allow-list size {approvers}")]
    UnreachableThreshold { threshold: u32, approvers: usize },

    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

impl ReportableError for ConfigError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Complete ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Ledger file (JSON array of blocks).
    pub ledger_path: PathBuf,
    /// Record registry document.
    pub registry_path: PathBuf,
    /// Usernames allowed to commit blocks.
    pub approvers: Vec<String>,
    /// Affirmative votes required to commit.
    pub quorum_threshold: u32,
    /// Maximum submitted records per owner.
    pub submission_cap: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("./data/blockchain.json"),
            registry_path: PathBuf::from("./data/registry.json"),
            approvers: DEFAULT_APPROVERS.iter().map(|s| s.to_string()).collect(),
            quorum_threshold: dl_02_approval_quorum::DEFAULT_QUORUM_THRESHOLD,
            submission_cap: DEFAULT_SUBMISSION_CAP,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from the environment over the defaults.
    ///
    /// # Environment Variables
    ///
    /// - `DL_LEDGER_PATH`: ledger file (default: ./data/blockchain.json)
    /// - `DL_REGISTRY_PATH`: registry document (default: ./data/registry.json)
    /// - `DL_APPROVERS`: comma separated allow-list (default: admin1,admin2,admin3)
    /// - `DL_QUORUM_THRESHOLD`: affirmative votes required (default: 3)
    /// - `DL_SUBMISSION_CAP`: submitted records per owner (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("DL_LEDGER_PATH") {
            config.ledger_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DL_REGISTRY_PATH") {
            config.registry_path = PathBuf::from(path);
        }
        if let Some(list) = lookup("DL_APPROVERS") {
            config.approvers = parse_approvers(&list);
        }
        if let Some(value) = lookup("DL_QUORUM_THRESHOLD") {
            config.quorum_threshold = parse_u32("DL_QUORUM_THRESHOLD", value)?;
        }
        if let Some(value) = lookup("DL_SUBMISSION_CAP") {
            config.submission_cap = parse_u32("DL_SUBMISSION_CAP", value)?;
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let allow_list = self.allow_list();
        if allow_list.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }
        if self.quorum_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.quorum_threshold as usize > allow_list.len() {
            return Err(ConfigError::UnreachableThreshold {
                threshold: self.quorum_threshold,
                approvers: allow_list.len(),
            });
        }
        Ok(())
    }

    pub fn allow_list(&self) -> ApproverSet {
        ApproverSet::new(self.approvers.iter().cloned())
    }

    pub fn quorum(&self) -> QuorumConfig {
        QuorumConfig {
            threshold: self.quorum_threshold,
            allow_list: self.allow_list(),
        }
    }

    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = path.into();
        self
    }

    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = path.into();
        self
    }

    pub fn with_approvers<I, S>(mut self, approvers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.approvers = approvers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_quorum_threshold(mut self, threshold: u32) -> Self {
        self.quorum_threshold = threshold;
        self
    }

    pub fn with_submission_cap(mut self, cap: u32) -> Self {
        self.submission_cap = cap;
        self
    }
}

fn parse_approvers(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_u32(var: &'static str, value: String) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}
