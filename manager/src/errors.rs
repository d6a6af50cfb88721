//! Custom error types for the service manager
//!
//! Typed errors are carried inside `anyhow::Error` by most call sites and can
//! be recovered with `downcast_ref` where the caller needs to branch on them.

use std::fmt;

/// Main error type for the service manager
#[derive(Debug)]
pub enum ManagerError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Service lifecycle errors
    Service(ServiceError),

    /// Recipe installation errors
    Recipe(RecipeError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Service lifecycle error variants
#[derive(Debug)]
pub enum ServiceError {
    /// No service with this id is registered
    NotFound { service_id: String },

    /// The recipe could not be installed before creating the service
    RecipeInstallFailed { recipe_id: String, reason: String },

    /// Reorder called with an index outside the service list
    InvalidIndex { index: usize, len: usize },

    /// Unknown or malformed IPC payload
    InvalidMessage { channel: String, reason: String },
}

/// Recipe error variants
#[derive(Debug)]
pub enum RecipeError {
    /// Recipe is not available in the recipe source
    NotAvailable { recipe_id: String },

    /// Copying recipe files failed
    CopyFailed { recipe_id: String, reason: String },
}

impl fmt::Display for ManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerError::Config(e) => write!(f, "Configuration error: {}", e),
            ManagerError::Service(e) => write!(f, "Service error: {}", e),
            ManagerError::Recipe(e) => write!(f, "Recipe error: {}", e),
            ManagerError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound { service_id } => {
                write!(f, "Service '{}' not found", service_id)
            }
            ServiceError::RecipeInstallFailed { recipe_id, reason } => {
                write!(f, "Failed to install recipe '{}': {}", recipe_id, reason)
            }
            ServiceError::InvalidIndex { index, len } => {
                write!(f, "Index {} out of range for {} services", index, len)
            }
            ServiceError::InvalidMessage { channel, reason } => {
                write!(f, "Invalid '{}' message: {}", channel, reason)
            }
        }
    }
}

impl fmt::Display for RecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeError::NotAvailable { recipe_id } => {
                write!(f, "Recipe '{}' is not available", recipe_id)
            }
            RecipeError::CopyFailed { recipe_id, reason } => {
                write!(f, "Failed to copy recipe '{}': {}", recipe_id, reason)
            }
        }
    }
}

impl std::error::Error for ManagerError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ServiceError {}
impl std::error::Error for RecipeError {}

/// Recovers the typed category of an error that travelled inside `anyhow`.
impl From<anyhow::Error> for ManagerError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(e) => return ManagerError::Config(e),
            Err(err) => err,
        };
        let err = match err.downcast::<ServiceError>() {
            Ok(e) => return ManagerError::Service(e),
            Err(err) => err,
        };
        match err.downcast::<RecipeError>() {
            Ok(e) => ManagerError::Recipe(e),
            Err(err) => ManagerError::Other(format!("{:#}", err)),
        }
    }
}

impl From<ConfigError> for ManagerError {
    fn from(err: ConfigError) -> Self {
        ManagerError::Config(err)
    }
}

impl From<ServiceError> for ManagerError {
    fn from(err: ServiceError) -> Self {
        ManagerError::Service(err)
    }
}

impl From<RecipeError> for ManagerError {
    fn from(err: RecipeError) -> Self {
        ManagerError::Recipe(err)
    }
}
