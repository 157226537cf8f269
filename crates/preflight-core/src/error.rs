use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("invalid import path '{0}': expected dotted identifiers like 'pkg.module.Symbol'")]
    InvalidImportPath(String),

    #[error("config already exists: {0}")]
    ConfigExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PreflightError>;

/// Why a capability could not be resolved.
///
/// The verifier treats every variant the same way ("capability unavailable");
/// the distinction only matters for the printed description and trace.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("module not found: {module}")]
    ModuleNotFound { module: String },

    #[error("cannot import name '{symbol}' from '{module}'")]
    SymbolNotFound { module: String, symbol: String },

    #[error("module '{module}' failed to load")]
    Broken {
        module: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("module '{module}' failed to load: {reason}")]
    Internal { module: String, reason: String },
}

impl ResolveError {
    /// The module the error was raised for.
    pub fn module(&self) -> &str {
        match self {
            ResolveError::ModuleNotFound { module }
            | ResolveError::SymbolNotFound { module, .. }
            | ResolveError::Broken { module, .. }
            | ResolveError::Internal { module, .. } => module,
        }
    }
}
