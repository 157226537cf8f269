use crate::error::{PreflightError, ResolveError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Capability names
// ---------------------------------------------------------------------------

/// Symbols the MCP server framework must provide.
pub const FRAMEWORK_IMPORTS: &[&str] = &[
    "mcp.server.Server",
    "mcp.server.models.InitializationOptions",
    "mcp.server.stdio.stdio_server",
    "mcp.types.Tool",
    "mcp.types.TextContent",
];

pub const ANALYZER_IMPORT: &str =
    "analysis.clinical_trial_analyzer_reasoning.ClinicalTrialAnalyzerReasoning";

pub const DATABASE_IMPORT: &str = "database.clinical_trial_database.ClinicalTrialDatabase";

// ---------------------------------------------------------------------------
// ImportPath
// ---------------------------------------------------------------------------

/// A dotted `module.Symbol` path naming one capability symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportPath {
    module: String,
    symbol: String,
}

static IMPORT_RE: OnceLock<Regex> = OnceLock::new();

fn import_re() -> &'static Regex {
    IMPORT_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)+$").unwrap()
    })
}

impl ImportPath {
    pub fn parse(path: &str) -> Result<Self> {
        if !import_re().is_match(path) {
            return Err(PreflightError::InvalidImportPath(path.to_string()));
        }
        // The regex guarantees at least one dot.
        let (module, symbol) = path
            .rsplit_once('.')
            .ok_or_else(|| PreflightError::InvalidImportPath(path.to_string()))?;
        Ok(Self {
            module: module.to_string(),
            symbol: symbol.to_string(),
        })
    }

    pub fn parse_all(paths: &[&str]) -> Result<Vec<Self>> {
        paths.iter().map(|p| Self::parse(p)).collect()
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.symbol)
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Decides whether a capability symbol is available.
pub trait Resolver {
    fn resolve(&self, import: &ImportPath) -> std::result::Result<(), ResolveError>;
}

impl<F> Resolver for F
where
    F: Fn(&ImportPath) -> std::result::Result<(), ResolveError>,
{
    fn resolve(&self, import: &ImportPath) -> std::result::Result<(), ResolveError> {
        self(import)
    }
}

// ---------------------------------------------------------------------------
// LinkedResolver
// ---------------------------------------------------------------------------

/// A module compiled into the binary: its exported symbols and the modules it
/// loads on import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedModule {
    pub path: String,
    pub symbols: Vec<String>,
    pub requires: Vec<String>,
}

impl LinkedModule {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            symbols: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn exports(mut self, symbols: &[&str]) -> Self {
        self.symbols.extend(symbols.iter().map(|s| s.to_string()));
        self
    }

    pub fn requires(mut self, modules: &[&str]) -> Self {
        self.requires.extend(modules.iter().map(|m| m.to_string()));
        self
    }
}

/// Resolves imports against a fixed catalog of linked modules.
#[derive(Debug, Clone, Default)]
pub struct LinkedResolver {
    modules: BTreeMap<String, LinkedModule>,
}

impl LinkedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog compiled into this build. Each capability group is gated by
    /// the cargo feature of the same name.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut resolver = Self::new();

        #[cfg(feature = "mcp")]
        {
            resolver.insert(LinkedModule::new("mcp.types").exports(&["Tool", "TextContent"]));
            resolver.insert(
                LinkedModule::new("mcp.server")
                    .exports(&["Server"])
                    .requires(&["mcp.types"]),
            );
            resolver.insert(
                LinkedModule::new("mcp.server.models")
                    .exports(&["InitializationOptions"])
                    .requires(&["mcp.types"]),
            );
            resolver.insert(
                LinkedModule::new("mcp.server.stdio")
                    .exports(&["stdio_server"])
                    .requires(&["mcp.server"]),
            );
        }

        #[cfg(feature = "analysis")]
        {
            resolver.insert(LinkedModule::new("analysis.base_analyzer").exports(&["BaseAnalyzer"]));
            resolver.insert(
                LinkedModule::new("analysis.clinical_trial_analyzer_reasoning")
                    .exports(&["ClinicalTrialAnalyzerReasoning"])
                    .requires(&["analysis.base_analyzer"]),
            );
            resolver.insert(
                LinkedModule::new("analysis.clinical_trial_analyzer_llm")
                    .exports(&["ClinicalTrialAnalyzerLLM"])
                    .requires(&["analysis.base_analyzer"]),
            );
        }

        #[cfg(feature = "database")]
        {
            resolver.insert(
                LinkedModule::new("database.clinical_trial_database")
                    .exports(&["ClinicalTrialDatabase"]),
            );
            resolver.insert(
                LinkedModule::new("database.populate_clinical_trials")
                    .exports(&["populate_database"])
                    .requires(&["database.clinical_trial_database"]),
            );
        }

        resolver
    }

    pub fn with_module(mut self, module: LinkedModule) -> Self {
        self.insert(module);
        self
    }

    pub fn insert(&mut self, module: LinkedModule) {
        self.modules.insert(module.path.clone(), module);
    }

    pub fn module_paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    fn load(
        &self,
        path: &str,
        loading: &mut Vec<String>,
    ) -> std::result::Result<&LinkedModule, ResolveError> {
        if loading.iter().any(|p| p == path) {
            let mut chain = loading.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(path);
            return Err(ResolveError::Internal {
                module: path.to_string(),
                reason: format!("circular import ({chain})"),
            });
        }

        let module = self
            .modules
            .get(path)
            .ok_or_else(|| ResolveError::ModuleNotFound {
                module: path.to_string(),
            })?;

        loading.push(path.to_string());
        for dep in &module.requires {
            self.load(dep, loading)
                .map_err(|e| ResolveError::Broken {
                    module: path.to_string(),
                    source: Box::new(e),
                })?;
        }
        loading.pop();

        Ok(module)
    }
}

impl Resolver for LinkedResolver {
    fn resolve(&self, import: &ImportPath) -> std::result::Result<(), ResolveError> {
        let module = self.load(import.module(), &mut Vec::new())?;
        if !module.symbols.iter().any(|s| s == import.symbol()) {
            return Err(ResolveError::SymbolNotFound {
                module: import.module().to_string(),
                symbol: import.symbol().to_string(),
            });
        }
        tracing::debug!(import = %import, "resolved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
