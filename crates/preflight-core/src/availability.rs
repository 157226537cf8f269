//! MCP availability: is the chat/server side of the deployment usable?
//!
//! Unlike the import verifier this looks at the filesystem and `PATH`, and it
//! never fails: every unmet check becomes an issue plus a recommendation.

use crate::capability::{ImportPath, Resolver, FRAMEWORK_IMPORTS};
use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// AvailabilityStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityStatus {
    pub mcp_package: bool,
    pub mcp_server_file: bool,
    pub mcp_chat_file: bool,
    pub runtime: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub available: bool,
    pub checked_at: DateTime<Utc>,
}

pub fn check<R: Resolver + ?Sized>(root: &Path, config: &Config, resolver: &R) -> AvailabilityStatus {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let mcp_package = framework_resolves(resolver);
    if !mcp_package {
        issues.push("MCP package not installed".to_string());
        recommendations.push("Build with the `mcp` feature enabled".to_string());
    }

    let mcp_server_file = config.server_entry_path(root).is_file();
    if !mcp_server_file {
        issues.push("MCP server file not found".to_string());
        recommendations.push(format!("Ensure {} exists", config.mcp.server_entry));
    }

    let mcp_chat_file = config.chat_entry_path(root).is_file();
    if !mcp_chat_file {
        issues.push("MCP chat file not found".to_string());
        recommendations.push(format!("Ensure {} exists", config.mcp.chat_entry));
    }

    let command = config.runtime.command.trim();
    let runtime = !command.is_empty() && which::which(command).is_ok();
    if !runtime {
        issues.push(format!("Runtime '{command}' not found on PATH"));
        recommendations.push(format!("Install {command} or set runtime.command"));
    }

    let available = mcp_package && mcp_server_file && mcp_chat_file && runtime;
    tracing::debug!(available, issues = issues.len(), "checked MCP availability");

    AvailabilityStatus {
        mcp_package,
        mcp_server_file,
        mcp_chat_file,
        runtime,
        issues,
        recommendations,
        available,
        checked_at: Utc::now(),
    }
}

fn framework_resolves<R: Resolver + ?Sized>(resolver: &R) -> bool {
    FRAMEWORK_IMPORTS.iter().all(|path| {
        ImportPath::parse(path)
            .map(|import| resolver.resolve(&import).is_ok())
            .unwrap_or(false)
    })
}

// ---------------------------------------------------------------------------
// StatusMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub title: String,
    pub message: String,
    pub details: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

pub fn status_message(status: &AvailabilityStatus) -> StatusMessage {
    if status.available {
        StatusMessage {
            kind: MessageKind::Success,
            title: "✅ MCP Chat Available".to_string(),
            message: "Advanced chat functionality is ready to use!".to_string(),
            details: "All MCP components are properly configured.".to_string(),
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    } else {
        StatusMessage {
            kind: MessageKind::Warning,
            title: "⚠️ MCP Chat Not Available".to_string(),
            message: "Advanced chat functionality requires additional setup.".to_string(),
            details: format!("Issues found: {}", status.issues.len()),
            issues: status.issues.clone(),
            recommendations: status.recommendations.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SetupGuide
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SetupStep {
    pub step: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupGuide {
    pub title: String,
    pub steps: Vec<SetupStep>,
    pub note: String,
}

pub fn setup_instructions(config: &Config) -> SetupGuide {
    SetupGuide {
        title: "🔧 MCP Setup Instructions".to_string(),
        steps: vec![
            SetupStep {
                step: 1,
                title: "Enable MCP Support".to_string(),
                command: Some("cargo build --release --features mcp".to_string()),
                description: "Compile the MCP framework capability into preflight".to_string(),
            },
            SetupStep {
                step: 2,
                title: "Verify Files".to_string(),
                command: None,
                description: format!(
                    "Ensure {} and {} exist",
                    config.mcp.server_entry, config.mcp.chat_entry
                ),
            },
            SetupStep {
                step: 3,
                title: "Start MCP Server".to_string(),
                command: Some(format!(
                    "{} {}",
                    config.runtime.command, config.mcp.server_entry
                )),
                description: "Run the MCP server in a separate terminal".to_string(),
            },
            SetupStep {
                step: 4,
                title: "Test Chat".to_string(),
                command: None,
                description: "Try the chat functionality in the UI".to_string(),
            },
        ],
        note: "MCP is optional - basic functionality works without it!".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
