use crate::output::{print_json, print_table};
use anyhow::Context;
use preflight_core::paths::{ensure_layout, validate_layout, LayoutIssue};
use std::path::Path;

/// Exits non-zero while any layout issue remains.
pub fn run(root: &Path, create: bool, json: bool) -> anyhow::Result<()> {
    let created = if create {
        ensure_layout(root)
            .with_context(|| format!("failed to create layout under {}", root.display()))?
    } else {
        Vec::new()
    };

    let issues = validate_layout(root);

    if json {
        let value = serde_json::json!({
            "root": root,
            "created": created,
            "issues": issues,
        });
        print_json(&value)?;
    } else {
        for path in &created {
            println!("created {}", path.display());
        }
        if issues.is_empty() {
            println!("Layout is complete. No issues.");
        } else {
            print_table(&["KIND", "NAME", "PATH"], &rows(&issues));
        }
    }

    if !issues.is_empty() {
        anyhow::bail!("layout check found {} issue(s)", issues.len());
    }
    Ok(())
}

fn rows(issues: &[LayoutIssue]) -> Vec<Vec<String>> {
    issues
        .iter()
        .map(|issue| {
            let kind = serde_json::to_value(issue.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            vec![kind, issue.name.clone(), issue.path.display().to_string()]
        })
        .collect()
}
