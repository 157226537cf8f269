use crate::output::print_json;
use anyhow::Context;
use preflight_core::capability::LinkedResolver;
use preflight_core::verifier::{Verdict, Verifier};
use std::io;

/// Resolve the three capability groups in order against the catalog compiled
/// into this binary.
///
/// A failed check is not an `Err`: it is reported on the console and turned
/// into [`Verdict::Failed`] for the exit code.
pub fn run(json: bool) -> anyhow::Result<Verdict> {
    let resolver = LinkedResolver::builtin();
    tracing::debug!(
        modules = resolver.module_paths().count(),
        "loaded linked capability catalog"
    );
    let verifier = Verifier::new(&resolver).context("invalid verification plan")?;

    let report = if json {
        let report = verifier.run(&mut io::sink(), &mut io::sink())?;
        print_json(&report)?;
        report
    } else {
        let stdout = io::stdout();
        let stderr = io::stderr();
        verifier
            .run(&mut stdout.lock(), &mut stderr.lock())
            .context("failed to write verification output")?
    };

    Ok(report.verdict)
}
