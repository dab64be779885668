//! Configuration file setup.

use super::Context;
use crate::error::{CliError, Result};
use std::path::Path;

/// Execute the init command: save the effective configuration to `path`.
pub fn execute_init(path: &Path, force: bool, ctx: &Context) -> Result<String> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    ctx.config.save(path)?;
    Ok(ctx.formatter.success(&format!("Wrote configuration to {}", path.display())))
}
