//! Project scaffolding for `sage init`.

use crate::cli::output::Output;
use crate::types::{AppError, Result};
use crate::utils::config::SageConfig;
use std::fs;
use std::path::Path;

const ENV_EXAMPLE: &str = "\
# Copy to .env and fill in. The key never goes in sage.toml.
GROQ_API_KEY=gsk_your_key_here
";

/// Write a default `sage.toml` and `.env.example` into `path`.
///
/// Refuses to overwrite existing files unless `force` is set.
pub fn run(path: &Path, force: bool, out: &Output) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| AppError::Io(format!("Cannot create {}: {}", path.display(), e)))?;

    let config_path = path.join("sage.toml");
    if config_path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    let defaults = toml::to_string_pretty(&SageConfig::default())
        .map_err(|e| AppError::Internal(format!("Failed to render defaults: {}", e)))?;
    let contents = format!(
        "# S.A.G.E configuration. Every field is optional; these are the defaults.\n{}",
        defaults
    );
    fs::write(&config_path, contents)
        .map_err(|e| AppError::Io(format!("Cannot write {}: {}", config_path.display(), e)))?;
    out.created("config", &config_path.display().to_string());

    let env_path = path.join(".env.example");
    if !env_path.exists() || force {
        fs::write(&env_path, ENV_EXAMPLE)
            .map_err(|e| AppError::Io(format!("Cannot write {}: {}", env_path.display(), e)))?;
        out.created("env", &env_path.display().to_string());
    }

    out.success("Project initialized");
    out.info("Next: put your API key in .env, then run `sage ingest <corpus>`");
    Ok(())
}
