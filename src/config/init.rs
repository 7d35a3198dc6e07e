use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::get_config_path;

/// Config written by `cta-advisor init`.
pub const STARTER_CONFIG: &str = r#"# cta-advisor configuration

output:
  # text or json
  format: text
  # auto, always or never
  color: auto
  # recommendations shown in terminal output (1-5)
  recommendations: 5

# Baseline facts layered under every analyzed page. Facts from the page
# file and --set overrides win over these.
defaults:
  largest_other_element_size: 8000
  cta_mobile_width: 200
  cta_mobile_height: 48
"#;

/// Write the starter config atomically and return the path written.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_starter_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite it.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        ensure_dir(parent)?;
    }

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(STARTER_CONFIG.as_bytes())
        .context("Failed to write starter config")?;
    file.commit().context("Failed to save starter config")?;

    Ok(config_path)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
    }
    Ok(())
}
