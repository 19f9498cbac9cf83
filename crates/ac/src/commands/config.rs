//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/ac/config.toml.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use autocollections_core::config::SyncConfig;
use directories::BaseDirs;
use owo_colors::OwoColorize;
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# ac - Auto Collections configuration

# Config schema version (do not modify)
version = 1

# Plan changes without writing them
# dry_run = false

# Collection ordering: "descending" (newest first) or "ascending"
# sort_order = "descending"

# Library file (default: ~/.local/share/ac/library.json)
# library_path = "/srv/media/library.json"

# Title-match collections. match_type is one of
# "title", "genre", "studio", "actor", "director",
# and the media type filter is "all", "movies" or "series".
#
# [[title_match_collections]]
# pattern = "Nolan"
# match_type = "director"
# media_type = "movies"
# collection_name = "Christopher Nolan"
# case_sensitive = false

# Expression collections.
#
# [[expression_collections]]
# collection_name = "Marvel Action"
# expression = 'STUDIO "Marvel" AND GENRE "Action"'
# case_sensitive = false
"#;

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/ac/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("ac"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("ac"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path, preferring an explicit `--config` / `AC_CONFIG`.
pub fn get_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk. A missing file yields the default config.
pub fn load_config(ctx: &CommandContext) -> Result<SyncConfig> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<SyncConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SyncConfig::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config = SyncConfig::from_toml(&content)?;
    debug!(
        path = %path.display(),
        rules = config.rule_count(),
        "loaded config"
    );
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config_from(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("Settings:");
        println!("  dry_run: {}", config.dry_run);
        println!("  sort_order: {}", config.sort_order);
        if let Some(ref library) = config.library_path {
            println!("  library_path: {}", library.display());
        }
        println!(
            "  title_match_collections: {}",
            config.title_match_collections.len()
        );
        println!(
            "  expression_collections: {}",
            config.expression_collections.len()
        );

        if !path.exists() {
            println!("\n(No config file exists. Run 'ac config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn context(config_path: Option<PathBuf>) -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            config_path,
        }
    }

    #[test]
    fn test_default_config_parses_to_default() {
        let config = SyncConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_default_config_examples_parse_when_uncommented() {
        let uncommented: String = DEFAULT_CONFIG
            .lines()
            .map(|line| {
                let trimmed = line.trim_start_matches("# ");
                if trimmed.starts_with("[[")
                    || trimmed.starts_with("pattern")
                    || trimmed.starts_with("match_type")
                    || trimmed.starts_with("media_type")
                    || trimmed.starts_with("collection_name")
                    || trimmed.starts_with("expression")
                {
                    trimmed
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let config = SyncConfig::from_toml(&uncommented).unwrap();
        assert_eq!(config.title_match_collections.len(), 1);
        assert_eq!(config.expression_collections.len(), 1);
        assert_eq!(config.rules()[0].collection_name(), "Christopher Nolan");
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = PathBuf::from("/tmp/ac-explicit/config.toml");
        assert_eq!(get_config_path(Some(&path)).unwrap(), path);
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        let original = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", "/tmp/ac-xdg");

        let path = get_config_path(None);

        match original {
            Some(val) => env::set_var("XDG_CONFIG_HOME", val),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(
            path.unwrap(),
            PathBuf::from("/tmp/ac-xdg").join("ac").join("config.toml")
        );
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(Some(temp_dir.path().join("missing.toml")));

        let config = load_config(&ctx).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "version = 42").unwrap();

        let err = load_config(&context(Some(path))).unwrap_err();
        assert!(matches!(err, CommandError::ConfigFile(_)), "got: {err}");
    }

    #[test]
    fn test_init_writes_default_and_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let ctx = context(Some(path.clone()));

        execute_init(&ctx, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        assert!(execute_init(&ctx, false).is_err());
        execute_init(&ctx, true).unwrap();
    }
}
