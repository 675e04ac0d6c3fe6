//! Config command

use anyhow::{Context, Result};
use camino::Utf8Path;
use metro_reserve_core::config::ConfigLoader;
use metro_reserve_core::types::RuntimeConfig;

use crate::cli::{ConfigCommands, ConfigInitArgs, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config_path: Option<&Utf8Path>) -> Result<()> {
    let loader = ConfigLoader::new()?;
    match cmd {
        ConfigCommands::Show(args) => show(&loader, args, config_path),
        ConfigCommands::Init(args) => init(&loader, args, config_path),
    }
}

fn show(loader: &ConfigLoader, args: ConfigShowArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = loader
        .load_runtime_config(config_path)
        .context("Failed to load configuration")?;
    println!("{}", render(&config, args.json)?);
    Ok(())
}

fn init(loader: &ConfigLoader, args: ConfigInitArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let path = loader.write_default_config(config_path, args.force)?;
    output::success(&format!("Created {}", path));
    output::info("Edit the file to change the default line, station and time slot");
    Ok(())
}

fn render(config: &RuntimeConfig, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(config)?)
    } else {
        Ok(serde_yaml_ng::to_string(config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_render_yaml_uses_kebab_case() {
        let yaml = render(&RuntimeConfig::default(), false).unwrap();
        assert!(yaml.contains("max-attempts: 15"));
        assert!(yaml.contains("loop-duration: 2m"));
        assert!(yaml.contains("snapshot-time-slot:"));
    }

    #[test]
    fn test_render_json() {
        let json = render(&RuntimeConfig::default(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["network"]["timeout"], "10s");
        assert_eq!(value["reservation"]["date-offset"], 1);
    }

    #[test]
    fn test_init_then_refuse_overwrite() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let loader = ConfigLoader::with_dir(dir.clone());
        let target = dir.join("custom.yaml");

        init(&loader, ConfigInitArgs { force: false }, Some(&target)).unwrap();
        assert!(target.exists());

        assert!(init(&loader, ConfigInitArgs { force: false }, Some(&target)).is_err());
        assert!(init(&loader, ConfigInitArgs { force: true }, Some(&target)).is_ok());
    }
}
