//! Version command

use serde::Serialize;

use crate::cli::VersionArgs;
use anyhow::Result;

/// Build metadata captured by `build.rs`
#[derive(Debug, Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    built: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'static str>,
}

impl BuildInfo {
    const CURRENT: BuildInfo = BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_SHA"),
        built: option_env!("BUILD_DATE"),
        target: option_env!("TARGET"),
    };

    /// `metro-reserve 0.3.0 (1a2b3c4, 2026-01-05)`
    fn summary(&self) -> String {
        let details: Vec<&str> = [self.commit, self.built].into_iter().flatten().collect();
        if details.is_empty() {
            format!("{} {}", self.name, self.version)
        } else {
            format!("{} {} ({})", self.name, self.version, details.join(", "))
        }
    }
}

pub fn run(args: VersionArgs) -> Result<()> {
    let info = BuildInfo::CURRENT;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.summary());
    if let Some(target) = info.target {
        println!("target: {}", target);
    }
    Ok(())
}
