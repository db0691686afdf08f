// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the project configuration file to simplify the
//! process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Name of project configuration file at the top-level of a project.
pub const CONFIG_FILE_NAME: &str = "slicemachine.toml";

/// Project configuration layout.
///
/// Every project comes with a configuration file at its top-level that tells
/// where its models live. All paths are relative to the project root unless
/// they are absolute.
///
/// # General Layout
///
/// - Slice libraries: directories whose immediate subdirectories each hold one
///   slice, i.e., a `model.json` file plus its variation screenshots.
/// - Custom types directory: holds one subdirectory per custom type, each
///   containing an `index.json` file.
/// - Remote directory: snapshot of the models the remote repository currently
///   holds, used to work out the sync status of each local model.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Name of remote repository models get synced to.
    pub repository_name: String,

    /// Slice library directories.
    #[serde(default = "default_libraries")]
    pub libraries: Vec<PathBuf>,

    /// Directory of custom type models.
    #[serde(default = "default_custom_types_dir")]
    pub custom_types_dir: PathBuf,

    /// Directory of remote model snapshots.
    #[serde(default = "default_remote_dir")]
    pub remote_dir: PathBuf,
}

impl ProjectConfig {
    /// Construct new project configuration with default layout.
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
            libraries: default_libraries(),
            custom_types_dir: default_custom_types_dir(),
            remote_dir: default_remote_dir(),
        }
    }
}

impl FromStr for ProjectConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: ProjectConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on every path field.
        config.libraries = config
            .libraries
            .iter()
            .map(|path| expand(path))
            .collect::<Result<Vec<_>>>()?;
        config.custom_types_dir = expand(&config.custom_types_dir)?;
        config.remote_dir = expand(&config.remote_dir)?;

        Ok(config)
    }
}

impl Display for ProjectConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    Ok(shellexpand::full(path.to_string_lossy().as_ref())
        .map_err(ConfigError::ShellExpansion)?
        .into_owned()
        .into())
}

fn default_libraries() -> Vec<PathBuf> {
    vec![PathBuf::from("slices")]
}

fn default_custom_types_dir() -> PathBuf {
    PathBuf::from("customtypes")
}

fn default_remote_dir() -> PathBuf {
    PathBuf::from(".slicemachine").join("remote")
}

/// Configuration error types.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("SM_SLICES", "/home/blah/slices")])]
    fn deserialize_project_config() -> anyhow::Result<()> {
        let result: ProjectConfig = r#"
            repository_name = "blah"
            libraries = ["$SM_SLICES", "vendor/slices"]
            custom_types_dir = "models/customtypes"
        "#
        .parse()?;

        let expect = ProjectConfig {
            repository_name: "blah".into(),
            libraries: vec!["/home/blah/slices".into(), "vendor/slices".into()],
            custom_types_dir: "models/customtypes".into(),
            remote_dir: PathBuf::from(".slicemachine").join("remote"),
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn deserialize_project_config_missing_name() {
        let result = "libraries = []".parse::<ProjectConfig>();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn serialize_project_config() {
        let result = ProjectConfig {
            repository_name: "blah".into(),
            libraries: vec!["slices".into(), "more/slices".into()],
            custom_types_dir: "customtypes".into(),
            remote_dir: "remote".into(),
        }
        .to_string();

        let expect = indoc! {r#"
            repository_name = "blah"
            libraries = [
                "slices",
                "more/slices",
            ]
            custom_types_dir = "customtypes"
            remote_dir = "remote"
        "#};

        assert_eq!(result, expect);
    }
}
