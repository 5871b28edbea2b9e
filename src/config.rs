//! # Kit Configuration
//!
//! The validated, typed configuration for one staging run.
//!
//! The CLI collects raw values (flags with environment fallbacks) and hands
//! them to [`KitConfig::new`]. [`KitConfig::validate`] then rejects anything
//! that would otherwise surface later as an obscure path failure: an empty
//! architecture, an empty package list, or a package-group name that is not a
//! single directory name.
//!
//! Package groups are kept as a `Vec<String>` of discrete names from here on.
//! A group name containing whitespace names one directory; nothing downstream
//! splits it again.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the kit subdirectory that receives the copied packages.
pub const PACKAGES_SUBDIR: &str = "Packages";

/// Default repository metadata generator.
pub const DEFAULT_CREATEREPO: &str = "createrepo_c";

/// Default repository query tool.
pub const DEFAULT_DNF: &str = "dnf";

/// Default repository id for the staged kit during validation.
pub const DEFAULT_REPO_ID: &str = "kit";

/// External programs used after staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Program that writes repository metadata into the kit directory
    pub createrepo: String,
    /// Program used to query the staged repository
    pub dnf: String,
    /// Repository id the kit is registered under while querying it
    pub repo_id: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            createrepo: DEFAULT_CREATEREPO.to_string(),
            dnf: DEFAULT_DNF.to_string(),
            repo_id: DEFAULT_REPO_ID.to_string(),
        }
    }
}

/// Configuration for a single kit staging run
#[derive(Debug, Clone)]
pub struct KitConfig {
    /// Root directory holding one subdirectory per package group
    pub packages_dir: PathBuf,
    /// Package groups to copy, in order; duplicates are allowed
    pub packages: Vec<String>,
    /// Root output directory; the kit lands at `output_dir/arch`
    pub output_dir: PathBuf,
    /// Architecture identifier namespacing the kit
    pub arch: String,
    /// Treat a missing package-group directory as an error
    pub strict_groups: bool,
    /// External tools run over the staged kit
    pub tools: ToolConfig,
}

impl KitConfig {
    /// Create a configuration with default tools and lenient group lookup.
    pub fn new(
        packages_dir: impl Into<PathBuf>,
        packages: Vec<String>,
        output_dir: impl Into<PathBuf>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            packages,
            output_dir: output_dir.into(),
            arch: arch.into(),
            strict_groups: false,
            tools: ToolConfig::default(),
        }
    }

    /// Require every package group directory to exist.
    pub fn with_strict_groups(mut self, strict: bool) -> Self {
        self.strict_groups = strict;
        self
    }

    /// Replace the external tool configuration.
    pub fn with_tools(mut self, tools: ToolConfig) -> Self {
        self.tools = tools;
        self
    }

    /// Check the configuration before anything touches the filesystem.
    pub fn validate(&self) -> Result<()> {
        let arch = self.arch.trim();
        if arch.is_empty() {
            return Err(Error::Config {
                message: "architecture is empty".to_string(),
                hint: Some("Pass --arch=<id> or set the ARCH environment variable".to_string()),
            });
        }
        // The architecture becomes a path segment of the kit directory.
        if !is_single_component(&self.arch) {
            return Err(Error::Config {
                message: format!("architecture '{}' is not a plain directory name", self.arch),
                hint: None,
            });
        }

        if self.packages.is_empty() {
            return Err(Error::Config {
                message: "no package groups given".to_string(),
                hint: Some("Pass --package=<name> at least once".to_string()),
            });
        }
        for group in &self.packages {
            validate_group_name(group)?;
        }

        for (name, value) in [
            ("metadata generator", &self.tools.createrepo),
            ("query tool", &self.tools.dnf),
            ("repository id", &self.tools.repo_id),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config {
                    message: format!("{} is empty", name),
                    hint: None,
                });
            }
        }

        Ok(())
    }

    /// The kit directory, `output_dir/arch`.
    pub fn kit_dir(&self) -> PathBuf {
        self.output_dir.join(&self.arch)
    }

    /// The directory packages are copied into, `output_dir/arch/Packages`.
    pub fn packages_subdir(&self) -> PathBuf {
        self.kit_dir().join(PACKAGES_SUBDIR)
    }

    /// The source directory of a package group, `packages_dir/group`.
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.packages_dir.join(group)
    }
}

/// Reject group names that do not name exactly one subdirectory.
pub fn validate_group_name(group: &str) -> Result<()> {
    let reason = if group.is_empty() {
        Some("name is empty")
    } else if group == "." || group == ".." {
        Some("name refers to a relative directory")
    } else if group.contains('/') || group.contains(std::path::MAIN_SEPARATOR) {
        Some("name contains a path separator")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidPackageGroup {
            group: group.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn is_single_component(value: &str) -> bool {
    let mut components = Path::new(value).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !value.contains('/')
}
