//! External repository tools
//!
//! After staging, two programs run over the kit: the metadata generator
//! (`createrepo_c` by default) writes the repository index, and the query
//! tool (`dnf` by default) lists everything in the kit with every other
//! repository disabled. The query is a smoke test; only its exit status
//! matters.
//!
//! Both run synchronously with stderr inherited, so the tool's own error text
//! reaches the user unchanged.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info};

use crate::config::ToolConfig;
use crate::error::{Error, Result};

/// A single external program run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Human-readable role, used in messages
    pub tool: &'static str,
    pub program: String,
    pub args: Vec<OsString>,
}

impl ToolInvocation {
    /// Command line as a display string.
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(args_as_strings(&self.args))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. A nonzero exit is an error.
    ///
    /// With `discard_stdout` the tool's standard output is dropped; stderr is
    /// always inherited.
    pub fn run(&self, discard_stdout: bool) -> Result<()> {
        debug!("running {}", self.display());
        let stdout = if discard_stdout {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::ToolLaunch {
                tool: self.tool.to_string(),
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(Error::ToolFailed {
                tool: self.tool.to_string(),
                command: self.display(),
                status: status.code(),
            });
        }

        info!("{} finished", self.tool);
        Ok(())
    }
}

/// The metadata generator run over `kit_dir`.
pub fn metadata_generator(tools: &ToolConfig, kit_dir: &Path) -> ToolInvocation {
    ToolInvocation {
        tool: "metadata generator",
        program: tools.createrepo.clone(),
        args: vec![kit_dir.as_os_str().to_os_string()],
    }
}

/// The query run against `kit_dir` as the only enabled repository.
pub fn metadata_validator(tools: &ToolConfig, kit_dir: &Path) -> ToolInvocation {
    let mut repo_from_path = OsString::from(format!("--repofrompath={},", tools.repo_id));
    repo_from_path.push(kit_dir.as_os_str());

    ToolInvocation {
        tool: "repository query",
        program: tools.dnf.clone(),
        args: vec![
            OsString::from("--disablerepo=*"),
            repo_from_path,
            OsString::from(format!("--enablerepo={}", tools.repo_id)),
            OsString::from("list"),
            OsString::from("--all"),
        ],
    }
}

/// Regenerate repository metadata for the kit.
pub fn generate_metadata(tools: &ToolConfig, kit_dir: &Path, quiet: bool) -> Result<()> {
    metadata_generator(tools, kit_dir).run(quiet)
}

/// Confirm the kit can be queried as a repository.
///
/// Only the exit status matters; the listing on stdout is discarded.
pub fn validate_metadata(tools: &ToolConfig, kit_dir: &Path) -> Result<()> {
    metadata_validator(tools, kit_dir).run(true)
}

/// Whether `program` names something runnable: a path to an existing file,
/// or a bare name found on `PATH`.
pub fn is_available(program: &str) -> bool {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file();
    }
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}

/// Fail early when a tool the run needs is not installed.
///
/// The query tool is only required when the kit will be validated.
pub fn check_available(tools: &ToolConfig, validate: bool) -> Result<()> {
    let mut required = vec![("metadata generator", &tools.createrepo, "createrepo")];
    if validate {
        required.push(("repository query", &tools.dnf, "dnf"));
    }

    for (tool, program, flag) in required {
        if !is_available(program) {
            return Err(Error::ToolMissing {
                tool: tool.to_string(),
                program: program.clone(),
                flag: flag.to_string(),
            });
        }
    }
    Ok(())
}

/// Lossy string form of an argument list.
pub fn args_as_strings(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| OsStr::to_string_lossy(a).into_owned())
        .collect()
}
