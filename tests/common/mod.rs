//! Shared test utilities for the CLI end-to-end tests.
//!
//! The fixture builds a temporary packages tree and fake repository tools.
//! The fake `createrepo` and `dnf` are shell scripts that append their
//! arguments to `calls.log` and exit with a chosen status, so tests can check
//! what ran and in which order without the real tools installed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = KitFixture::new()
//!         .with_package("core", "a-1.0.rpm", 100)
//!         .with_tools();
//!     fixture.command().arg("--package=core").assert().success();
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::KitFixture;
    pub use super::ARCH;
}

/// Architecture used by the fixture's commands.
pub const ARCH: &str = "x86_64";

/// A temporary packages tree, output directory and fake tool set.
pub struct KitFixture {
    temp_dir: assert_fs::TempDir,
}

impl KitFixture {
    /// Create a fixture with an empty packages root.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("packages")
            .create_dir_all()
            .expect("Failed to create packages directory");
        Self { temp_dir }
    }

    /// Add a package file of `size` bytes to `group`.
    pub fn with_package(self, group: &str, name: &str, size: usize) -> Self {
        self.temp_dir
            .child("packages")
            .child(group)
            .child(name)
            .write_binary(&vec![b'p'; size])
            .expect("Failed to write package");
        self
    }

    /// Add an empty subdirectory inside `group`.
    pub fn with_group_subdir(self, group: &str, name: &str) -> Self {
        self.temp_dir
            .child("packages")
            .child(group)
            .child(name)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Put a file into the kit directory before the run.
    pub fn with_kit_file(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("output")
            .child(ARCH)
            .child(name)
            .write_str(content)
            .expect("Failed to write kit file");
        self
    }

    /// Install a fake metadata generator exiting with `exit_code`.
    ///
    /// On success it writes `repodata/repomd.xml` into its argument.
    pub fn with_createrepo(self, exit_code: i32) -> Self {
        let body = format!(
            "if [ {code} -eq 0 ]; then mkdir -p \"$1/repodata\" && echo '<repomd/>' > \"$1/repodata/repomd.xml\"; fi\nexit {code}\n",
            code = exit_code
        );
        self.with_script("createrepo", &body)
    }

    /// Install a fake query tool exiting with `exit_code`.
    pub fn with_dnf(self, exit_code: i32) -> Self {
        self.with_script("dnf", &format!("echo 'Available Packages'\nexit {}\n", exit_code))
    }

    /// Install both fake tools, succeeding.
    pub fn with_tools(self) -> Self {
        self.with_createrepo(0).with_dnf(0)
    }

    fn with_script(self, name: &str, body: &str) -> Self {
        let path = self.tool_path(name);
        let script = format!(
            "#!/bin/sh\necho \"{} $*\" >> '{}'\n{}",
            name,
            self.calls_log().display(),
            body
        );
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create tools directory");
        fs::write(&path, script).expect("Failed to write tool script");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to make tool executable");
        }
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.path().join("packages")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("output")
    }

    pub fn kit_dir(&self) -> PathBuf {
        self.output_dir().join(ARCH)
    }

    pub fn tool_path(&self, name: &str) -> PathBuf {
        self.path().join("tools").join(name)
    }

    fn calls_log(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    /// Lines logged by the fake tools, in call order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.calls_log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// File names in `<kit>/Packages`.
    pub fn staged_files(&self) -> BTreeSet<String> {
        fs::read_dir(self.kit_dir().join("Packages"))
            .expect("Packages directory should exist")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    /// Contents of every staged file, keyed by name.
    pub fn staged_contents(&self) -> Vec<(String, Vec<u8>)> {
        self.staged_files()
            .into_iter()
            .map(|name| {
                let content = fs::read(self.kit_dir().join("Packages").join(&name)).unwrap();
                (name, content)
            })
            .collect()
    }

    /// A command with paths, architecture and fake tools filled in.
    ///
    /// Package groups are left to the test.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_command();
        cmd.arg(format!("--packages-dir={}", self.packages_dir().display()))
            .arg(format!("--output-dir={}", self.output_dir().display()))
            .arg(format!("--createrepo={}", self.tool_path("createrepo").display()))
            .arg(format!("--dnf={}", self.tool_path("dnf").display()))
            .env("ARCH", ARCH);
        cmd
    }

    /// The binary with a clean environment and no arguments.
    pub fn bare_command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("kit-stager");
        cmd.current_dir(self.path())
            .env_remove("ARCH")
            .env_remove("KIT_STAGER_CREATEREPO")
            .env_remove("KIT_STAGER_DNF")
            .env_remove("KIT_STAGER_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for KitFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_packages_root() {
        let fixture = KitFixture::new();
        assert!(fixture.packages_dir().is_dir());
        assert!(!fixture.output_dir().exists());
    }

    #[test]
    fn test_fixture_with_package() {
        let fixture = KitFixture::new().with_package("core", "a-1.0.rpm", 7);
        let path = fixture.packages_dir().join("core/a-1.0.rpm");
        assert_eq!(fs::metadata(path).unwrap().len(), 7);
    }

    #[test]
    fn test_fixture_with_tools() {
        let fixture = KitFixture::new().with_tools();
        assert!(fixture.tool_path("createrepo").is_file());
        assert!(fixture.tool_path("dnf").is_file());
        assert!(fixture.calls().is_empty());
    }
}
