//! # Kit Staging
//!
//! Builds the `Packages` directory of a kit from the configured package
//! groups.
//!
//! ## Process
//!
//! 1.  **Plan**: For every group, list the immediate children of
//!     `packages_dir/<group>` (sorted by name) and classify each one with the
//!     [`PackageFilter`]. Missing group directories are recorded, or rejected
//!     when the configuration asks for strict lookup. Planning never writes.
//!
//! 2.  **Reset**: Remove whatever is at `output_dir/<arch>` and recreate
//!     `output_dir/<arch>/Packages`, so the kit only ever holds the current
//!     run's packages.
//!
//! 3.  **Copy**: Copy every included entry flat into `Packages`, with mode
//!     `0644` and the source's access and modification times.
//!
//! Any filesystem failure after planning aborts the run; nothing is rolled
//! back.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs::{self, FileTimes};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::KitConfig;
use crate::error::{Error, Result};
use crate::filter::{PackageFilter, Selection};

/// Permissions applied to every staged package.
pub const STAGED_FILE_MODE: u32 = 0o644;

/// A package-group entry that will be copied into the kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Group the entry belongs to
    pub group: String,
    /// Full path of the source file
    pub source: PathBuf,
    /// Size in bytes at planning time
    pub size: u64,
}

impl PackageEntry {
    /// The file name the entry is staged under.
    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.source.file_name().unwrap_or(self.source.as_os_str())
    }
}

/// A package-group entry left out of the kit, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub group: String,
    pub source: PathBuf,
    pub reason: Selection,
}

/// Planned contents of one package group
#[derive(Debug, Clone, Default)]
pub struct GroupPlan {
    pub group: String,
    /// Source directory, `packages_dir/<group>`
    pub dir: PathBuf,
    /// False when the group directory does not exist
    pub found: bool,
    pub entries: Vec<PackageEntry>,
    pub skipped: Vec<SkippedEntry>,
}

/// The full staging plan for a kit
#[derive(Debug, Clone)]
pub struct StagePlan {
    /// `output_dir/<arch>`
    pub kit_dir: PathBuf,
    /// `output_dir/<arch>/Packages`
    pub packages_dir: PathBuf,
    /// One plan per configured group, in configuration order
    pub groups: Vec<GroupPlan>,
}

impl StagePlan {
    /// All included entries, in listing order.
    pub fn entries(&self) -> impl Iterator<Item = &PackageEntry> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// The entries that end up in `Packages`, one per file name.
    ///
    /// On a name clash the entry from the later group wins and takes the
    /// slot of the first one.
    pub fn staged_entries(&self) -> Vec<&PackageEntry> {
        let mut winners: Vec<&PackageEntry> = Vec::new();
        let mut slots: HashMap<&OsStr, usize> = HashMap::new();
        for entry in self.entries() {
            match slots.get(entry.file_name()) {
                Some(&slot) => winners[slot] = entry,
                None => {
                    slots.insert(entry.file_name(), winners.len());
                    winners.push(entry);
                }
            }
        }
        winners
    }

    /// All skipped entries, in listing order.
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.groups.iter().flat_map(|g| g.skipped.iter())
    }

    /// Names of groups whose directory was not found.
    pub fn missing_groups(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter(|g| !g.found)
            .map(|g| g.group.clone())
            .collect()
    }

    /// Total bytes the plan would copy.
    pub fn total_bytes(&self) -> u64 {
        self.staged_entries().iter().map(|e| e.size).sum()
    }
}

/// A package copied into the kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPackage {
    pub group: String,
    /// Path inside `Packages`
    pub destination: PathBuf,
    pub size: u64,
}

/// Result of a completed staging step
#[derive(Debug, Clone)]
pub struct StageReport {
    pub kit_dir: PathBuf,
    pub staged: Vec<StagedPackage>,
    pub skipped: Vec<SkippedEntry>,
    pub missing_groups: Vec<String>,
}

impl StageReport {
    /// Total bytes copied.
    pub fn bytes_copied(&self) -> u64 {
        self.staged.iter().map(|p| p.size).sum()
    }
}

/// List and classify the entries of every configured package group.
///
/// A group named more than once is planned once, at its first position.
pub fn plan(config: &KitConfig, filter: &PackageFilter) -> Result<StagePlan> {
    let mut groups = Vec::with_capacity(config.packages.len());
    let mut seen = HashSet::new();
    for group in &config.packages {
        if !seen.insert(group.as_str()) {
            debug!("package group '{}' listed more than once", group);
            continue;
        }
        let group_plan = plan_group(&config.group_dir(group), group, filter)?;
        if !group_plan.found {
            if config.strict_groups {
                return Err(Error::MissingPackageGroup {
                    group: group.clone(),
                    path: group_plan.dir,
                });
            }
            warn!(
                "package group '{}' not found at {}, skipping",
                group,
                group_plan.dir.display()
            );
        }
        groups.push(group_plan);
    }

    let plan = StagePlan {
        kit_dir: config.kit_dir(),
        packages_dir: config.packages_subdir(),
        groups,
    };
    warn_on_clashes(&plan);
    Ok(plan)
}

fn warn_on_clashes(plan: &StagePlan) {
    let mut owners: HashMap<&OsStr, &str> = HashMap::new();
    for entry in plan.entries() {
        if let Some(earlier) = owners.insert(entry.file_name(), &entry.group) {
            warn!(
                "{} from group '{}' replaces the one from group '{}'",
                entry.file_name().to_string_lossy(),
                entry.group,
                earlier
            );
        }
    }
}

/// Classify the immediate children of one package-group directory.
pub fn plan_group(dir: &Path, group: &str, filter: &PackageFilter) -> Result<GroupPlan> {
    let mut plan = GroupPlan {
        group: group.to_string(),
        dir: dir.to_path_buf(),
        ..GroupPlan::default()
    };

    match fs::metadata(dir) {
        Ok(metadata) if metadata.is_dir() => plan.found = true,
        Ok(_) => {
            debug!("{} is not a directory", dir.display());
            return Ok(plan);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(plan),
        Err(e) => return Err(Error::filesystem("reading package group", dir, e)),
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        // Follow symlinks so a link is judged (and later copied) by its target.
        let metadata = fs::metadata(entry.path())
            .map_err(|e| Error::filesystem("reading metadata of", entry.path(), e))?;

        match filter.classify(&name, &metadata) {
            Selection::Include => plan.entries.push(PackageEntry {
                group: group.to_string(),
                source: entry.path().to_path_buf(),
                size: metadata.len(),
            }),
            reason => {
                debug!("skipping {} ({})", entry.path().display(), reason);
                plan.skipped.push(SkippedEntry {
                    group: group.to_string(),
                    source: entry.path().to_path_buf(),
                    reason,
                });
            }
        }
    }

    Ok(plan)
}

/// Remove the kit directory if present and recreate an empty `Packages`.
pub fn reset_kit_dir(kit_dir: &Path, packages_dir: &Path) -> Result<()> {
    match fs::symlink_metadata(kit_dir) {
        Ok(metadata) if metadata.is_dir() => {
            debug!("removing existing kit {}", kit_dir.display());
            fs::remove_dir_all(kit_dir)
                .map_err(|e| Error::filesystem("removing kit directory", kit_dir, e))?;
        }
        Ok(_) => {
            fs::remove_file(kit_dir)
                .map_err(|e| Error::filesystem("removing kit path", kit_dir, e))?;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(Error::filesystem("inspecting kit directory", kit_dir, e)),
    }

    fs::create_dir_all(packages_dir)
        .map_err(|e| Error::filesystem("creating directory", packages_dir, e))
}

/// Copy one package, forcing mode `0644` and keeping the source timestamps.
pub fn copy_package(source: &Path, destination: &Path) -> Result<u64> {
    // Read the times first: copying reads the source and may bump its atime.
    let metadata = fs::metadata(source)
        .map_err(|e| Error::filesystem("reading metadata of", source, e))?;

    let size = fs::copy(source, destination).map_err(|e| {
        Error::filesystem(
            format!("copying {} to", source.display()),
            destination,
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(destination, fs::Permissions::from_mode(STAGED_FILE_MODE))
            .map_err(|e| Error::filesystem("setting permissions on", destination, e))?;
    }

    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    fs::OpenOptions::new()
        .write(true)
        .open(destination)
        .and_then(|file| file.set_times(times))
        .map_err(|e| Error::filesystem("setting timestamps on", destination, e))?;

    Ok(size)
}

/// Carry out a plan: reset the kit and copy each staged entry.
pub fn execute(plan: &StagePlan) -> Result<StageReport> {
    reset_kit_dir(&plan.kit_dir, &plan.packages_dir)?;

    let mut staged = Vec::new();
    for entry in plan.staged_entries() {
        let destination = plan.packages_dir.join(entry.file_name());
        let size = copy_package(&entry.source, &destination)?;
        debug!("staged {}", destination.display());
        staged.push(StagedPackage {
            group: entry.group.clone(),
            destination,
            size,
        });
    }

    info!(
        "staged {} packages into {}",
        staged.len(),
        plan.packages_dir.display()
    );

    Ok(StageReport {
        kit_dir: plan.kit_dir.clone(),
        staged,
        skipped: plan.skipped().cloned().collect(),
        missing_groups: plan.missing_groups(),
    })
}
