//! Orchestrator for a complete kit build
//!
//! Runs the steps in order, stopping at the first failure:
//! 1. Validate the configuration
//! 2. Plan the kit contents
//! 3. Check the external tools are installed
//! 4. Reset the kit directory and copy packages
//! 5. Generate repository metadata
//! 6. Query the kit as the only enabled repository
//!
//! A dry run stops after planning. Skipping validation stops after step 5.

use std::fs;

use log::info;

use crate::config::KitConfig;
use crate::error::{Error, Result};
use crate::filter::PackageFilter;
use crate::stager::{self, StagePlan, StageReport};
use crate::tools;

/// Switches controlling how far a run goes
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Plan only: no filesystem changes, no tools
    pub dry_run: bool,
    /// Stop after metadata generation
    pub skip_validate: bool,
    /// Drop the tools' standard output
    pub quiet_tools: bool,
}

/// What a run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub plan: StagePlan,
    /// `None` for a dry run
    pub report: Option<StageReport>,
    pub metadata_generated: bool,
    pub validated: bool,
}

/// Build a kit with the default package filter.
pub fn run(config: &KitConfig, options: &RunOptions) -> Result<RunSummary> {
    run_with_filter(config, &PackageFilter::default(), options)
}

/// Build a kit, selecting packages with `filter`.
pub fn run_with_filter(
    config: &KitConfig,
    filter: &PackageFilter,
    options: &RunOptions,
) -> Result<RunSummary> {
    config.validate()?;

    let plan = stager::plan(config, filter)?;
    if options.dry_run {
        info!("dry run: {} packages planned", plan.entries().count());
        return Ok(RunSummary {
            plan,
            report: None,
            metadata_generated: false,
            validated: false,
        });
    }

    // Before the kit is removed, so a missing tool leaves the old kit intact.
    tools::check_available(&config.tools, !options.skip_validate)?;

    let report = stager::execute(&plan)?;

    // The query tool resolves repository paths itself; hand both tools an
    // absolute kit path.
    let kit_dir = fs::canonicalize(&report.kit_dir)
        .map_err(|e| Error::filesystem("resolving kit directory", &report.kit_dir, e))?;

    tools::generate_metadata(&config.tools, &kit_dir, options.quiet_tools)?;

    let validated = if options.skip_validate {
        false
    } else {
        tools::validate_metadata(&config.tools, &kit_dir)?;
        true
    };

    Ok(RunSummary {
        plan,
        report: Some(report),
        metadata_generated: true,
        validated,
    })
}
