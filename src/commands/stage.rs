//! Stage command implementation
//!
//! Builds a kit in three steps:
//! 1. Copy qualifying packages from each package group into `<output>/<arch>/Packages`
//! 2. Generate repository metadata over the kit
//! 3. Query the kit as the only enabled repository

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use kit_stager::config::{KitConfig, ToolConfig, DEFAULT_CREATEREPO, DEFAULT_DNF, DEFAULT_REPO_ID};
use kit_stager::output::{emoji, format_size, plural, OutputConfig};
use kit_stager::pipeline::{self, RunOptions, RunSummary};
use kit_stager::suggestions;

/// Arguments for staging a kit
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Root directory with one subdirectory per package group
    #[arg(long, value_name = "PATH")]
    pub packages_dir: PathBuf,

    /// Package group to include; repeat for more groups
    #[arg(long = "package", value_name = "NAME", required = true)]
    pub packages: Vec<String>,

    /// Output root; the kit is written to <OUTPUT_DIR>/<ARCH>
    #[arg(long, value_name = "PATH")]
    pub output_dir: PathBuf,

    /// Architecture identifier for the kit
    #[arg(long, value_name = "ID", env = "ARCH")]
    pub arch: String,

    /// Repository metadata generator
    #[arg(long, value_name = "PROGRAM", env = "KIT_STAGER_CREATEREPO", default_value = DEFAULT_CREATEREPO)]
    pub createrepo: String,

    /// Repository query tool used to validate the kit
    #[arg(long, value_name = "PROGRAM", env = "KIT_STAGER_DNF", default_value = DEFAULT_DNF)]
    pub dnf: String,

    /// Repository id the kit is registered under during validation
    #[arg(long, value_name = "ID", default_value = DEFAULT_REPO_ID)]
    pub repo_id: String,

    /// Fail when a package group directory does not exist
    #[arg(long)]
    pub strict: bool,

    /// Generate metadata but do not query the kit
    #[arg(long)]
    pub skip_validate: bool,

    /// Show what would be staged without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// List every staged and skipped entry
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl StageArgs {
    /// Library configuration for these arguments.
    pub fn to_config(&self) -> KitConfig {
        KitConfig::new(
            self.packages_dir.clone(),
            self.packages.clone(),
            self.output_dir.clone(),
            self.arch.clone(),
        )
        .with_strict_groups(self.strict)
        .with_tools(ToolConfig {
            createrepo: self.createrepo.clone(),
            dnf: self.dnf.clone(),
            repo_id: self.repo_id.clone(),
        })
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            skip_validate: self.skip_validate,
            quiet_tools: self.quiet,
        }
    }
}

/// Execute the stage command
pub fn execute(args: &StageArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();
    let config = args.to_config();

    if !args.quiet {
        println!(
            "{} Staging kit {}",
            emoji(&out, "📦", "[KIT]"),
            config.kit_dir().display()
        );
        if args.dry_run {
            println!(
                "{} DRY RUN MODE - No changes will be made",
                emoji(&out, "🔎", "[DRY]")
            );
        }
        println!();
    }

    let summary = match pipeline::run(&config, &args.run_options()) {
        Ok(summary) => summary,
        Err(e) => {
            if !args.quiet {
                println!("{} Staging failed", emoji(&out, "❌", "[ERR]"));
                println!();
            }
            return Err(suggestions::with_hints(e));
        }
    };

    if !args.quiet {
        report(&out, args, &summary);
        println!(
            "{} Done in {:.2}s",
            emoji(&out, "✅", "[OK]"),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn report(out: &OutputConfig, args: &StageArgs, summary: &RunSummary) {
    let plan = &summary.plan;

    if args.verbose {
        for entry in plan.staged_entries() {
            println!("   + {} ({})", entry.source.display(), entry.group);
        }
        for skipped in plan.skipped() {
            println!("   - {} ({})", skipped.source.display(), skipped.reason);
        }
    }

    for group in plan.missing_groups() {
        println!(
            "{} Package group '{}' not found, skipped",
            emoji(out, "⚠️ ", "[WARN]"),
            group
        );
    }

    let (verb, staged, bytes, skipped) = match &summary.report {
        Some(report) => (
            "Staged",
            report.staged.len(),
            report.bytes_copied(),
            report.skipped.len(),
        ),
        None => (
            "Would stage",
            plan.staged_entries().len(),
            plan.total_bytes(),
            plan.skipped().count(),
        ),
    };
    println!(
        "   {} {} ({}), skipped {}",
        verb,
        plural(staged, "package"),
        format_size(bytes),
        skipped
    );

    if summary.metadata_generated {
        println!("   Repository metadata generated");
    }
    if summary.validated {
        println!("   Repository query succeeded");
    }
    if let Some(report) = &summary.report {
        println!("   Kit written to: {}", report.kit_dir.display());
    }
}
