//! Command line surface of the `sidenav` binary.

use crate::discover::discover_pages;
use crate::error::SidenavError;
use crate::runner::{OutputMode, RunSummary, Runner};
use crate::settings::load_config;
use clap::{Parser, ValueEnum};
use sidenav_sidebar::{CollisionPolicy, MissingPolicy, SidebarBuilder, SidebarConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingArg {
    Skip,
    Truncate,
    Abort,
}

impl From<MissingArg> for MissingPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Skip => MissingPolicy::Skip,
            MissingArg::Truncate => MissingPolicy::Truncate,
            MissingArg::Abort => MissingPolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    Keep,
    Suffix,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Keep => CollisionPolicy::Keep,
            CollisionArg::Suffix => CollisionPolicy::Suffix,
        }
    }
}

/// Adds a class and method navigation sidebar to rendered API reference pages.
#[derive(Parser, Debug)]
#[command(name = "sidenav", version, about)]
pub struct Args {
    /// Page files or directories to walk for .html/.xhtml pages
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// JSON configuration file (defaults to $SIDENAV_CONFIG if set)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write pages under this directory instead of in place
    #[arg(short, long, conflicts_with = "dry_run")]
    pub out_dir: Option<PathBuf>,

    /// Print the planned changes as JSON without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override what happens when a container or name element is missing
    #[arg(long, value_enum)]
    pub on_missing: Option<MissingArg>,

    /// Override how identical anchors are resolved
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionArg>,
}

impl Args {
    /// Applies the command line policy overrides on top of `config`.
    pub fn apply_overrides(&self, mut config: SidebarConfig) -> SidebarConfig {
        if let Some(policy) = self.on_missing {
            config = config.with_missing_policy(policy.into());
        }
        if let Some(policy) = self.on_collision {
            config = config.with_collision_policy(policy.into());
        }
        config
    }

    /// The configuration file (or defaults) with overrides applied.
    pub fn sidebar_config(&self) -> Result<SidebarConfig, SidenavError> {
        Ok(self.apply_overrides(load_config(self.config.as_deref())?))
    }

    pub fn output_mode(&self) -> OutputMode {
        match (self.dry_run, &self.out_dir) {
            (true, _) => OutputMode::DryRun,
            (false, Some(dir)) => OutputMode::Directory(dir.clone()),
            (false, None) => OutputMode::InPlace,
        }
    }
}

/// Runs the whole tool. In dry-run mode the reports are printed as JSON.
pub fn run(args: &Args) -> Result<RunSummary, SidenavError> {
    let config = args.sidebar_config()?;
    let output = args.output_mode();
    let dry_run = output == OutputMode::DryRun;

    let pages = discover_pages(&args.paths)?;
    if pages.is_empty() {
        log::warn!("No pages found");
    }

    let runner = Runner::new(SidebarBuilder::new(config)?, output);
    let reports = runner.run(&pages)?;
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let summary = RunSummary::from_reports(&reports);
    log::info!(
        "{} updated, {} unchanged, {} already built, {} failed",
        summary.updated,
        summary.unchanged,
        summary.already_present,
        summary.failed
    );
    Ok(summary)
}

/// Process exit status: 0 only when the run completed and no page failed.
pub fn exit_status(result: &Result<RunSummary, SidenavError>) -> u8 {
    match result {
        Ok(summary) if summary.is_success() => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_overrides_win_over_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("sidenav.json");
        fs::write(
            &config,
            r#"{ "on_missing": "abort", "anchors": { "on_collision": "keep" } }"#,
        )
        .unwrap();
        let config = config.to_str().unwrap();

        let args = Args::try_parse_from(["sidenav", "--config", config, "site"]).unwrap();
        let loaded = args.sidebar_config().unwrap();
        assert_eq!(loaded.on_missing, MissingPolicy::Abort);
        assert_eq!(loaded.anchors.on_collision, CollisionPolicy::Keep);

        let args = Args::try_parse_from([
            "sidenav",
            "--config",
            config,
            "--on-missing",
            "truncate",
            "--on-collision",
            "suffix",
            "site",
        ])
        .unwrap();
        let loaded = args.sidebar_config().unwrap();
        assert_eq!(loaded.on_missing, MissingPolicy::Truncate);
        assert_eq!(loaded.anchors.on_collision, CollisionPolicy::Suffix);
    }

    #[test]
    fn test_overrides_leave_unset_policies_alone() {
        let args = Args::try_parse_from(["sidenav", "--on-missing", "skip", "site"]).unwrap();
        let base = SidebarConfig::default()
            .with_missing_policy(MissingPolicy::Abort)
            .with_collision_policy(CollisionPolicy::Keep);
        let config = args.apply_overrides(base);
        assert_eq!(config.on_missing, MissingPolicy::Skip);
        assert_eq!(config.anchors.on_collision, CollisionPolicy::Keep);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Args::try_parse_from(["sidenav", "--on-missing", "ignore", "site"]).is_err());
        assert!(Args::try_parse_from(["sidenav"]).is_err());
        assert!(
            Args::try_parse_from(["sidenav", "--dry-run", "--out-dir", "out", "site"]).is_err()
        );
    }

    #[test]
    fn test_output_mode() {
        let args = Args::try_parse_from(["sidenav", "site"]).unwrap();
        assert_eq!(args.output_mode(), OutputMode::InPlace);
        let args = Args::try_parse_from(["sidenav", "-o", "out", "site"]).unwrap();
        assert_eq!(args.output_mode(), OutputMode::Directory(PathBuf::from("out")));
        let args = Args::try_parse_from(["sidenav", "--dry-run", "site"]).unwrap();
        assert_eq!(args.output_mode(), OutputMode::DryRun);
    }

    #[test]
    fn test_exit_status() {
        let clean = RunSummary {
            updated: 2,
            unchanged: 1,
            ..Default::default()
        };
        let failed = RunSummary { failed: 1, ..clean };
        assert_eq!(exit_status(&Ok(clean)), 0);
        assert_eq!(exit_status(&Ok(failed)), 1);

        let err = SidenavError::io("missing.html", std::io::ErrorKind::NotFound.into());
        assert_eq!(exit_status(&Err(err)), 1);
    }
}
