use anyhow::{Result, bail};
use log::{debug, info};
use std::path::PathBuf;

use crate::copy::{CopyOptions, CopyRequest, RelocatabilityChecker, copy_package};
use crate::package::{Package, PackageRequest, find_packages};
use crate::runtime::Runtime;

pub mod config;
mod report;

pub use config::Config;
pub use report::report_lines;

/// Arguments of the `cp` command, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CpArgs {
    /// Package request, e.g. `foo`, `foo-1.2`, `foo==1.2.0`
    pub package: String,
    /// Destination repository location
    pub dest_repo: String,
    /// Explicit search path list, overrides `no_local`
    pub paths: Option<String>,
    pub no_local: bool,
    pub variants: Vec<usize>,
    pub options: CopyOptions,
}

/// Copy the single package matching `args.package` into `args.dest_repo` and
/// print what happened.
#[tracing::instrument(skip(runtime))]
pub fn cp<R: Runtime>(runtime: R, args: &CpArgs) -> Result<()> {
    let config = Config::load(&runtime)?;
    for line in run_cp(&runtime, &config, args)? {
        println!("{}", line);
    }
    Ok(())
}

/// Resolve, copy and return the report lines.
pub fn run_cp<R: Runtime>(runtime: &R, config: &Config, args: &CpArgs) -> Result<Vec<String>> {
    let paths = config.search_paths(args.paths.as_deref(), args.no_local);
    let package = resolve_package(runtime, &paths, &args.package)?;
    info!("Copying {} to {}", package.uri, args.dest_repo);

    let request = CopyRequest {
        package: &package,
        dest_location: args.dest_repo.clone(),
        variants: (!args.variants.is_empty()).then(|| args.variants.clone()),
        options: args.options,
    };
    let checker = RelocatabilityChecker::new(config.default_relocatable);
    let result = copy_package(runtime, checker, &request)?;
    debug!(
        "{} copied, {} skipped",
        result.copied.len(),
        result.skipped.len()
    );

    Ok(report_lines(&package, &result, args.options.dry_run))
}

/// Find the one package matching `request` in `paths`.
pub fn resolve_package<R: Runtime>(
    runtime: &R,
    paths: &[PathBuf],
    request: &str,
) -> Result<Package> {
    let request: PackageRequest = request.parse()?;
    let mut packages = find_packages(runtime, paths, &request)?;

    match packages.len() {
        0 => bail!("No matching packages found."),
        1 => Ok(packages.remove(0)),
        _ => {
            packages.sort_by(|a, b| a.version().cmp(b.version()));
            let names: Vec<String> = packages.iter().map(|p| p.qualified_name()).collect();
            bail!(
                "More than one package matches, please choose:\n{}",
                names.join("\n")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use crate::test_utils::RepoFixture;

    fn config(local: &RepoFixture) -> Config {
        Config {
            packages_path: vec![local.root().to_path_buf()],
            local_packages_path: local.root().to_path_buf(),
            default_relocatable: true,
        }
    }

    fn args(package: &str, dst: &RepoFixture) -> CpArgs {
        CpArgs {
            package: package.into(),
            dest_repo: dst.root().display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_single_match() {
        let src = RepoFixture::new();
        src.add_package("foo", "1.0", &[]);
        src.add_package("foo", "2.0", &[]);

        let package =
            resolve_package(&RealRuntime, &[src.root().to_path_buf()], "foo-2").unwrap();
        assert_eq!(package.qualified_name(), "foo-2.0");
    }

    #[test]
    fn test_resolve_no_match() {
        let src = RepoFixture::new();
        src.add_package("foo", "1.0", &[]);

        let err =
            resolve_package(&RealRuntime, &[src.root().to_path_buf()], "bar").unwrap_err();
        assert_eq!(err.to_string(), "No matching packages found.");
    }

    #[test]
    fn test_resolve_ambiguous_lists_candidates_by_version() {
        let first = RepoFixture::new();
        let second = RepoFixture::new();
        first.add_package("foo", "1.10", &[]);
        second.add_package("foo", "1.2", &[]);

        let paths = vec![first.root().to_path_buf(), second.root().to_path_buf()];
        let err = resolve_package(&RealRuntime, &paths, "foo").unwrap_err();
        assert_eq!(
            err.to_string(),
            "More than one package matches, please choose:\nfoo-1.2\nfoo-1.10"
        );
    }

    #[test]
    fn test_run_cp_reports_copied_variants() {
        let src = RepoFixture::new();
        let dst = RepoFixture::new();
        let package = src.add_package("foo", "1.0", &[&["a"], &["b"]]);

        let mut cp_args = args("foo", &dst);
        cp_args.variants = vec![1];
        let lines = run_cp(&RealRuntime, &config(&src), &cp_args).unwrap();

        assert_eq!(lines[0], "1 variants were copied:");
        assert_eq!(
            lines[1],
            format!(
                "  {}[1] -> {}[0]",
                package.uri,
                dst.root().join("foo/1.0/package.json").display()
            )
        );
    }

    #[test]
    fn test_run_cp_explicit_paths_override_config() {
        let local = RepoFixture::new();
        let other = RepoFixture::new();
        let dst = RepoFixture::new();
        other.add_package("foo", "1.0", &[]);

        let mut cp_args = args("foo", &dst);
        cp_args.no_local = true;
        cp_args.paths = Some(other.root().display().to_string());
        let lines = run_cp(&RealRuntime, &config(&local), &cp_args).unwrap();

        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Copied "));
    }

    #[test]
    fn test_run_cp_no_local_excludes_local_repository() {
        let local = RepoFixture::new();
        let dst = RepoFixture::new();
        local.add_package("foo", "1.0", &[]);

        let mut cp_args = args("foo", &dst);
        cp_args.no_local = true;
        let err = run_cp(&RealRuntime, &config(&local), &cp_args).unwrap_err();
        assert_eq!(err.to_string(), "No matching packages found.");
    }
}
