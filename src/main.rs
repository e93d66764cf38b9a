use anyhow::Result;
use clap::Parser;
use pkgcopy::commands::{CpArgs, cp};
use pkgcopy::copy::CopyOptions;

/// pkgcopy - Copy a package from one repository to another
///
/// The package is looked up in the search paths (PKGCOPY_PACKAGES_PATH,
/// defaulting to the local packages path) and copied variant by variant into
/// the destination repository.
///
/// Examples:
///   pkgcopy foo-1.2 /studio/packages          # Copy every variant of foo-1.2
///   pkgcopy foo-1.2 /studio --variants 0 2    # Copy variants 0 and 2 only
#[derive(Parser, Debug)]
#[command(author, version = env!("PKGCOPY_VERSION"), about)]
struct Cli {
    /// Set package search path (ignores --no-local if set)
    #[arg(long, value_name = "PATHS")]
    paths: Option<String>,

    /// Don't search local packages
    #[arg(long = "no-local", visible_alias = "nl")]
    no_local: bool,

    /// Overwrite existing package/variants
    #[arg(short, long)]
    overwrite: bool,

    /// Perform a shallow copy (symlink directories)
    #[arg(short, long)]
    shallow: bool,

    /// Keep timestamp of source package. Ignored when copying variants into
    /// an existing package.
    #[arg(short, long)]
    keep_timestamp: bool,

    /// Copy package even if it isn't relocatable (use at your own risk)
    #[arg(short, long)]
    force: bool,

    /// Dry run mode
    #[arg(long)]
    dry_run: bool,

    /// Select variants to copy (zero-indexed)
    #[arg(long, value_name = "INDEX", num_args = 1..)]
    variants: Vec<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Package to copy
    #[arg(value_name = "PKG")]
    package: String,

    /// Path of repository to copy package to
    #[arg(value_name = "DST_REPO")]
    dest_repo: String,
}

impl Cli {
    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    fn into_args(self) -> CpArgs {
        CpArgs {
            package: self.package,
            dest_repo: self.dest_repo,
            paths: self.paths,
            no_local: self.no_local,
            variants: self.variants,
            options: CopyOptions {
                overwrite: self.overwrite,
                shallow: self.shallow,
                keep_timestamp: self.keep_timestamp,
                force: self.force,
                dry_run: self.dry_run,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let runtime = pkgcopy::runtime::RealRuntime;
    cp(runtime, &cli.into_args())
}
