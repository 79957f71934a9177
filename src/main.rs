use anyhow::{Context, Result};
use clap::Parser;

use release_that::boundary::BoundaryWarning;
use release_that::cli::{run_release, ReleaseArgs, VersionSelector};
use release_that::config;
use release_that::context::ReleaseContext;
use release_that::git::{Git2Repository, Repository};
use release_that::hooks::HookFilter;
use release_that::logging;
use release_that::ui::{self, Console};

#[derive(clap::Parser)]
#[command(
    name = "release-that",
    version,
    about = "Compute the next version, run hooks, commit, tag and push a release"
)]
struct Args {
    #[arg(long, help = "Disable all hooks")]
    no_hooks: bool,

    #[arg(
        long,
        value_name = "NAMES",
        value_delimiter = ',',
        help = "Disable hooks for these events (comma separated)"
    )]
    no_hook: Vec<String>,

    #[arg(long, help = "Run every step without changing the repository")]
    dry_run: bool,

    #[arg(long, help = "Bump to the next patch version")]
    patch: bool,

    #[arg(long, help = "Bump to the next minor version")]
    minor: bool,

    #[arg(long, help = "Bump to the next major version")]
    major: bool,

    #[arg(
        long,
        value_name = "VERSION",
        num_args = 0..=1,
        help = "Release a custom version (prompted for when omitted)"
    )]
    custom: Option<Option<String>>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Write a default release.toml and exit")]
    init: bool,

    #[arg(short, long, help = "Overwrite an existing release.toml with --init")]
    force: bool,

    #[arg(short, long, help = "Print only the released version")]
    quiet: bool,

    #[arg(long, help = "Disable colored output")]
    no_ansi: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if args.no_ansi {
        console::set_colors_enabled(false);
    }

    if let Err(e) = logging::init(args.verbose, !args.no_ansi) {
        eprintln!("{}", ui::format_warning(&e.to_string()));
    }

    if let Err(e) = run(args) {
        eprintln!("{}", ui::format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let workdir = std::env::current_dir().context("cannot determine working directory")?;

    if args.init {
        let path = config::write_default_config(&workdir, args.force)?;
        println!(
            "{}",
            ui::format_success(&format!("Created {}", path.display()))
        );
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref(), &workdir)?;

    let (filter, unknown) = HookFilter::new(args.no_hooks, &args.no_hook);
    let console = Console::stdio().with_quiet(args.quiet);
    let mut ctx = ReleaseContext::new(config, console, &filter, &workdir, args.dry_run);
    for name in unknown {
        ctx.console
            .boundary_warning(&BoundaryWarning::UnknownHookName { name });
    }

    let release_args = ReleaseArgs {
        selector: VersionSelector::from_flags(args.major, args.minor, args.patch, args.custom),
    };

    let report = run_release(&release_args, &mut ctx, |path| {
        let repository = Git2Repository::open(path)?;
        Ok(Box::new(repository) as Box<dyn Repository>)
    })?;

    tracing::info!(
        version = %report.version,
        commit = ?report.commit,
        tag = ?report.tag,
        push = ?report.push,
        "release finished"
    );

    Ok(())
}
