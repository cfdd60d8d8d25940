use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use hashdig::cli::App;
use hashdig::config::RunConfig;
use hashdig::engine::Engine;
use hashdig::report;
use hashdig::sink::Sinks;
use hashdig_archive::SevenZip;
use hashdig_fs::ScratchWorkspace;

fn main() -> ExitCode {
    let app = App::parse();
    if app.man {
        let mut cmd = App::command();
        let _ = cmd.print_long_help();
        return ExitCode::SUCCESS;
    }

    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> Result<()> {
    let config = RunConfig::from_args(app)?;

    // Fatal configuration checks come before any output file is created.
    let tool =
        SevenZip::discover(&config.archive_bin, config.debug).context("archive tool not usable")?;
    if config.verbose {
        report::note(format!(
            "archive tool: {} (version {})",
            tool.bin().display(),
            tool.version()
        ));
    }

    let mut sinks = Sinks::open(&config).context("cannot open output files")?;
    let mut scratch =
        ScratchWorkspace::init(&config.tmp_root).context("cannot create scratch workspace")?;

    // The Drop guard on the workspace covers every in-process exit path;
    // this hook extends the cleanup guarantee to interruption.
    let scratch_path = scratch.path().to_path_buf();
    ctrlc::set_handler(move || {
        let _ = std::fs::remove_dir_all(&scratch_path);
        std::process::exit(130);
    })
    .context("cannot install interrupt handler")?;

    let result = Engine::new(&config, &tool, &mut sinks, &mut scratch).run();
    scratch.dispose();
    result
}
