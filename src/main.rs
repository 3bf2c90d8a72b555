use std::process::ExitCode;

use clap::Parser;

use appstore_deploy::cli::{Cli, Task};
use appstore_deploy::errors::exit_code_for_task_error;
use appstore_deploy::runner::{DryRunRunner, SystemRunner, ToolRunner};
use appstore_deploy::{
    color_enabled_stderr, doctor, log_error_stderr, platform, promote, release, TaskError,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(mode) = cli.color {
        appstore_deploy::set_color_mode(mode);
    }

    match cli.command {
        Task::Doctor => {
            doctor::run_doctor();
            ExitCode::SUCCESS
        }
        Task::Release(args) => {
            let inputs = args.into_inputs();
            run_task(cli.verbose, cli.dry_run, |runner| {
                release::run_release(&inputs, platform::current_os(), runner)
            })
        }
        Task::Promote(args) => {
            let inputs = args.into_inputs();
            run_task(cli.verbose, cli.dry_run, |runner| {
                promote::run_promote(&inputs, platform::current_os(), runner)
            })
        }
    }
}

fn run_task(
    verbose: bool,
    dry_run: bool,
    task: impl FnOnce(&mut dyn ToolRunner) -> Result<(), TaskError>,
) -> ExitCode {
    let mut runner: Box<dyn ToolRunner> = if dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner::new(verbose))
    };

    match task(runner.as_mut()) {
        Ok(()) => {
            // The host treats this line plus exit code 0 as task success.
            println!("Success");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let use_err = color_enabled_stderr();
            log_error_stderr(use_err, &format!("appstore-deploy: task failed: {e}"));
            // Marker line consumed by the host's log-issue mechanism.
            println!("{e}");
            ExitCode::from(exit_code_for_task_error(&e))
        }
    }
}
