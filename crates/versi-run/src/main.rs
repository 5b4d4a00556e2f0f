mod logging;

use std::path::PathBuf;
use std::process::{ExitCode, ExitStatus};

use clap::Parser;
use thiserror::Error;
use versi_scope::{ScopeOptions, VersionDetectionError, with_required_version};

#[derive(Parser, Debug)]
#[command(name = "versi-run")]
#[command(version, about = "Run a command under the project's Node.js version")]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// JSON options file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project directory holding .nvmrc or package.json
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Also write debug logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Program to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Detection(#[from] VersionDetectionError),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn load_options(cli: &Cli) -> anyhow::Result<ScopeOptions> {
    let mut options = match &cli.config {
        Some(path) => ScopeOptions::load(path)?,
        None => ScopeOptions::default(),
    };
    if let Some(cwd) = &cli.cwd {
        options.working_dir.clone_from(cwd);
    }
    Ok(options.with_env_defaults())
}

fn exit_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .map_or(ExitCode::FAILURE, ExitCode::from)
}

async fn run(options: &ScopeOptions, program: &str, args: &[String]) -> Result<ExitCode, RunError> {
    with_required_version(options, || async {
        let status = tokio::process::Command::new(program)
            .args(args)
            .current_dir(&options.working_dir)
            .status()
            .await
            .map_err(|source| RunError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok::<_, RunError>(exit_code(status))
    })
    .await
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug, cli.log_file.as_deref());

    let options = load_options(&cli)?;
    log::debug!("Options: {options:?}");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let Some((program, args)) = cli.command.split_first() else {
        anyhow::bail!("no command given");
    };

    Ok(runtime.block_on(run(&options, program, args))?)
}
