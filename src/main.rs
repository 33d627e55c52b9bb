extern crate fault_schedule;

use anyhow::anyhow;
use clap::Parser;
use fault_schedule::output::FileOutput;
use fault_schedule::{run_project, ProjectFlags};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct FaultScheduleArgs {
    input_file: String,
    /// directory to write outputs into (defaults to the input file's directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    /// also replay the intensity programs and write a per-timestep trace
    #[clap(long, default_value_t = false)]
    intensity_trace: bool,
    /// also write each intensity program as an EMS program
    #[clap(long, default_value_t = false)]
    emit_erl: bool,
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = FaultScheduleArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_path = Path::new(args.input_file.as_str());
    let input_file_stem = input_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("Could not determine a file stem for {}", args.input_file))?;
    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let mut flags = ProjectFlags::empty();
    flags.set(ProjectFlags::INTENSITY_TRACE, args.intensity_trace);
    flags.set(ProjectFlags::EMIT_ERL, args.emit_erl);

    let file_output = FileOutput::new(output_dir, format!("{input_file_stem}__{{}}"));

    let result = run_project(
        BufReader::new(File::open(input_path)?),
        &file_output,
        &flags,
    );

    if let Err(e) = &result {
        error!("{e}");
    }

    result.map(|_| ()).map_err(Into::into)
}
