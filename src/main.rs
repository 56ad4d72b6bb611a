use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

use synth2yolo::{convert_dataset, read_manifest, setup_output_directory, Args, ConversionError};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting the conversion process...");

    match run(&args) {
        Ok(()) => {
            info!("Conversion process completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConversionError> {
    let manifest = read_manifest(Path::new(&args.manifest), args.manual_size())?;
    let output_dir =
        setup_output_directory(&args.output_dir()).map_err(ConversionError::OutputDir)?;

    let stats = convert_dataset(
        &manifest.images,
        &manifest.names,
        &output_dir,
        &args.to_convert_options(),
    )?;
    stats.print_summary();
    Ok(())
}
