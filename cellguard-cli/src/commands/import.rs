//! Import command - load towers from an OpenCellID export file.

use std::path::PathBuf;

use cellguard::import::ImportTask;
use cellguard::platform::Destination;

use super::common::{area_request, print_towers, write_towers_csv, CellArgs, ConsolePlatform, PositionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the import command.
pub struct ImportArgs {
    pub file: PathBuf,
    pub position: PositionArgs,
    pub cell: CellArgs,
    pub output: Option<PathBuf>,
}

/// Run the import command.
pub fn run(args: ImportArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("import");

    let request = area_request(&args.position, &args.cell, runner.config())?;

    let console = ConsolePlatform::new();
    let importer = ImportTask::new(console.platform.clone(), runner.handle());

    let listener = console.reconcile_listener(request.cell);
    let handle = importer.start(&args.file, &request, listener)?;
    let summary = runner.block_on(handle.wait())?;

    println!(
        "Read {} rows from {}, kept {}, stored {}",
        summary.read,
        summary.path.display(),
        summary.kept,
        summary.stored
    );
    let towers = console.store.towers(Destination::Import);
    print_towers(&towers);

    if let Some(path) = args.output {
        write_towers_csv(&path, &towers)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
