//! Fetch command - download OpenCellID data around a position.

use std::path::PathBuf;

use cellguard::config::ApiKey;
use cellguard::platform::Destination;
use cellguard::provider::{FetchConfig, OcidFetcher, ReqwestClient};

use super::common::{area_request, print_towers, write_towers_csv, CellArgs, ConsolePlatform, PositionArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub position: PositionArgs,
    pub cell: CellArgs,
    pub api_key: Option<String>,
    pub output: Option<PathBuf>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("fetch");
    let config = runner.config();

    // CLI takes precedence, then config
    let api_key = match args.api_key.as_deref() {
        Some(raw) => ApiKey::parse(raw),
        None => config.ocid.api_key.clone(),
    };
    let fetch_config = FetchConfig {
        api_key,
        ..FetchConfig::from(&config.ocid)
    };

    let request = area_request(&args.position, &args.cell, config)?;
    let client = ReqwestClient::with_timeout(config.ocid.timeout())
        .map_err(|e| CliError::Config(e.to_string()))?;

    let console = ConsolePlatform::new();
    let fetcher = OcidFetcher::new(
        client,
        fetch_config,
        console.platform.clone(),
        runner.handle(),
    );

    let listener = console.reconcile_listener(request.cell);
    let handle = fetcher.fetch(&request, Destination::MapView, listener)?;
    let summary = runner.block_on(handle.wait())?;

    println!(
        "Stored {} of {} towers for {}",
        summary.stored, summary.received, summary.bbox
    );
    let towers = console.store.towers(Destination::MapView);
    print_towers(&towers);

    if let Some(path) = args.output {
        write_towers_csv(&path, &towers)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
