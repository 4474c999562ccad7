//! Bbox command - show the query area around a position.

use cellguard::config::ConfigFile;
use cellguard::coord::BoundingBox;

use super::common::PositionArgs;
use crate::error::CliError;

/// Run the bbox command.
pub fn run(position: PositionArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let radius_km = position.radius_km(&config)?;

    let Some(center) = position.location()? else {
        return Err(CliError::InvalidArgument(
            "position 0,0 is treated as unknown".to_string(),
        ));
    };

    let bbox = BoundingBox::around(&center, radius_km);
    println!("Center:  {}", center);
    println!("Radius:  {} km", radius_km);
    println!("Min:     {}", bbox.min());
    println!("Max:     {}", bbox.max());
    if bbox.crosses_antimeridian() {
        println!("Note:    the box crosses the antimeridian");
    }
    println!("BBOX=    {}", bbox.to_bbox_param());
    Ok(())
}
