use std::sync::Arc;

use clap::Args;
use comfy_table::Table;
use courier_planner::{DestinationSorter, RouteCalculator, RouteError, TravelTimeMatrixClient};
use courier_providers::{Coordinate, provider_client::ProviderClient};
use tracing::info;

use crate::output::route_geojson;

#[derive(Args)]
pub struct SortArgs {
    /// The starting point, as "lat,lon"
    #[arg(short, long)]
    origin: Coordinate,

    /// A stop to visit, as "lat,lon". Repeat for every stop
    #[arg(short, long = "destination", required = true)]
    destinations: Vec<Coordinate>,
}

pub async fn run(args: SortArgs, client: Arc<ProviderClient>) -> anyhow::Result<()> {
    let sorter = DestinationSorter::new(TravelTimeMatrixClient::new(Arc::clone(&client)));
    let calculator = RouteCalculator::new(client);

    info!("Sorting {} destinations", args.destinations.len());
    let estimates = sorter
        .sorted_estimates(args.origin, &args.destinations)
        .await?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Latitude", "Longitude", "Travel time (s)"]);
    for (index, estimate) in estimates.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            estimate.destination.latitude().to_string(),
            estimate.destination.longitude().to_string(),
            format!("{:.0}", estimate.seconds),
        ]);
    }
    println!("{table}");

    let mut waypoints = vec![args.origin];
    waypoints.extend(estimates.iter().map(|estimate| estimate.destination));

    let geometry = match calculator.calculate_route(&waypoints).await {
        Ok(geometry) => Some(geometry),
        Err(RouteError::InsufficientWaypoints(_)) => None,
        Err(RouteError::Service(err)) => return Err(err.into()),
    };

    println!("{}", route_geojson(geometry.as_ref()));

    Ok(())
}
