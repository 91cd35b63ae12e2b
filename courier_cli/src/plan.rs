use std::sync::Arc;

use courier_planner::{
    CoordinateStore, DestinationSorter, RecomputationController, RouteCalculator, RouteEvent,
    TravelTimeMatrixClient,
};
use courier_providers::{Coordinate, provider_client::ProviderClient};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::{info, warn};

use crate::{output::route_geojson, parsers::parse_lat_lon};

#[derive(Debug, PartialEq)]
enum Command {
    Origin(f64, f64),
    Add(f64, f64),
    Refresh,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

    let command = match verb {
        "origin" => {
            let (lat, lon) = parse_lat_lon(rest)?;
            Command::Origin(lat, lon)
        }
        "add" => {
            let (lat, lon) = parse_lat_lon(rest)?;
            Command::Add(lat, lon)
        }
        "refresh" => Command::Refresh,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command \"{other}\"")),
    };

    Ok(Some(command))
}

fn print_event(event: RouteEvent) {
    match event {
        RouteEvent::RoutePublished {
            generation,
            geometry,
        } => {
            info!("Route {} published", generation);
            println!("{}", route_geojson(geometry.as_ref()));
        }
        RouteEvent::ComputationFailed { generation, error } => {
            eprintln!("Route {} failed: {}", generation, error);
        }
    }
}

/// Reads commands from stdin and prints every route published in response.
pub async fn run(client: Arc<ProviderClient>) -> anyhow::Result<()> {
    let controller = RecomputationController::new(
        DestinationSorter::new(TravelTimeMatrixClient::new(Arc::clone(&client))),
        RouteCalculator::new(client),
    );

    let mut store = CoordinateStore::default();
    let store_events = store.subscribe();
    let listener = tokio::spawn({
        let controller = controller.clone();
        async move { controller.listen(store_events).await }
    });

    let mut route_events = controller.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match route_events.recv().await {
                Ok(event) => print_event(event),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} route events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    info!(
        "Origin is {}. Commands: origin <lat,lon>, add <lat,lon>, refresh, quit",
        store.origin()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(Command::Origin(lat, lon))) => {
                if let Err(err) = store.set_origin_raw(lat, lon) {
                    eprintln!("Origin unchanged: {err}");
                }
            }
            Ok(Some(Command::Add(lat, lon))) => match Coordinate::new(lat, lon) {
                Ok(destination) => store.add_destination(destination),
                Err(err) => eprintln!("Destination rejected: {err}"),
            },
            Ok(Some(Command::Refresh)) => store.request_refresh(),
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    drop(store);
    listener.await?;
    drop(controller);
    printer.await?;

    Ok(())
}
