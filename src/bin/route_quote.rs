use clap::Parser;

use haulcost::api::{RouteAPI, RouteRequest};
use haulcost::config::Config;
use haulcost::engine::Engine;
use haulcost::entities::{Waypoints, MAX_WAYPOINTS};
use haulcost::presentation::summary_lines;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Estimate the hauling cost of a route through Google Maps"
)]
struct Args {
    /// Origin as "lat,lng" or a street address
    #[arg(long)]
    origin: String,

    /// Destination as "lat,lng" or a street address
    #[arg(long)]
    destination: String,

    /// Load weight in kilograms
    #[arg(long)]
    weight: String,

    /// Intermediate stop; repeat for up to three stops
    #[arg(long = "waypoint")]
    waypoints: Vec<String>,

    /// Print the line-item fee breakdown
    #[arg(long)]
    breakdown: bool,

    /// Print the full quote as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn waypoints(&self) -> Waypoints {
        let mut waypoints = Waypoints::new();
        for waypoint in self.waypoints.iter().filter(|w| !w.trim().is_empty()) {
            if !waypoints.add(waypoint.as_str()) {
                eprintln!("Ignoring {:?}: at most {} waypoints are allowed.", waypoint, MAX_WAYPOINTS);
            }
        }
        waypoints
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();

    if let Err(message) = run(args).await {
        eprintln!("Error calculating the cost:\n{}", message);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let config = Config::from_env().map_err(|err| err.message)?;
    let engine = Engine::from_config(&config);

    let request = RouteRequest {
        waypoints: args.waypoints(),
        origin: args.origin,
        destination: args.destination,
        weight: args.weight,
    };

    let quote = engine
        .quote_route(request)
        .await
        .map_err(|err| err.message)?;

    if args.json {
        let output = serde_json::to_string_pretty(&quote).map_err(|err| err.to_string())?;
        println!("{}", output);
    } else {
        for line in summary_lines(&quote, args.breakdown) {
            println!("{}", line);
        }
    }

    Ok(())
}
