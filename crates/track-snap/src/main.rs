use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use track_snap::types::{TrackCategory, TrackPiece};
use track_snap::{
    check_collision, find_collisions, find_snap_candidate, find_snap_candidates, Catalog,
    PlacementRecord, Point, SnapError, SnapReport, SnapSettings,
};

#[derive(Parser)]
#[command(name = "track-snap", about = "Query track piece snapping against a layout")]
struct Cli {
    /// Catalog directory containing track-catalog.json
    #[arg(short, long, default_value = "data", global = true)]
    catalog: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List catalog pieces
    List {
        /// Only pieces in this category (straight, curved, switch, ...)
        #[arg(long, value_parser = parse_category)]
        category: Option<TrackCategory>,
    },
    /// Find the snap for a piece previewed at a position
    Snap {
        /// Catalog id of the piece being placed
        #[arg(short, long)]
        piece: String,

        /// Preview position as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,

        /// Preview rotation in degrees
        #[arg(short, long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotation: f64,

        /// JSON file with the placed pieces
        #[arg(long)]
        placed: Option<PathBuf>,

        /// Maximum connector distance for a snap
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Disable snapping entirely
        #[arg(long)]
        no_snap: bool,

        /// Honor per-connector compatibility lists
        #[arg(long)]
        strict: bool,

        /// Print every candidate, closest first
        #[arg(long)]
        all: bool,
    },
    /// Check a preview position for overlap with placed pieces
    Collide {
        #[arg(short, long)]
        piece: String,

        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,

        #[arg(long)]
        placed: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct PieceSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: TrackCategory,
    connectors: usize,
}

impl<'a> From<&'a TrackPiece> for PieceSummary<'a> {
    fn from(p: &'a TrackPiece) -> Self {
        Self {
            id: &p.id,
            name: &p.name,
            category: p.category,
            connectors: p.connections.len(),
        }
    }
}

#[derive(Serialize)]
struct CollisionReport<'a> {
    collides: bool,
    with: Vec<&'a str>,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got: {s}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("Bad X {x:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("Bad Y {y:?}: {e}"))?;
    Ok(Point::new(x, y))
}

fn parse_category(s: &str) -> Result<TrackCategory, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase())).map_err(|_| {
        format!(
            "Unknown category: {s}. \
             Use: straight, curved, switch, special, elevation, accessory"
        )
    })
}

fn read_placements(path: Option<&Path>) -> Result<Vec<PlacementRecord>, SnapError> {
    match path {
        Some(p) => Ok(serde_json::from_slice(&std::fs::read(p)?)?),
        None => Ok(Vec::new()),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, SnapError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn run(cli: Cli) -> Result<String, SnapError> {
    let catalog = Catalog::load(&cli.catalog)?;

    match cli.command {
        Command::List { category } => {
            let pieces: Vec<PieceSummary> = match category {
                Some(c) => catalog.by_category(c).into_iter().map(Into::into).collect(),
                None => catalog.pieces().map(Into::into).collect(),
            };
            to_json(&pieces, cli.pretty)
        }
        Command::Snap {
            piece,
            at,
            rotation,
            placed,
            threshold,
            no_snap,
            strict,
            all,
        } => {
            let new_piece = catalog.require(&piece)?;
            let placed = catalog.resolve(&read_placements(placed.as_deref())?)?;
            let defaults = SnapSettings::default();
            let settings = SnapSettings {
                enabled: !no_snap,
                threshold: threshold.unwrap_or(defaults.threshold),
                strict_compatibility: strict,
                ..defaults
            };

            if all {
                let reports: Vec<SnapReport> =
                    find_snap_candidates(&new_piece, at, rotation, &placed, &settings)
                        .iter()
                        .map(|c| c.report())
                        .collect();
                to_json(&reports, cli.pretty)
            } else {
                let report = find_snap_candidate(&new_piece, at, rotation, &placed, &settings)
                    .map(|c| c.report());
                to_json(&report, cli.pretty)
            }
        }
        Command::Collide { piece, at, placed } => {
            let new_piece = catalog.require(&piece)?;
            let placed = catalog.resolve(&read_placements(placed.as_deref())?)?;
            let report = CollisionReport {
                collides: check_collision(&new_piece, at, &placed),
                with: find_collisions(&new_piece, at, &placed),
            };
            to_json(&report, cli.pretty)
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,-2.5").unwrap(), Point::new(10.0, -2.5));
        assert_eq!(parse_point(" 1 , 2 ").unwrap(), Point::new(1.0, 2.0));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("Curved").unwrap(), TrackCategory::Curved);
        assert!(parse_category("loop").is_err());
    }

    #[test]
    fn test_cli_shape() {
        let cli = Cli::try_parse_from([
            "track-snap", "--catalog", "cat", "snap", "--piece", "s", "--at", "-5,3", "-r", "90",
        ])
        .unwrap();
        match cli.command {
            Command::Snap { piece, at, rotation, .. } => {
                assert_eq!(piece, "s");
                assert_eq!(at, Point::new(-5.0, 3.0));
                assert_eq!(rotation, 90.0);
            }
            _ => panic!("expected snap"),
        }
    }

    #[test]
    fn test_catalog_after_subcommand() {
        let cli = Cli::try_parse_from(["track-snap", "list", "--catalog", "x"]).unwrap();
        assert_eq!(cli.catalog, PathBuf::from("x"));
        assert!(matches!(cli.command, Command::List { category: None }));

        let cli = Cli::try_parse_from([
            "track-snap", "snap", "--piece", "s", "--at", "0,0", "-c", "y", "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.catalog, PathBuf::from("y"));
        assert!(cli.pretty);

        let cli = Cli::try_parse_from(["track-snap", "collide", "-p", "s", "--at", "1,2"]).unwrap();
        assert_eq!(cli.catalog, PathBuf::from("data"));
    }
}
