use clap::Parser;
use rokto::region::{AddressHints, RegionResolver, RegionStore, Resolution};
use rokto::server;
use std::path::PathBuf;
use std::sync::Arc;

/// Rokto v0.4 — blood-donation network core
///
/// Maps coordinates and free-text address hints onto Bangladesh's
/// division/district/upazila hierarchy, and serves the resolver plus
/// realtime notifications over HTTP.
///
/// Examples:
///   rokto --lat 23.8103 --lon 90.4125
///   rokto --lat 22.36 --lon 91.78 --district Chattogram
///   rokto --lat 23.86 --lon 90.27 --upazila Savar
///   rokto --stats
///   rokto --serve --port 8080
#[derive(Parser)]
#[command(name = "rokto", version, about, long_about = None)]
struct Cli {
    /// Latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Division name hint (free text, e.g. "Dhaka").
    #[arg(long)]
    division: Option<String>,

    /// District name hint (free text, e.g. "Cumilla").
    #[arg(long)]
    district: Option<String>,

    /// Upazila name hint (free text, e.g. "Savar").
    #[arg(long)]
    upazila: Option<String>,

    /// Region seed file (JSON). Defaults to ~/.rokto/regions.json,
    /// then the built-in dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Print dataset statistics and exit.
    #[arg(long)]
    stats: bool,

    /// Start the HTTP server.
    #[arg(long)]
    serve: bool,

    /// Server bind host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server bind port.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() {
    let cli = Cli::parse();

    // ── Load the region dataset ─────────────────────────────────

    let store = match &cli.data {
        Some(path) => Arc::new(RegionStore::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })),
        None => Arc::new(RegionStore::load_default()),
    };

    // ── Stats mode ──────────────────────────────────────────────

    if cli.stats {
        let stats = store.stats();
        eprintln!(
            "  {} divisions, {} districts, {} upazilas ({} with coordinates)",
            stats.divisions, stats.districts, stats.upazilas, stats.with_coords
        );
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
        return;
    }

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|e| {
                eprintln!("Error: Cannot start runtime: {}", e);
                std::process::exit(1);
            });
        runtime.block_on(server::start(&cli.host, cli.port, store));
        return;
    }

    // ── One-shot resolve mode ───────────────────────────────────

    let (lat, lon) = match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            eprintln!("Error: No coordinates specified.");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  rokto --lat 23.8103 --lon 90.4125");
            eprintln!("  rokto --lat 22.36 --lon 91.78 --district Chattogram");
            eprintln!("  rokto --stats");
            eprintln!("  rokto --serve --port 8080");
            std::process::exit(1);
        }
    };

    let hints = AddressHints {
        state: cli.division,
        district: cli.district,
        upazila: cli.upazila,
    };

    let resolver = RegionResolver::new(Arc::clone(&store));
    let resolution = resolver.resolve(lat, lon, &hints).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    // ── Print region banner ─────────────────────────────────────

    eprintln!("  \u{1F4CD} {}", describe_chain(&store, &resolution));

    // JSON to stdout
    println!("{}", serde_json::to_string_pretty(&resolution).unwrap());
}

fn describe_chain(store: &RegionStore, resolution: &Resolution) -> String {
    let division = resolution
        .division_id
        .and_then(|id| store.division(id))
        .map(|d| d.name.as_str());
    let district = resolution
        .district_id
        .and_then(|id| store.district(id))
        .map(|d| d.name.as_str());
    let upazila = resolution
        .upazila_id
        .and_then(|id| store.upazila(id))
        .map(|u| u.name.as_str());
    format!(
        "{} \u{203A} {} \u{203A} {}",
        division.unwrap_or("-"),
        district.unwrap_or("-"),
        upazila.unwrap_or("-")
    )
}
