//! fahrlog integrity engine — Demo CLI
//!
//! Builds a small two-vehicle ledger (one audit-protected, one not), runs
//! chain maintenance over it, and walks through the backup seal/verify
//! protocol including every rejection path.
//!
//! Usage:
//!   cargo run -p demo -- seal
//!   cargo run -p demo -- verify
//!   cargo run -p demo -- tamper

use chrono::{Duration, TimeZone, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fahrlog_chain::{ChainMaintenance, InMemoryTripStore};
use fahrlog_contracts::{
    audit::AuditLogEntry, error::FahrlogResult, snapshot::BackupSnapshot, trip::Trip,
    vehicle::Vehicle,
};
use fahrlog_verify::ImportVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// fahrlog — tamper-evident mileage ledger demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "fahrlog integrity engine demo",
    long_about = "Builds a sample trip ledger, maintains per-vehicle hash chains,\n\
                  and demonstrates the backup seal/verify protocol."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the sample ledger, seal a backup snapshot, and print it.
    Seal,
    /// Seal a snapshot and verify it untouched (the accept path).
    Verify,
    /// Seal a snapshot, then tamper with it three ways and show each rejection.
    Tamper,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for per-step output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Seal => run_seal(),
        Command::Verify => run_verify(),
        Command::Tamper => run_tamper(),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Sample data ───────────────────────────────────────────────────────────────

/// Build a sealed snapshot: two vehicles, five trips, one audit entry.
///
/// Vehicle 1 is audit-protected and gets a maintained chain; vehicle 2 is
/// not and its trips stay unhashed — exactly the mixed state a real backup
/// contains.
fn sample_snapshot() -> FahrlogResult<BackupSnapshot> {
    let store = InMemoryTripStore::new();

    store.insert_vehicle(Vehicle {
        id: 1,
        make: "Volkswagen".to_string(),
        model: "Passat".to_string(),
        license_plate: "B-FL 100".to_string(),
        fuel_type: "Diesel".to_string(),
        audit_protected: true,
    });
    store.insert_vehicle(Vehicle {
        id: 2,
        make: "Fiat".to_string(),
        model: "Panda".to_string(),
        license_plate: "B-FL 200".to_string(),
        fuel_type: "Petrol".to_string(),
        audit_protected: false,
    });

    let day_one = Utc.with_ymd_and_hms(2024, 9, 2, 7, 30, 0).unwrap();
    let routes = [
        (1, 1, "Berlin", "Leipzig", 190.5, "customer visit"),
        (2, 1, "Leipzig", "Dresden", 115.0, "customer visit"),
        (3, 1, "Dresden", "Berlin", 193.4, "return"),
        (4, 2, "Berlin", "Potsdam", 36.2, "errand"),
        (5, 2, "Potsdam", "Berlin", 36.2, "errand"),
    ];

    for (id, vehicle_id, from, to, km, purpose) in routes {
        let start = day_one + Duration::days(id);
        store.insert_trip(
            Trip::builder(id, start, from, to, km, purpose)
                .vehicle(vehicle_id)
                .end_time(start + Duration::hours(2))
                .build(),
        );
    }

    let maintenance = ChainMaintenance::new(&store);
    for id in 1..=5 {
        maintenance.update_chain_hash(id)?;
    }

    let mut snapshot = BackupSnapshot {
        vehicles: store.all_vehicles(),
        trips: store.all_trips(),
        audit_log: vec![AuditLogEntry {
            id: 1,
            trip_id: 2,
            field_name: "distance_km".to_string(),
            old_value: Some("114".to_string()),
            new_value: Some("115".to_string()),
            changed_at: day_one + Duration::days(3),
        }],
        vehicle_integrity: Default::default(),
    };

    ImportVerifier::new().seal_snapshot(&mut snapshot);
    Ok(snapshot)
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_seal() -> FahrlogResult<()> {
    let snapshot = sample_snapshot()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot serializes to JSON")
    );
    Ok(())
}

fn run_verify() -> FahrlogResult<()> {
    let snapshot = sample_snapshot()?;
    ImportVerifier::new().verify_snapshot(&snapshot)?;
    println!("Snapshot accepted: chains and aggregate digests all verify.");
    Ok(())
}

fn run_tamper() -> FahrlogResult<()> {
    let verifier = ImportVerifier::new();

    // 1. Strip a chain hash from a protected trip.
    let mut snapshot = sample_snapshot()?;
    snapshot.trips[1] = snapshot.trips[1].clone().without_chain_hash();
    show_rejection("missing chain hash", verifier.verify_snapshot(&snapshot));

    // 2. Edit a mid-chain distance after hashing.
    let mut snapshot = sample_snapshot()?;
    snapshot.trips[1].distance_km += 25.0;
    show_rejection("broken chain", verifier.verify_snapshot(&snapshot));

    // 3. Inject an audit entry; the chain stays intact, only the
    //    aggregate digest notices.
    let mut snapshot = sample_snapshot()?;
    snapshot.audit_log.push(AuditLogEntry {
        id: 2,
        trip_id: 1,
        field_name: "purpose".to_string(),
        old_value: Some("customer visit".to_string()),
        new_value: Some("private".to_string()),
        changed_at: Utc.with_ymd_and_hms(2024, 9, 20, 12, 0, 0).unwrap(),
    });
    show_rejection("aggregate digest mismatch", verifier.verify_snapshot(&snapshot));

    Ok(())
}

fn show_rejection(label: &str, result: FahrlogResult<()>) {
    match result {
        Ok(()) => println!("[{}] unexpectedly accepted!", label),
        Err(e) => println!("[{}] rejected: {}", label, e),
    }
}
