//! Basic example: tally JSON actions, print averages, then round-trip a snapshot.
//!
//! Run with `RUST_LOG=debug` to see snapshot and clear events.

use action_tally::infrastructure::json;
use action_tally::ActionStats;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let stats = ActionStats::new("demo");

    let events = [
        r#"{"action":"jump", "time": 100}"#,
        r#"{"action":"run", "time": 75}"#,
        r#"{"action":" Jump ", "time": 200}"#,
        r#"{"action":"jump", "time": -5}"#,
        r#"{"action":120, "time": "oops"}"#,
    ];

    println!("=== Ingesting {} events ===\n", events.len());
    for event in events {
        match json::add_action_json(&stats, event) {
            Ok(()) => println!("accepted {}", event),
            Err(err) => println!("rejected {}: {}", event, err),
        }
    }

    println!("\nStats: {}", json::stats_json(&stats));

    let snapshot = json::snapshot_json(&stats);
    println!("Snapshot: {}", snapshot);

    let replica = ActionStats::new("replica");
    json::load_snapshot_json(&replica, &snapshot).expect("snapshot we just produced");
    println!("Replica stats: {}", json::stats_json(&replica));

    let metrics = stats.metrics().snapshot();
    println!(
        "\nAccepted: {}, rejected: {} ({:.0}%)",
        metrics.actions_accepted,
        metrics.actions_rejected(),
        metrics.rejection_rate() * 100.0
    );

    stats.clear();
}
