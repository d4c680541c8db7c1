//! Operator CLI for the DriveLedger diagnostics API.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;

use driveledger_api::domain::SENSOR_CHANNELS;
use driveledger_api::infra::{
    FaultStore, GatewayConfig, IpfsGatewayClient, RecordFilter, SupabaseConfig, SupabaseStore,
};
use driveledger_api::FaultRecord;

fn print_help() {
    eprintln!(
        "\
driveledger-admin

USAGE:
  driveledger-admin <command> [options]

COMMANDS:
  export-records      Export fault records to JSON/NDJSON/CSV
  check-store         Verify the hosted store answers queries
  resolve-metadata    Run the gateway fallback for one identifier

COMMON OPTIONS:
  Store credentials come from SUPABASE_URL / SUPABASE_KEY.

export-records OPTIONS:
  --output <path>                 (optional) Output file, stdout by default
  --format <json|ndjson|csv>      (optional) Defaults to json
  --vehicle-id <id>               (optional) Restrict to one vehicle
  --limit <n>                     (optional) Row limit

resolve-metadata OPTIONS:
  --id <cid-or-url>               (required) CID, ipfs:// URI, or gateway URL
"
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: VecDeque<String> = std::env::args().skip(1).collect();

    let Some(command) = args.pop_front() else {
        print_help();
        std::process::exit(2);
    };

    match command.as_str() {
        "export-records" => export_records(args).await,
        "check-store" => check_store().await,
        "resolve-metadata" => resolve_metadata(args).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
            std::process::exit(2);
        }
    }
}

fn store_from_env() -> Result<SupabaseStore, Box<dyn std::error::Error>> {
    Ok(SupabaseStore::new(SupabaseConfig::from_env()?)?)
}

/// Pull the flag's value out of the argument queue.
fn take_option(args: &mut VecDeque<String>, flag: &str) -> Option<String> {
    let index = args.iter().position(|a| a == flag)?;
    args.remove(index);
    args.remove(index)
}

async fn export_records(mut args: VecDeque<String>) -> Result<(), Box<dyn std::error::Error>> {
    let output = take_option(&mut args, "--output");
    let format = take_option(&mut args, "--format").unwrap_or_else(|| "json".to_string());
    let vehicle_id = take_option(&mut args, "--vehicle-id");
    let limit = match take_option(&mut args, "--limit") {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| format!("invalid --limit: {raw}"))?),
        None => None,
    };

    let store = store_from_env()?;
    let filter = RecordFilter {
        vehicle_id,
        limit,
        ..RecordFilter::default()
    };
    let records = store.list_records(&filter).await?;
    eprintln!("Fetched {} records", records.len());

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    match format.as_str() {
        "json" => {
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writer.write_all(b"\n")?;
        }
        "ndjson" => {
            for record in &records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
        }
        "csv" => write_csv(writer, &records)?,
        other => {
            return Err(format!("unknown format: {other}").into());
        }
    }

    if let Some(path) = output {
        eprintln!("Wrote {path}");
    }
    Ok(())
}

/// Flatten records to CSV: fixed columns, then one column per sensor channel.
fn write_csv(writer: Box<dyn Write>, records: &[FaultRecord]) -> Result<(), Box<dyn std::error::Error>> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["unique_id", "timestamp", "fault", "confidence"];
    header.extend(SENSOR_CHANNELS);
    csv_writer.write_record(&header)?;

    for record in records {
        let mut row = vec![
            record.unique_id.clone(),
            record.timestamp.clone(),
            record.fault_label().unwrap_or_default().to_string(),
            record.confidence.map(|c| c.to_string()).unwrap_or_default(),
        ];
        for channel in SENSOR_CHANNELS {
            row.push(
                record
                    .sensor_value(channel)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

async fn check_store() -> Result<(), Box<dyn std::error::Error>> {
    let store = store_from_env()?;
    store.ping().await?;
    println!("Store OK");
    Ok(())
}

async fn resolve_metadata(mut args: VecDeque<String>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = take_option(&mut args, "--id") else {
        eprintln!("resolve-metadata requires --id");
        std::process::exit(2);
    };

    let client = IpfsGatewayClient::new(GatewayConfig::from_env())?;
    match client.fetch_metadata(&id).await {
        Some(document) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        None => {
            eprintln!("Metadata unreachable on all {} gateways", client.gateways().len());
            std::process::exit(1);
        }
    }
}
