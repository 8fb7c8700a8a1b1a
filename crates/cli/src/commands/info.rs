//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::SensorInfo;
use ingestion::PacketFormat;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Sensor info for JSON output
#[derive(Serialize)]
struct MetadataInfo {
    prod_line: String,
    prod_sn: String,
    build_rev: String,
    lidar_mode: String,
    udp_profile_lidar: String,
    columns: usize,
    rows: usize,
    window: [usize; 2],
    window_columns: usize,
    packet: PacketInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    beams: Vec<BeamInfo>,
}

#[derive(Serialize)]
struct PacketInfo {
    columns_per_packet: usize,
    lidar_packet_bytes: usize,
    packets_per_frame: usize,
}

#[derive(Serialize)]
struct BeamInfo {
    row: usize,
    altitude_deg: f64,
    azimuth_deg: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(metadata = %args.metadata.display(), "Loading sensor metadata");

    if !args.metadata.exists() {
        return Err(CliError::metadata_not_found(args.metadata.display().to_string()).into());
    }

    let sensor = config_loader::MetadataLoader::load_from_path(&args.metadata)
        .with_context(|| format!("Failed to load metadata from {}", args.metadata.display()))?;

    let info = build_metadata_info(&sensor, args.beams);
    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize sensor info")?;
        println!("{}", json);
    } else {
        print_metadata_info(&info);
    }

    Ok(())
}

fn build_metadata_info(sensor: &SensorInfo, with_beams: bool) -> MetadataInfo {
    let format = PacketFormat::from_info(sensor);
    let window = sensor.column_window();
    let intrinsics = &sensor.beam_intrinsics;

    let beams = if with_beams {
        intrinsics
            .beam_altitude_angles
            .iter()
            .zip(&intrinsics.beam_azimuth_angles)
            .enumerate()
            .map(|(row, (alt, az))| BeamInfo {
                row,
                altitude_deg: *alt,
                azimuth_deg: *az,
            })
            .collect()
    } else {
        Vec::new()
    };

    MetadataInfo {
        prod_line: sensor.prod_line.clone(),
        prod_sn: sensor.prod_sn.clone(),
        build_rev: sensor.build_rev.clone(),
        lidar_mode: sensor.lidar_mode.clone(),
        udp_profile_lidar: sensor.data_format.udp_profile_lidar.to_string(),
        columns: sensor.width(),
        rows: sensor.height(),
        window: window.into(),
        window_columns: window.len(sensor.width()),
        packet: PacketInfo {
            columns_per_packet: format.columns_per_packet,
            lidar_packet_bytes: format.lidar_packet_size(),
            packets_per_frame: format.packets_per_frame(),
        },
        beams,
    }
}

fn print_metadata_info(info: &MetadataInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Lidar Sensor Metadata                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Sensor");
    println!("   ├─ Product: {}", info.prod_line);
    println!("   ├─ Serial: {}", info.prod_sn);
    println!("   ├─ Firmware: {}", info.build_rev);
    println!("   ├─ Mode: {}", info.lidar_mode);
    println!("   └─ Profile: {}", info.udp_profile_lidar);

    println!("\nFrame");
    println!("   ├─ Size: {} x {}", info.columns, info.rows);
    println!(
        "   └─ Window: [{}, {}] ({} columns)",
        info.window[0], info.window[1], info.window_columns
    );

    println!("\nPackets");
    println!("   ├─ Columns per packet: {}", info.packet.columns_per_packet);
    println!("   ├─ Lidar packet size: {} bytes", info.packet.lidar_packet_bytes);
    println!("   └─ Packets per frame: {}", info.packet.packets_per_frame);

    if !info.beams.is_empty() {
        println!("\nBeams ({})", info.beams.len());
        for (i, beam) in info.beams.iter().enumerate() {
            let prefix = if i == info.beams.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!(
                "   {} {:>3}: altitude {:>8.3}°  azimuth {:>7.3}°",
                prefix, beam.row, beam.altitude_deg, beam.azimuth_deg
            );
        }
    }

    println!();
}
