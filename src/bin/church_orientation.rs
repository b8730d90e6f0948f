//! CLI tool for running the orientation pipeline on a saved Overpass or GeoJSON file
//!
//! Usage:
//!   cargo run --release --bin church_orientation -- <input.json|input.geojson> [options]
//!
//! Options:
//!   --mode <altar|entrance|pca>  Signal used as the orientation (default: altar)
//!   --bins <degrees>             Rose histogram bin width (default: 10)
//!   --csv <path>                 Write the CSV summary
//!   --geojson <path>             Write the GeoJSON export
//!   --config <path>              Load settings from a JSON config file
//!   --query <s,w,n,e>            Print the Overpass query for a bounding box and exit
//!   --summary                    Show summary stats only

use std::env;

use anyhow::{bail, Context, Result};
use church_orientation::query::BoundingBox;
use church_orientation::server::util::init_logging;
use church_orientation::{
    export_csv_file, export_geojson_file, histogram_for_rows, orient_geojson_file, orient_overpass_file,
    overpass_query, HistogramField, OrientationConfig, SelectionMode,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <input.json|input.geojson> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --mode <altar|entrance|pca>  Signal used as the orientation (default: altar)");
    eprintln!("  --bins <degrees>             Rose histogram bin width (default: 10)");
    eprintln!("  --csv <path>                 Write the CSV summary");
    eprintln!("  --geojson <path>             Write the GeoJSON export");
    eprintln!("  --config <path>              Load settings from a JSON config file");
    eprintln!("  --query <s,w,n,e>            Print the Overpass query for a bounding box and exit");
    eprintln!("  --summary                    Show summary stats only");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} milan.json --summary", program);
    eprintln!("  {} milan.json --mode entrance --csv milan.csv", program);
    eprintln!("  {} churches.geojson --bins 15", program);
    eprintln!("  {} --query 45.40,9.10,45.52,9.28", program);
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} needs a value", flag),
    }
}

fn parse_bbox(text: &str) -> Result<BoundingBox> {
    let parts: Vec<f64> = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid bounding box '{}'", text))?;
    match parts.as_slice() {
        [south, west, north, east] => Ok(BoundingBox { south: *south, west: *west, north: *north, east: *east }),
        _ => bail!("bounding box needs 4 values: south,west,north,east"),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return Ok(());
    }

    let mut input: Option<String> = None;
    let mut mode: Option<SelectionMode> = None;
    let mut bins: Option<f64> = None;
    let mut csv_path: Option<String> = None;
    let mut geojson_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut summary_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                mode = Some(option_value(&args, i, "--mode")?.parse()?);
            }
            "--bins" => {
                i += 1;
                let value = option_value(&args, i, "--bins")?;
                bins = Some(value.parse().with_context(|| format!("invalid bin width '{}'", value))?);
            }
            "--csv" => {
                i += 1;
                csv_path = Some(option_value(&args, i, "--csv")?.to_string());
            }
            "--geojson" => {
                i += 1;
                geojson_path = Some(option_value(&args, i, "--geojson")?.to_string());
            }
            "--config" => {
                i += 1;
                config_path = Some(option_value(&args, i, "--config")?.to_string());
            }
            "--query" => {
                i += 1;
                let bbox = parse_bbox(option_value(&args, i, "--query")?)?;
                print!("{}", overpass_query(&bbox)?);
                return Ok(());
            }
            "--summary" => summary_only = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                return Ok(());
            }
            other if other.starts_with("--") => bail!("unknown option {}", other),
            other => input = Some(other.to_string()),
        }
        i += 1;
    }

    let Some(input) = input else {
        print_usage(&args[0]);
        bail!("no input file given");
    };

    let mut config = match &config_path {
        Some(path) => OrientationConfig::load_from_file(path)?,
        None => OrientationConfig::default(),
    };
    if let Some(mode) = mode {
        config.selection_mode = mode;
    }
    if let Some(bins) = bins {
        config.bin_width_deg = bins;
    }
    config.validate()?;

    let is_geojson = input.to_ascii_lowercase().ends_with(".geojson");
    let pass = if is_geojson {
        orient_geojson_file(&input, config.selection_mode)?
    } else {
        orient_overpass_file(&input, config.selection_mode)?
    };

    println!("=== {} ===", input);
    println!("{}", pass.summary());
    println!(
        "Ways: {}, relations: {}, entrances: {}, unresolved node refs: {}",
        pass.stats.ways, pass.stats.relations, pass.stats.entrances, pass.stats.unresolved_node_refs
    );
    println!(
        "Skipped: {} unclosed, {} without outer ring, {} unsupported, {} malformed",
        pass.stats.skipped_unclosed,
        pass.stats.skipped_no_outer,
        pass.stats.skipped_unsupported,
        pass.stats.malformed_elements
    );

    if !summary_only {
        println!();
        println!(
            "{:<32} {:>10} {:>10} {:>7} {:>7} {:>7} {:>7} {:>6}  source",
            "name", "lat", "lon", "pca", "entr", "altar", "orient", "dev"
        );
        for row in &pass.rows {
            let angle = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v));
            println!(
                "{:<32} {:>10.6} {:>10.6} {:>7.1} {:>7} {:>7} {:>7.1} {:>6.1}  {:?}",
                row.name, row.center_lat, row.center_lon, row.pca_deg,
                angle(row.entrance_deg), angle(row.altar_deg),
                row.orientation_deg, row.deviation_deg, row.source
            );
        }
    }

    let histogram = histogram_for_rows(&pass.rows, HistogramField::Orientation, config.bin_width_deg)?;
    println!();
    println!("Orientation histogram ({}° bins, {} rows):", histogram.bin_width_deg, histogram.total);
    for bin in histogram.bins.iter().filter(|b| b.count > 0) {
        let bar_len = if histogram.max_count > 0 { bin.count * 40 / histogram.max_count } else { 0 };
        println!("  {:>5.1}-{:<5.1} {:>4} {}", bin.start_deg, bin.end_deg, bin.count, "#".repeat(bar_len.max(1)));
    }

    if let Some(path) = csv_path {
        export_csv_file(&pass.rows, &path)?;
        println!("CSV written to {}", path);
    }
    if let Some(path) = geojson_path {
        export_geojson_file(&pass.rows, &path)?;
        println!("GeoJSON written to {}", path);
    }

    Ok(())
}
