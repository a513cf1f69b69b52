#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::missing_docs_in_private_items)]

use std::{collections::HashSet, error::Error};

use env_logger::Builder;
use log::{LevelFilter, info, warn};
use plotters::prelude::*;
use probemap::ProbeMap;
use rand::{Rng, seq::SliceRandom};

const TABLE_SIZE: usize = 100_000;
// Load factors from 0.1 to 0.95 in 10 steps
const NUM_LOAD_FACTORS: usize = 10;
// Share of the keys removed and replaced by fresh keys in the churn scenario
const CHURN_SHARE: f64 = 0.25;

const SCENARIOS: [&str; 2] = ["Fresh inserts", "After remove/insert churn"];
const COLORS: [RGBColor; 2] = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

const FONT_FAMILY: &str = "sans-serif";
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const TEXT_SIZE: i32 = 16;
const TITLE_SIZE: i32 = 35;

#[derive(Debug, Clone, Copy)]
struct ProbeStats {
    average: f64,
    worst: usize,
}

fn initialize_logger() {
    let mut builder = Builder::new();

    builder
        .filter_level(LevelFilter::Info)
        .filter_module("probemap", LevelFilter::Info)
        .format_timestamp_millis()
        .parse_default_env();

    if let Err(err) = builder.try_init() {
        eprintln!("logger already initialized: {err}");
    }
}

// Distinct random keys, so every insert into a fresh map succeeds
fn unique_keys(count: usize) -> Vec<u64> {
    let mut rng = rand::rng();
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let key: u64 = rng.random();
        if seen.insert(key) {
            keys.push(key);
        }
    }

    keys
}

fn fill(keys: &[u64]) -> Result<ProbeMap, Box<dyn Error>> {
    let mut map = ProbeMap::with_capacity(TABLE_SIZE)?;
    for &key in keys {
        map.insert(key, "value")?;
    }
    Ok(map)
}

// Removes a random share of the keys and inserts as many spare keys, leaving tombstones
fn churn(map: &mut ProbeMap, keys: &mut Vec<u64>, spare: &[u64]) -> Result<(), Box<dyn Error>> {
    let mut rng = rand::rng();
    keys.shuffle(&mut rng);

    let removed = (keys.len() as f64 * CHURN_SHARE) as usize;
    for key in keys.drain(..removed) {
        if map.remove(key).is_none() {
            warn!("key {key} vanished before removal");
        }
    }

    for &key in spare.iter().take(removed) {
        map.insert(key, "value")?;
        keys.push(key);
    }

    Ok(())
}

fn measure(map: &ProbeMap, keys: &[u64]) -> ProbeStats {
    let mut total = 0_usize;
    let mut worst = 0_usize;
    let mut found = 0_usize;

    for &key in keys {
        if let Some(probes) = map.probe_length(key) {
            total += probes;
            worst = worst.max(probes);
            found += 1;
        }
    }

    let average = if found == 0 { 0.0 } else { total as f64 / found as f64 };
    ProbeStats { average, worst }
}

fn plot(
    path: &str,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    // Add 10% margin
    let max_y = series.iter().flatten().fold(1.0_f64, |max, &y| max.max(y)) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (idx, (&scenario, values)) in SCENARIOS.iter().zip(series).enumerate() {
        let color = COLORS[idx % COLORS.len()];
        let line_style = ShapeStyle::from(&color).stroke_width(LINE_WIDTH);
        let points: Vec<(f64, f64)> =
            load_factors.iter().copied().zip(values.iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(scenario)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.into_iter().map(|point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();

    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();

    // Twice the table size, the upper half feeds the churn scenario
    let pool = unique_keys(TABLE_SIZE * 2);

    let mut average_probes: Vec<Vec<f64>> = vec![Vec::new(); SCENARIOS.len()];
    let mut worst_probes: Vec<Vec<f64>> = vec![Vec::new(); SCENARIOS.len()];

    for &load in &load_factors {
        let n_keys = (TABLE_SIZE as f64 * load) as usize;
        let (initial, spare) = pool.split_at(n_keys);

        let mut keys = initial.to_vec();
        let mut map = fill(&keys)?;
        let fresh = measure(&map, &keys);

        churn(&mut map, &mut keys, spare)?;
        let churned = measure(&map, &keys);

        info!(
            "load {:.2} ({} keys): fresh avg {:.2} worst {}, churned avg {:.2} worst {} ({} tombstones)",
            map.load_factor(),
            map.len(),
            fresh.average,
            fresh.worst,
            churned.average,
            churned.worst,
            map.tombstones()
        );

        for (idx, stats) in [fresh, churned].into_iter().enumerate() {
            average_probes[idx].push(stats.average);
            worst_probes[idx].push(stats.worst as f64);
        }
    }

    plot(
        "average_probe_length.png",
        "ProbeMap Average Probe Length",
        "Average Probe Length (slots)",
        &load_factors,
        &average_probes,
    )?;
    plot(
        "worst_probe_length.png",
        "ProbeMap Worst-Case Probe Length",
        "Worst-Case Probe Length (slots)",
        &load_factors,
        &worst_probes,
    )?;

    info!("Generated plot images: average_probe_length.png, worst_probe_length.png");

    Ok(())
}
