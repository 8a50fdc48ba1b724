//! The `design` command: size one frame and write the report files.
//!
//! Two sets of CSV reports are produced, one per design the workflow
//! returns: `Optimal*` for the lightest code-satisfying section set and
//! `Construction*` for the smoothed, buildable variant. Each set carries
//! the member sizes, story drifts, doubler plate thicknesses, the
//! column-to-beam moment ratios and the member demand-capacity ratios.

use crate::cli::DesignArgs;
use crate::error::{CliError, Result};
use smrfdesign::core::catalog::SectionCatalog;
use smrfdesign::core::checks::beam::BeamCheck;
use smrfdesign::core::checks::column::ColumnCheck;
use smrfdesign::engine::portal::PortalFrameSolver;
use smrfdesign::engine::progress::{Progress, ProgressReporter};
use smrfdesign::model::frame::Frame;
use smrfdesign::workflows::design::{DesignOutcome, DesignSnapshot};
use std::path::Path;
use tracing::info;

pub fn run(args: DesignArgs) -> Result<()> {
    let building = crate::config::BuildingFile::load(&args.config)?;
    let catalog = SectionCatalog::load(&args.sections)?;
    let steel = building.material.to_steel();
    let config = building.design;

    info!(
        stories = building.geometry.num_stories,
        bays = building.geometry.num_bays,
        "Building frame model."
    );
    let frame = Frame::new(
        building.geometry,
        building.loads,
        building.seismic,
        &building.members,
        &catalog,
        &config,
    )?;

    let solver = PortalFrameSolver::new(&catalog, steel);
    let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
        Progress::PhaseStart { name } => println!("→ {name}..."),
        Progress::Resize { story, size } => println!("    story {story}: {size}"),
        _ => {}
    }));

    println!("Starting the seismic design workflow...");
    let outcome = smrfdesign::workflows::design::run(
        &frame, &solver, &catalog, &steel, &config, &reporter,
    )?;

    std::fs::create_dir_all(&args.output_dir)?;
    write_reports(&args.output_dir, &outcome)?;

    print_summary(&outcome);
    println!("Design reports written to: {}", args.output_dir.display());
    Ok(())
}

fn print_summary(outcome: &DesignOutcome) {
    let optimal = &outcome.optimal;
    println!();
    println!(
        "✓ Optimal design: T = {:.3} s, base shear = {:.1} kips, max drift = {:.4}",
        optimal.modal_period,
        optimal.seismic_strength.base_shear_kips,
        optimal
            .story_drifts
            .iter()
            .copied()
            .fold(0.0f64, f64::max),
    );
    let construction = &outcome.construction.sizes;
    for (story, beam) in construction.beam.iter().enumerate() {
        println!(
            "  story {story}: exterior {}, interior {}, beam {beam}",
            construction.exterior_column[story], construction.interior_column[story],
        );
    }
}

fn write_reports(dir: &Path, outcome: &DesignOutcome) -> Result<()> {
    write_snapshot(dir, "Optimal", &outcome.optimal)?;
    write_snapshot(dir, "Construction", &outcome.construction)?;
    Ok(())
}

fn write_snapshot(dir: &Path, prefix: &str, snapshot: &DesignSnapshot) -> Result<()> {
    let stories = snapshot.checks.columns.len();
    let columns = snapshot.checks.columns[0].len();
    let bays = columns - 1;

    write_csv(
        dir,
        &format!("{prefix}Size.csv"),
        &["exterior column", "interior column", "beam"],
        (0..stories).map(|story| {
            vec![
                snapshot.sizes.exterior_column[story].clone(),
                snapshot.sizes.interior_column[story].clone(),
                snapshot.sizes.beam[story].clone(),
            ]
        }),
    )?;

    write_csv(
        dir,
        &format!("{prefix}Drift.csv"),
        &["story drift"],
        snapshot
            .story_drifts
            .iter()
            .map(|drift| vec![drift.to_string()]),
    )?;

    let connection_header: Vec<String> =
        (0..columns).map(|j| format!("connection {j}")).collect();
    write_csv(
        dir,
        &format!("{prefix}DoublerPlate.csv"),
        &connection_header,
        snapshot.checks.connections.iter().map(|row| {
            row.iter()
                .map(|c| c.doubler_plate_thickness.to_string())
                .collect()
        }),
    )?;

    let joint_header: Vec<String> = (0..columns).map(|j| format!("joint {j}")).collect();
    write_csv(
        dir,
        &format!("{prefix}ColumnBeamRatio.csv"),
        &joint_header,
        snapshot.checks.connections.iter().map(|row| {
            row.iter()
                .map(|c| match c.scwb_ratio {
                    Some(ratio) => ratio.to_string(),
                    None => "NA".to_string(),
                })
                .collect()
        }),
    )?;

    let column_header: Vec<String> = (0..columns).map(|j| format!("column {j}")).collect();
    let column_ratios: [(&str, fn(&ColumnCheck) -> f64); 3] = [
        ("Axial", |check| check.ratios.axial),
        ("Shear", |check| check.ratios.shear),
        ("Flexural", |check| check.ratios.flexural),
    ];
    for (label, ratio) in column_ratios {
        write_csv(
            dir,
            &format!("{prefix}Column{label}DCRatio.csv"),
            &column_header,
            snapshot
                .checks
                .columns
                .iter()
                .map(|row| row.iter().map(|c| ratio(c).to_string()).collect()),
        )?;
    }

    let beam_header: Vec<String> = (0..bays).map(|j| format!("beam {j}")).collect();
    let beam_ratios: [(&str, fn(&BeamCheck) -> f64); 2] = [
        ("Shear", |check| check.ratios.shear),
        ("Flexural", |check| check.ratios.flexural),
    ];
    for (label, ratio) in beam_ratios {
        write_csv(
            dir,
            &format!("{prefix}Beam{label}DCRatio.csv"),
            &beam_header,
            snapshot
                .checks
                .beams
                .iter()
                .map(|row| row.iter().map(|b| ratio(b).to_string()).collect()),
        )?;
    }

    Ok(())
}

fn write_csv<H, R>(
    dir: &Path,
    file_name: &str,
    header: &[H],
    rows: R,
) -> Result<()>
where
    H: AsRef<str>,
    R: Iterator<Item = Vec<String>>,
{
    let path = dir.join(file_name);
    let report = |source| CliError::Report {
        path: path.clone(),
        source,
    };
    let mut writer = csv::Writer::from_path(&path).map_err(&report)?;
    writer
        .write_record(header.iter().map(|h| h.as_ref()))
        .map_err(&report)?;
    for row in rows {
        writer.write_record(&row).map_err(&report)?;
    }
    writer.flush()?;
    Ok(())
}
