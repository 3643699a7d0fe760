#[macro_use]
extern crate log;

mod options;

use clap::Parser;
use pbrt_core::geometry::*;
use pbrt_core::ltc::*;
use pbrt_core::sh::*;
use indicatif::{ProgressBar, ProgressStyle};
use integrators::convergence::{self, DEFAULT_SAMPLE_COUNTS};
use integrators::*;
use lights::*;
use options::*;
use std::sync::Arc;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    let config = options.config()?;
    let scene = demo_scene()?;
    let shading = ShadingPoint::new(Point3f::ORIGIN, Vector3f::new(0.0, 0.0, 1.0), &scene.camera_position());

    if options.converge {
        return converge(&scene, &shading, options);
    }

    let ltc = match (options.ltc_matrix.as_ref(), options.ltc_amplitude.as_ref()) {
        (Some(matrix), Some(amplitude)) => LtcTable::from_files(matrix, amplitude)?,
        _ => {
            info!("No LTC tables given; using the cosine lobe");
            LtcTable::identity()
        }
    };

    let basis: ArcShBasis = Arc::new(RealSphericalHarmonics::new());
    let mut integrator = ShIntegrator::new(Arc::clone(&basis), ltc);
    if let Some(path) = options.mesh_file.as_ref() {
        let builder = ShMeshBuilder::new(Arc::clone(&basis), 32, 64).with_obj_output(path);
        integrator = integrator.with_sink(Box::new(builder));
    }

    info!("Integrating {} with {} BRDF, {} bands", config.method, config.brdf, config.bands);
    let handles = scene.handles();
    let coefficients = integrator.recompute(&scene, &handles, &shading, &config);

    for l in 0..config.bands {
        let row: Vec<String> = (-(l as i32)..=l as i32)
            .map(|m| format!("{:+.6}", coefficients[sh_index(l, m)]))
            .collect();
        println!("l={}: {}", l, row.join(" "));
    }
    Ok(())
}

/// Two lights above a shading point at the origin: a one-sided quad straight
/// overhead and a tilted two-sided quad off to the side.
fn demo_scene() -> Result<SceneLights, String> {
    let mut scene = SceneLights::new(Point3f::new(0.0, -1.0, 2.0));
    scene.add(QuadLight::new(
        Point3f::new(0.0, 0.0, 2.0),
        Vector3f::new(0.5, 0.0, 0.0),
        Vector3f::new(0.0, -0.5, 0.0),
        5.0,
        false,
    )?);
    scene.add(QuadLight::new(
        Point3f::new(1.5, 0.0, 1.0),
        Vector3f::new(0.0, 0.4, 0.0),
        Vector3f::new(0.3, 0.0, -0.3),
        2.0,
        true,
    )?);
    Ok(scene)
}

fn converge(scene: &SceneLights, shading: &ShadingPoint, options: &Options) -> Result<(), String> {
    let time_budget = options.time_budget()?;
    let handle = scene
        .handles()
        .first()
        .copied()
        .ok_or_else(|| "Demo scene has no lights.".to_string())?;
    let light = scene.light(handle).ok_or(format!("Invalid {handle}."))?;

    let progress = ProgressBar::new(DEFAULT_SAMPLE_COUNTS.len() as u64);
    let style = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}").map_err(|e| format!("{e}"))?;
    progress.set_style(style);

    let records = convergence::run(
        light,
        shading,
        &DEFAULT_SAMPLE_COUNTS,
        time_budget,
        options.seed,
        |record| {
            progress.set_message(format!("{} samples", record.samples));
            progress.inc(1);
        },
    );
    progress.finish_and_clear();

    println!("{:>8} {:>12} {:>12} {:>12} {:>10}", "samples", "stratified", "random", "difference", "ms");
    for r in records.iter() {
        println!(
            "{:>8} {:>12.6} {:>12.6} {:>12.6} {:>10.2}",
            r.samples,
            r.stratified,
            r.random,
            r.difference,
            r.elapsed.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}
