// Distributed under the GNU Affero General Public License v3.0 or later.
// See accompanying file LICENSE or https://www.gnu.org/licenses/agpl-3.0.html for details.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use log::info;

use maskslicer::config::RasterConfig;
use maskslicer::error::SliceError;
use maskslicer::loader;
use maskslicer::pipeline;
use maskslicer::progress::TerminalProgress;
use maskslicer::timer::Timer;

fn is_obj_path(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .map(|ext| ext.eq_ignore_ascii_case("obj"))
        .unwrap_or(false)
}

fn run() -> Result<(), SliceError> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: maskslicer <input.obj> <layer-thickness>");
        return Err(SliceError::InvalidInput {
            message: "expected exactly 2 arguments".into(),
        });
    }

    let input_path = &args[1];
    if !is_obj_path(input_path) {
        return Err(SliceError::InvalidInput {
            message: format!("input file {input_path} does not have an .obj extension"),
        });
    }

    let dz: f64 = args[2].parse().map_err(|_| SliceError::InvalidInput {
        message: format!("layer thickness {:?} is not a valid number", args[2]),
    })?;

    let path = Path::new(input_path);
    let config = RasterConfig::load_or_default(Some(Path::new("maskslicer.toml")));
    let progress = TerminalProgress::default();

    let load_timer = Timer::start();
    info!("loading mesh from {}", path.display());
    let loaded = loader::load_obj(path)?;
    info!(
        "loaded {} vertices, {} triangles in {:.2}s",
        loaded.mesh.vertices().len(),
        loaded.mesh.triangles().len(),
        load_timer.elapsed_secs()
    );
    if loaded.warnings > 0 {
        log::warn!(
            "{} unrecognized directive(s) skipped while loading {}",
            loaded.warnings,
            path.display()
        );
    }

    let pipeline_timer = Timer::start();
    let result = pipeline::slice_mesh_to_images(&loaded.mesh, dz, &config, &progress)?;
    info!(
        "sliced {} layers (z={:.4}..{:.4}) in {:.2}s",
        result.plan.layer_count,
        result.plan.zmin,
        result.plan.zmax,
        pipeline_timer.elapsed_secs()
    );

    for (k, coverage) in result.coverage.iter().enumerate() {
        println!("layer {k}: coverage = {coverage:.4}");
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
