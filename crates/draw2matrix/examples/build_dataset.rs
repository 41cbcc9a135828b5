//! Build a dataset from a JSON job file.
//!
//! ```text
//! cargo run -p draw2matrix --example build_dataset -- job.json [report.json]
//! ```
//!
//! Set `DRAW2MATRIX_LOG=debug` to print every converted matrix.

use std::{env, fs};

use draw2matrix::BuildDatasetJob;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    draw2matrix::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    draw2matrix::core::init_from_env(log::LevelFilter::Info)?;

    let mut args = env::args().skip(1);
    let Some(job_path) = args.next() else {
        eprintln!("Usage: build_dataset <job.json> [report.json]");
        return Ok(());
    };

    let job = BuildDatasetJob::load_json(&job_path)?;
    log::info!(
        "building dataset from {} samples into {}",
        job.samples.len(),
        job.output.dir.display()
    );
    let report = job.run()?;

    println!("wrote {} samples to {}", report.samples, report.data_path.display());
    if let Some(target) = &report.target_path {
        println!("targets in {}", target.display());
    }

    if let Some(report_path) = args.next() {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&report_path, json)?;
        log::info!("wrote job report JSON to {report_path}");
    }

    Ok(())
}
