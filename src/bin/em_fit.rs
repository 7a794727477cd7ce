use extended_em::config::fit::{self, FitToolConfig};
use extended_em::io::{load_dataset, write_json_file};
use extended_em::{Dataset, ExtendedEm, FittedModel};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json>")
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "em_fit".to_string());
    let config_path = args.next().map(PathBuf::from).ok_or_else(|| usage(&program))?;
    let config = fit::load_config(&config_path)?;

    let data = load_dataset(&config.input)?;
    let init = config.initialization(&data)?;

    let t0 = Instant::now();
    let fitted = ExtendedEm::new(config.em.clone())
        .fit(&data, &init)
        .map_err(|e| format!("EM fit failed: {e}"))?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    print_text_summary(&data, &fitted, elapsed_ms);
    write_outputs(&config, &fitted)
}

fn print_text_summary(data: &Dataset, fitted: &FittedModel, elapsed_ms: f64) {
    let report = fitted.report();
    println!(
        "Dataset '{}': {} rows, {} attributes",
        data.name(),
        data.num_instances(),
        data.num_attributes()
    );
    println!(
        "Clusters: {} (requested {}), restarts: {}",
        report.final_clusters,
        report.requested_clusters,
        report.restarts.len()
    );
    println!(
        "Iterations: {}, converged: {}, loglik: {:.6}, {:.3} ms",
        fitted.iterations(),
        fitted.converged(),
        fitted.log_likelihood(),
        elapsed_ms
    );
    for (c, prior) in fitted.cluster_priors().iter().enumerate() {
        println!("  cluster {c}: prior={prior:.4}");
        for (j, attr) in data.attributes().iter().enumerate() {
            if let Ok(est) = fitted.estimate(c, j) {
                println!(
                    "    {:<16} mean={:>12.5} std={:>12.5e} weight={:.3}",
                    attr.name, est.mean, est.std_dev, est.weight_sum
                );
            }
        }
    }
}

fn write_outputs(config: &FitToolConfig, fitted: &FittedModel) -> Result<(), String> {
    if let Some(path) = &config.output.result_json {
        let summary = fitted.summary(config.output.include_assignments);
        write_json_file(path, &summary)?;
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}
