use extended_em::{Attribute, Dataset, EmParams, ExtendedEm, Initialization, Instance};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    // Demo: two well separated groups on a single numeric attribute.
    let mut data = Dataset::new("demo", vec![Attribute::numeric("x")]);
    for x in [1.0, 1.0, 2.0, 8.0, 9.0, 9.0] {
        data.add(Instance::numeric(&[x])).map_err(|e| e.to_string())?;
    }
    let init = Initialization::centers(
        vec![Instance::numeric(&[1.5]), Instance::numeric(&[8.5])],
        vec![3.0, 3.0],
    );
    let params = EmParams {
        max_iterations: 50,
        ..EmParams::with_clusters(2)
    };
    let fitted = ExtendedEm::new(params)
        .fit(&data, &init)
        .map_err(|e| e.to_string())?;

    let priors = fitted.cluster_priors();
    for (c, prior) in priors.iter().enumerate() {
        println!(
            "cluster {c}: prior={prior:.3} mean={:.3} std={:.3}",
            fitted.means()[(c, 0)],
            fitted.std_devs()[(c, 0)]
        );
    }
    println!(
        "iterations={} loglik={:.6} converged={}",
        fitted.iterations(),
        fitted.log_likelihood(),
        fitted.converged()
    );
    Ok(())
}
