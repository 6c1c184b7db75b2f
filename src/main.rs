use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cohort::{
    render_svg, report, Dataset, EmptyClusterPolicy, Kmeans, RenderStyle, ReportBuilder,
    ScalingMode,
};

/// Cluster expression profiles and report dominant-feature groups.
#[derive(Parser, Debug)]
#[command(name = "cohort", version, about)]
struct Args {
    /// Input expression table (CSV with an ID,NAME,<axes...> header).
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the group report CSV.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of clusters.
    #[arg(short = 'k', long)]
    clusters: usize,

    /// Row-wise scaling applied before clustering (identity, zscore, minmax).
    #[arg(long, default_value = "identity")]
    scaling: ScalingMode,

    /// RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Stabilization threshold for the initialization phase.
    #[arg(long, default_value_t = cohort::DEFAULT_INIT_THRESHOLD)]
    init_threshold: f64,

    /// Convergence threshold for the refinement phase.
    #[arg(long, default_value_t = cohort::DEFAULT_CONVERGE_THRESHOLD)]
    converge_threshold: f64,

    /// Abort instead of reseeding when a cluster loses all members.
    #[arg(long)]
    fail_on_empty_cluster: bool,

    /// Reference-link template; `{}` is replaced by the profile id.
    #[arg(long, default_value = cohort::DEFAULT_URL_TEMPLATE)]
    url_template: String,

    /// Also render profiles and centers to this SVG file.
    #[arg(long)]
    svg: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let dataset = Dataset::from_csv_path(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let vectors = dataset
        .scaled_vectors(args.scaling)
        .context("failed to scale profiles")?;

    let mut model = Kmeans::new(args.clusters)
        .with_init_threshold(args.init_threshold)
        .with_converge_threshold(args.converge_threshold);
    if args.fail_on_empty_cluster {
        model = model.with_empty_policy(EmptyClusterPolicy::Fail);
    }
    if let Some(seed) = args.seed {
        model = model.with_seed(seed);
    }
    let fit = model.fit(&vectors).context("clustering failed")?;
    info!(
        clusters = args.clusters,
        init_trials = fit.init_trials,
        refine_passes = fit.refine_passes,
        total_error = fit.total_error,
        "clustering finished"
    );

    let rows = ReportBuilder::new()
        .with_url_template(args.url_template.as_str())
        .build(&fit.centers, &fit.labels, &dataset.profiles, &dataset.axes)?;
    let out = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    report::write_csv(out, &rows)?;

    if let Some(path) = &args.svg {
        let svg = render_svg(
            &fit.centers,
            &fit.labels,
            &vectors,
            &dataset.axes,
            args.scaling,
            &RenderStyle::default(),
        )?;
        fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    }

    println!(
        "grouped {} profiles into {} clusters -> {}",
        dataset.len(),
        args.clusters,
        args.output.display()
    );
    Ok(())
}
