//! Cluster a small expression table and print the derived group report.

use cohort::{render_svg, Dataset, Kmeans, RenderStyle, ReportBuilder, ScalingMode};

const TABLE: &str = "\
ID,NAME,heart,liver,lung,kidney
4625,MYH7,9,1,1,1
4607,MYBPC3,8,2,1,1
70,ACTC1,9,2,2,1
213,ALB,1,9,1,2
335,APOA1,1,8,2,1
197,AHSG,2,9,1,1
6440,SFTPC,1,1,9,2
6439,SFTPB,2,1,8,1
7356,SCGB1A1,1,2,9,1
";

fn main() {
    let dataset = Dataset::from_reader(TABLE.as_bytes()).unwrap();
    let scaling = ScalingMode::ZScore;
    let vectors = dataset.scaled_vectors(scaling).unwrap();

    // --- K-means (k=3) ---
    let fit = Kmeans::new(3).with_seed(42).fit(&vectors).unwrap();
    println!("=== K-means (k=3, {scaling}) ===");
    println!(
        "  stabilized after {} trials, converged after {} passes, total error {:.4}",
        fit.init_trials, fit.refine_passes, fit.total_error
    );
    for (profile, label) in dataset.profiles.iter().zip(&fit.labels) {
        println!("  {:>6} {:8} => cluster {}", profile.id, profile.name, label);
    }

    // --- Group report ---
    let rows = ReportBuilder::new()
        .build(&fit.centers, &fit.labels, &dataset.profiles, &dataset.axes)
        .unwrap();
    println!("\n=== Report ===");
    for row in &rows {
        println!(
            "  group {} {:>6} {:8} {:12} {}",
            row.group, row.id, row.name, row.assignment, row.url
        );
    }

    // --- SVG rendering ---
    let svg = render_svg(
        &fit.centers,
        &fit.labels,
        &vectors,
        &dataset.axes,
        scaling,
        &RenderStyle::default(),
    )
    .unwrap();
    println!("\nrendered {} bytes of SVG", svg.len());
}
