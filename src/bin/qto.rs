//! Quantity take-off command-line driver
//!
//! Runs one take-off over a CSV export and optionally writes the filtered
//! COLLADA scene.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use qto::{
    Aggregation, Dataset, QuantityField, SceneStatus, Takeoff, TakeoffConfig, TakeoffRequest,
};

/// Command-line arguments for a take-off run
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV export of the model's elements
    #[arg(value_name = "DATASET")]
    dataset: PathBuf,

    /// Regular expression matched from the second character of the grouping value
    #[arg(short, long, default_value = "")]
    pattern: String,

    /// Column to group by
    #[arg(short, long, default_value = "Type")]
    group: String,

    /// Quantity to sum (Area, Volume, Width, Length)
    #[arg(short, long, default_value = "Area")]
    field: QuantityField,

    /// COLLADA scene to filter
    #[arg(short, long, value_name = "DAE")]
    scene: Option<PathBuf>,

    /// Directory relative paths are resolved against
    #[arg(long, env = "QTO_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Directory filtered scenes are written to
    #[arg(long, env = "QTO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Maximum number of rows read from the dataset
    #[arg(long, env = "QTO_ROW_LIMIT")]
    row_limit: Option<usize>,

    /// List columns and quantity fields, then exit
    #[arg(long)]
    list_columns: bool,

    /// Print the group table as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = TakeoffConfig::new();
    if let Some(dir) = args.base_dir {
        config = config.with_base_dir(dir);
    }
    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(limit) = args.row_limit {
        config = config.with_row_limit(limit);
    }

    let takeoff = Takeoff::new(config);
    let dataset = takeoff.load_dataset(&args.dataset)?;

    if args.list_columns {
        display_columns(&dataset);
        return Ok(());
    }

    let request = TakeoffRequest::new(args.group, args.field, args.pattern);
    let report = takeoff.run(&dataset, &request, args.scene.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.aggregation)?);
    } else {
        display_groups(&report.aggregation);
    }

    match &report.scene {
        SceneStatus::NotRequested => {}
        SceneStatus::NoMatch => println!("No geometry written: no items found"),
        SceneStatus::Written(scene) => println!("Filtered scene: {}", scene.path.display()),
        SceneStatus::Failed(e) => eprintln!("Scene could not be filtered: {}", e),
    }

    Ok(())
}

fn display_columns(dataset: &Dataset) {
    println!("Rows: {}", dataset.row_count());
    println!("Columns:");
    for column in dataset.columns() {
        println!("  {} ({:?})", column.name(), column.kind());
    }
    let fields: Vec<String> = dataset
        .quantity_fields()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Quantity fields: {}", fields.join(", "));
}

fn display_groups(aggregation: &Aggregation) {
    let Some(table) = aggregation.table() else {
        println!("no items found");
        return;
    };

    let field = table.field();
    let key_width = table
        .groups()
        .iter()
        .map(|g| g.key.chars().count())
        .chain(std::iter::once(table.group_column().len()))
        .max()
        .unwrap_or(0);

    println!(
        "{:<width$}  {:>8}  {:>14}  Separate {} of elements",
        table.group_column(),
        "Count",
        format!("Sum of {}", field),
        field,
        width = key_width
    );
    for group in table.groups() {
        println!(
            "{:<width$}  {:>8}  {:>14.3}  {}",
            group.key,
            group.element_count,
            group.quantity_sum,
            group.raw_concat,
            width = key_width
        );
    }
    println!(
        "{:<width$}  {:>8}  {:>14.3}",
        "Total",
        table.total_count(),
        table.total_quantity(),
        width = key_width
    );
}
