use anyhow::Context;
use clap::Parser;
use polykit::{init_logging, GeometryConfig, LengthUnit, PolySet, SetSummary, TriangulationParams};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polykit")]
#[command(about = "Load a polygon-set dump and print a summary of it")]
struct Cmd {
    /// Dump file written by `PolySet::format`
    input: PathBuf,

    /// Engine configuration (JSON or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Unit for reported extents (nm, um, mm, in)
    #[arg(long, default_value = "mm")]
    unit: LengthUnit,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cmd = Cmd::parse();

    let config = match &cmd.config {
        Some(path) => GeometryConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeometryConfig::default(),
    };

    let text = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("reading {}", cmd.input.display()))?;
    let set = PolySet::parse(&text).with_context(|| format!("parsing {}", cmd.input.display()))?;
    tracing::info!(path = %cmd.input.display(), outlines = set.outline_count(), "loaded");

    let summary = SetSummary::of(&set, &TriangulationParams::from_config(&config), cmd.unit)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
