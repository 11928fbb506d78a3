use std::path::{Path, PathBuf};

use clap::Parser;
use pallet_loader::render;
use pallet_loader::types::{BoxSpec, PalletType, PlanRecord};
use pallet_loader::{DefaultPallet, PackConfig, Packer};
use serde::{Deserialize, Serialize};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "pallet_loader",
    about = "Greedy 3D pallet loading planner"
)]
struct Cli {
    /// Manifest JSON with "pallets" and "boxes" arrays
    #[arg(long)]
    manifest: PathBuf,

    /// Where to write the loading plan
    #[arg(long, default_value = "pallet_placements.json")]
    output: PathBuf,

    /// Pallet type used for the first and every newly opened pallet
    /// (default: first type in the manifest)
    #[arg(long)]
    default_pallet_type: Option<u32>,

    /// Maximum number of items on one pallet
    #[arg(long, default_value_t = pallet_loader::pallet::MAX_ITEMS_PER_PALLET)]
    max_items: usize,

    /// Maximum consecutive escalations to bigger pallet types per item
    #[arg(long, default_value_t = 16)]
    max_escalations: usize,

    /// Show ASCII top view of each pallet
    #[arg(long)]
    layout: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Deserialize)]
struct Manifest {
    pallets: Vec<PalletType>,
    boxes: Vec<BoxSpec>,
}

#[derive(Serialize)]
struct Output<'a> {
    placements: &'a [PlanRecord],
}

fn load_manifest(path: &Path) -> Result<Manifest, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read manifest '{}': {}", path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("invalid manifest '{}': {}", path.display(), e))
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    let manifest = load_manifest(&cli.manifest).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = PackConfig {
        default_pallet: cli
            .default_pallet_type
            .map_or(DefaultPallet::First, DefaultPallet::Type),
        max_items_per_pallet: cli.max_items,
        max_escalation_depth: cli.max_escalations,
        ..PackConfig::default()
    };

    let packer = Packer::with_config(manifest.pallets.clone(), manifest.boxes, config);
    let plan = packer.pack().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for (i, record) in plan.iter().enumerate() {
        println!(
            "Pallet {} (type {}): {} items, load {:.2}, total {:.2}, height {}",
            i + 1,
            record.type_id,
            record.total_items,
            record.load_weight,
            record.total_weight,
            record.total_height,
        );
        for item in &record.items {
            println!(
                "  {} {} {} @ {}",
                item.box_id, item.shape, item.dimensions, item.position
            );
        }
        if cli.layout
            && let Some(kind) = manifest.pallets.iter().find(|p| p.type_id == record.type_id)
        {
            print!("{}", render::render_pallet(kind, record));
        }
        println!();
    }

    let json = serde_json::to_string_pretty(&Output { placements: &plan }).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = std::fs::write(&cli.output, json) {
        eprintln!("Error: cannot write '{}': {}", cli.output.display(), e);
        std::process::exit(1);
    }

    let items: usize = plan.iter().map(|r| r.total_items).sum();
    println!(
        "Summary: {} pallet{} used, {} items, plan saved to {}",
        plan.len(),
        if plan.len() == 1 { "" } else { "s" },
        items,
        cli.output.display(),
    );
}
