use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use voxscape_blocks::MaterialCatalog;
use voxscape_io::write_schematic;
use voxscape_landscape::{LandscapeArchive, SECTOR_PAYLOAD};
use voxscape_synth::{ConvertConfig, ConvertCtx, ConvertOptions, SectorCoord, convert_sectors};
use voxscape_world::WorldBuffer;

#[derive(Parser)]
#[command(
    name = "voxscape",
    about = "Convert legacy 2D landscape archives into 3D voxel schematics"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert sectors from a landscape archive into a .schem file
    Convert(ConvertArgs),
    /// Summarize the sector entries inside a landscape archive
    Inspect {
        /// Landscape archive (zip of h<layer>x<sx>y<sy> entries)
        archive: PathBuf,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Landscape archive (zip of h<layer>x<sx>y<sy> entries)
    archive: PathBuf,
    /// Output schematic path
    #[arg(long, short)]
    out: PathBuf,
    /// Convert the sectors covering a world-space rectangle (two corners)
    #[arg(long, num_args = 4, value_names = ["X0", "Z0", "X1", "Z1"],
          allow_hyphen_values = true, conflicts_with_all = ["at", "all"])]
    region: Option<Vec<i32>>,
    /// Convert the single sector containing a world position
    #[arg(long, num_args = 2, value_names = ["X", "Z"],
          allow_hyphen_values = true, conflicts_with = "all")]
    at: Option<Vec<i32>>,
    /// Convert every sector in the configured rectangle (the default)
    #[arg(long)]
    all: bool,
    /// Blank each requested footprint before synthesis
    #[arg(long)]
    clear: bool,
    /// Conversion parameters TOML (embedded defaults otherwise)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Material palette TOML overriding the embedded one
    #[arg(long)]
    materials: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Inspect { archive } => run_inspect(&archive),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Box<dyn Error>> {
    let cfg = match &args.config {
        Some(path) => ConvertConfig::from_path(path)?,
        None => ConvertConfig::default(),
    };
    let materials = match &args.materials {
        Some(path) => MaterialCatalog::from_path(path)?,
        None => MaterialCatalog::builtin()?,
    };
    let archive = LandscapeArchive::open(&args.archive)?;
    log::info!("{}: {} entries", args.archive.display(), archive.len());

    let coords = resolve_selection(&args, &cfg)?;
    log::info!("converting {} sector(s)", coords.len());

    let mut world = WorldBuffer::new();
    let mut ctx = ConvertCtx::new(&cfg, &materials, &mut world);
    convert_sectors(
        &archive,
        &coords,
        ConvertOptions { clear: args.clear },
        &mut ctx,
    );
    let stats = ctx.into_stats();

    log::info!(
        "{} sector(s) converted, {} missing, {} malformed",
        stats.sectors_converted,
        stats.sectors_missing,
        stats.sectors_malformed
    );
    log::info!(
        "placed {} voxels: {} ground, {} support, {} overlay, {} wall, {} door, {} window, {} roof, {} object",
        stats.placed_total(),
        stats.ground_voxels,
        stats.support_voxels,
        stats.overlay_voxels,
        stats.wall_voxels,
        stats.door_voxels,
        stats.window_voxels,
        stats.roof_voxels,
        stats.object_voxels
    );
    if !stats.unknown_codes.is_empty() {
        let codes: Vec<String> = stats.unknown_codes.iter().cloned().collect();
        log::warn!(
            "{} unrecognized code(s) marked with the unknown material: {}",
            codes.len(),
            codes.join(", ")
        );
    }
    if world.is_empty() {
        log::warn!("no voxels produced; nothing to write");
        return Ok(());
    }

    let info = write_schematic(&args.out, &world, &materials)?;
    log::info!(
        "wrote {}: {}x{}x{}, {} palette entries, {} voxels",
        args.out.display(),
        info.width,
        info.height,
        info.length,
        info.palette_len,
        info.voxels
    );
    Ok(())
}

/// Turn the selection mode into sector coordinates, clipped to the
/// configured bounds.
fn resolve_selection(
    args: &ConvertArgs,
    cfg: &ConvertConfig,
) -> Result<Vec<SectorCoord>, Box<dyn Error>> {
    if let Some(r) = &args.region {
        let a = cfg.bounds.sector_at(r[0], r[1]);
        let b = cfg.bounds.sector_at(r[2], r[3]);
        // the x mirror can swap corner order in sector space
        let (sx0, sx1) = (a.sx.min(b.sx), a.sx.max(b.sx));
        let (sy0, sy1) = (a.sy.min(b.sy), a.sy.max(b.sy));
        let coords: Vec<SectorCoord> = (sy0..=sy1)
            .flat_map(|sy| (sx0..=sx1).map(move |sx| SectorCoord::new(sx, sy)))
            .filter(|c| cfg.bounds.contains(*c))
            .collect();
        if coords.is_empty() {
            return Err(format!(
                "region ({}, {})..({}, {}) lies outside the configured landscape",
                r[0], r[1], r[2], r[3]
            )
            .into());
        }
        return Ok(coords);
    }
    if let Some(p) = &args.at {
        let c = cfg.bounds.sector_at(p[0], p[1]);
        if !cfg.bounds.contains(c) {
            return Err(format!(
                "position ({}, {}) lies outside the configured landscape",
                p[0], p[1]
            )
            .into());
        }
        return Ok(vec![c]);
    }
    Ok(cfg.bounds.iter().collect())
}

fn run_inspect(path: &Path) -> Result<(), Box<dyn Error>> {
    let archive = LandscapeArchive::open(path)?;

    #[derive(Default)]
    struct LayerSummary {
        count: usize,
        // min_x, max_x, min_y, max_y of present sectors
        bbox: Option<(i32, i32, i32, i32)>,
    }

    let mut layers: BTreeMap<u8, LayerSummary> = BTreeMap::new();
    let mut payload_bytes = 0u64;
    let mut odd_sized = 0usize;
    let mut foreign = 0usize;
    for name in archive.entry_names() {
        let Some((layer, sx, sy)) = LandscapeArchive::parse_key(name) else {
            foreign += 1;
            continue;
        };
        let len = archive.entry(name).map_or(0, <[u8]>::len);
        payload_bytes += len as u64;
        if len != SECTOR_PAYLOAD {
            odd_sized += 1;
        }
        let summary = layers.entry(layer).or_default();
        summary.count += 1;
        summary.bbox = Some(match summary.bbox {
            Some((x0, x1, y0, y1)) => (x0.min(sx), x1.max(sx), y0.min(sy), y1.max(sy)),
            None => (sx, sx, sy, sy),
        });
    }

    println!(
        "{}: {} entries, {} sector payload bytes",
        path.display(),
        archive.len(),
        payload_bytes
    );
    if layers.is_empty() {
        println!("  no sector entries found");
    }
    for (layer, summary) in &layers {
        let (x0, x1, y0, y1) = summary.bbox.unwrap_or((0, 0, 0, 0));
        println!(
            "  layer {}: {} sector(s), x {}..={}, y {}..={}",
            layer, summary.count, x0, x1, y0, y1
        );
    }
    if odd_sized > 0 {
        println!(
            "  {} sector entr(ies) with unexpected payload size (want {})",
            odd_sized, SECTOR_PAYLOAD
        );
    }
    if foreign > 0 {
        println!("  {} non-sector entr(ies) ignored", foreign);
    }
    Ok(())
}
