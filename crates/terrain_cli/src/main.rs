//! Headless terrain driver.
//!
//! Builds a noise terrain from a TOML config, walks the LOD target along the
//! configured waypoints and logs what every tick produced.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use transvoxel_terrain::{DensityGenerator, MeshEvent, TerrainPipeline};

/// Walk a target through a voxel terrain and report per-tick stats.
#[derive(Parser, Debug)]
#[command(name = "terrain")]
#[command(about = "Runs the Transvoxel terrain pipeline along a target path")]
struct Args {
	/// Path to configuration TOML file.
	#[arg(short, long, default_value = "terrain.toml")]
	config: PathBuf,

	/// Stop after this many ticks.
	#[arg(short, long)]
	ticks: Option<usize>,

	/// Planet radius; overrides the config shape.
	#[arg(long)]
	planet: Option<f32>,
}

fn main() -> Result<()> {
	env_logger::builder()
		.filter_level(log::LevelFilter::Info)
		.parse_default_env()
		.init();

	let args = Args::parse();
	log::info!("Loading config from: {}", args.config.display());
	let config = Config::load(&args.config)?;

	let terrain = config.terrain()?;
	let field = Arc::new(DensityGenerator::new(config.density(args.planet)));
	let mut pipeline = TerrainPipeline::new(terrain, field);

	let mut targets = config.targets();
	if let Some(ticks) = args.ticks {
		targets.truncate(ticks);
	}
	log::info!(
		"World {} / chunk {} (max LOD {}), {} ticks",
		terrain.world_size,
		terrain.chunk_size,
		terrain.max_depth(),
		targets.len()
	);

	let mut total_triangles = 0usize;
	for (tick, target) in targets.iter().enumerate() {
		let (events, stats) = pipeline
			.tick(*target)
			.with_context(|| format!("Tick {} at {:?} failed", tick, target))?;

		let teardowns = events
			.iter()
			.filter(|e| matches!(e, MeshEvent::Teardown { .. }))
			.count();
		total_triangles += stats.triangles;

		log::info!(
			"tick {:>3} target ({:>7.1}, {:>6.1}, {:>7.1}): +{} -{} ~{} | meshed {} uniform {} teardown {} | {} tris | {:.2}ms (diff {:.2} density {:.2} mesh {:.2})",
			tick,
			target.x,
			target.y,
			target.z,
			stats.creates,
			stats.removes,
			stats.updates,
			stats.meshed,
			stats.uniform,
			teardowns,
			stats.triangles,
			stats.total_us as f64 / 1000.0,
			stats.diff_us as f64 / 1000.0,
			stats.density_us as f64 / 1000.0,
			stats.mesh_us as f64 / 1000.0,
		);
	}

	log::info!(
		"Done: {} active chunks, {} triangles meshed over the run",
		pipeline.chunks().active().len(),
		total_triangles
	);

	Ok(())
}
