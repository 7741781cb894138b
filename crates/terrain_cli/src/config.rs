//! Configuration parsing for the headless terrain driver.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::path::Path;

use transvoxel_terrain::{DensitySettings, FbmSettings, TerrainConfig, TerrainShape};

/// Root configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
	pub world: WorldConfig,
	#[serde(default)]
	pub density: DensityConfig,
	pub path: PathConfig,
}

/// World sizing and LOD shells.
#[derive(Debug, Deserialize)]
pub struct WorldConfig {
	pub world_size: u32,
	pub chunk_size: u32,
	#[serde(default = "default_lod_distance_factor")]
	pub lod_distance_factor: f32,
	#[serde(default = "default_transition_cell_width")]
	pub transition_cell_width: f32,
	#[serde(default = "default_probe_margin")]
	pub probe_margin: i32,
}

/// Noise terrain parameters.
#[derive(Debug, Deserialize)]
pub struct DensityConfig {
	#[serde(default = "default_seed")]
	pub seed: u32,
	/// Planet radius; planar terrain when absent.
	pub planet_radius: Option<f32>,
	pub heightmap: Option<FbmConfig>,
	pub perturbation: Option<FbmConfig>,
}

/// One fBm layer.
#[derive(Debug, Deserialize)]
pub struct FbmConfig {
	pub octaves: usize,
	pub frequency: f64,
	pub scale: f32,
	#[serde(default = "default_lacunarity")]
	pub lacunarity: f64,
	#[serde(default = "default_persistence")]
	pub persistence: f64,
}

/// Target path the driver walks.
#[derive(Debug, Deserialize)]
pub struct PathConfig {
	pub waypoints: Vec<[f32; 3]>,
	/// Ticks spent between consecutive waypoints.
	#[serde(default = "default_steps")]
	pub steps_per_segment: u32,
}

fn default_seed() -> u32 {
	1337
}

fn default_lod_distance_factor() -> f32 {
	1.5
}

fn default_transition_cell_width() -> f32 {
	0.5
}

fn default_probe_margin() -> i32 {
	1
}

fn default_lacunarity() -> f64 {
	2.0
}

fn default_persistence() -> f64 {
	0.5
}

fn default_steps() -> u32 {
	8
}

impl Default for DensityConfig {
	fn default() -> Self {
		Self {
			seed: default_seed(),
			planet_radius: None,
			heightmap: None,
			perturbation: None,
		}
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.path.waypoints.is_empty() {
			anyhow::bail!("Config must have at least one waypoint");
		}
		if config.path.steps_per_segment == 0 {
			anyhow::bail!("steps_per_segment must be at least 1");
		}

		Ok(config)
	}

	pub fn terrain(&self) -> Result<TerrainConfig> {
		let world = &self.world;
		let config = TerrainConfig::new(world.world_size, world.chunk_size)
			.and_then(|c| c.with_lod_distance_factor(world.lod_distance_factor))
			.and_then(|c| c.with_transition_cell_width(world.transition_cell_width))
			.context("Invalid [world] section")?
			.with_probe_margin(world.probe_margin);
		Ok(config)
	}

	pub fn density(&self, planet_override: Option<f32>) -> DensitySettings {
		let density = &self.density;
		let mut settings = DensitySettings::new(density.seed);
		if let Some(layer) = &density.heightmap {
			settings = settings.with_heightmap(layer.to_settings());
		}
		if let Some(layer) = &density.perturbation {
			settings = settings.with_perturbation(layer.to_settings());
		}
		if let Some(radius) = planet_override.or(density.planet_radius) {
			settings = settings.with_shape(TerrainShape::Planet {
				center: Vec3::ZERO,
				radius,
			});
		}
		settings
	}

	/// Target positions for every tick, waypoint to waypoint.
	pub fn targets(&self) -> Vec<Vec3> {
		let points: Vec<Vec3> = self.path.waypoints.iter().map(|p| Vec3::from_array(*p)).collect();
		let steps = self.path.steps_per_segment;
		let mut targets = vec![points[0]];
		for pair in points.windows(2) {
			for step in 1..=steps {
				targets.push(pair[0].lerp(pair[1], step as f32 / steps as f32));
			}
		}
		targets
	}
}

impl FbmConfig {
	fn to_settings(&self) -> FbmSettings {
		FbmSettings::new(self.octaves, self.frequency, self.scale)
			.with_lacunarity(self.lacunarity)
			.with_persistence(self.persistence)
	}
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
