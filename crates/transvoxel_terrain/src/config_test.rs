use super::*;

#[test]
fn test_default_is_valid() {
  let config = TerrainConfig::default();
  assert!(config.validate().is_ok());
  assert_eq!(config.max_depth(), 5);
}

#[test]
fn test_rejects_non_power_of_two_world() {
  assert_eq!(
    TerrainConfig::new(300, 32),
    Err(ConfigError::WorldSizeNotPowerOfTwo(300))
  );
}

#[test]
fn test_rejects_non_power_of_two_chunk() {
  assert_eq!(
    TerrainConfig::new(256, 24),
    Err(ConfigError::ChunkSizeNotPowerOfTwo(24))
  );
}

#[test]
fn test_rejects_small_chunk() {
  assert_eq!(
    TerrainConfig::new(256, 4),
    Err(ConfigError::ChunkSizeTooSmall { size: 4, min: 8 })
  );
}

#[test]
fn test_rejects_chunk_larger_than_world() {
  assert_eq!(
    TerrainConfig::new(16, 32),
    Err(ConfigError::ChunkLargerThanWorld {
      chunk_size: 32,
      world_size: 16
    })
  );
}

#[test]
fn test_rejects_tree_deeper_than_location_code() {
  let err = TerrainConfig::new(1 << 31, 8).unwrap_err();
  assert!(matches!(err, ConfigError::TreeTooDeep { depth: 28, .. }));
}

#[test]
fn test_rejects_bad_transition_width() {
  let config = TerrainConfig::new(256, 32).unwrap();
  assert!(config.clone().with_transition_cell_width(0.0).is_err());
  assert!(config.clone().with_transition_cell_width(1.0).is_err());
  assert!(config.with_transition_cell_width(0.25).is_ok());
}

#[test]
fn test_single_chunk_world() {
  let config = TerrainConfig::new(32, 32).unwrap();
  assert_eq!(config.max_depth(), 0);
}

#[test]
fn test_thresholds_double_per_depth() {
  let config = TerrainConfig::new(256, 32).unwrap();
  assert_eq!(config.lod_threshold(0), 48.0);
  assert_eq!(config.lod_threshold(1), 96.0);
  assert_eq!(config.lod_threshold(2), 192.0);
  assert_eq!(config.chunk_world_size(3), 256);
  assert_eq!(config.voxel_spacing(2), 4.0);
}

#[test]
fn test_rejects_distance_factor_below_balance_bound() {
  let config = TerrainConfig::new(256, 32).unwrap();
  assert!(config.clone().with_lod_distance_factor(1.2).is_err());
  assert!(config.clone().with_lod_distance_factor(f32::NAN).is_err());
  assert!(config.with_lod_distance_factor(2.0).is_ok());
}
