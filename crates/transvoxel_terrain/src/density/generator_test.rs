use super::*;

fn flat_settings() -> DensitySettings {
  DensitySettings::new(7)
    .with_heightmap(FbmSettings::new(1, 0.01, 0.0))
    .with_perturbation(FbmSettings::new(1, 0.01, 0.0))
}

/// With zero noise strength the planar field is the signed height above y=0.
#[test]
fn test_planar_without_noise_is_height() {
  let generator = DensityGenerator::new(flat_settings());
  assert_eq!(generator.get_value(3.0, 5.0, -2.0), 5.0);
  assert_eq!(generator.get_value(3.0, -5.0, -2.0), -5.0);
}

/// Planet base term is distance to the center minus the radius.
#[test]
fn test_planet_without_noise_is_sphere() {
  let settings = flat_settings().with_shape(TerrainShape::Planet {
    center: Vec3::ZERO,
    radius: 100.0,
  });
  let generator = DensityGenerator::new(settings);
  assert!((generator.get_value(0.0, 0.0, 0.0) + 100.0).abs() < 1e-4);
  assert!((generator.get_value(0.0, 130.0, 0.0) - 30.0).abs() < 1e-4);
  assert!(generator.get_value(60.0, 0.0, 60.0) < 0.0);
}

/// Same seed and settings produce identical samples.
#[test]
fn test_deterministic() {
  let a = DensityGenerator::new(DensitySettings::new(42));
  let b = DensityGenerator::new(DensitySettings::new(42));
  for i in 0..32 {
    let p = Vec3::new(i as f32 * 7.3, i as f32 * -1.1, i as f32 * 3.7);
    assert_eq!(a.value(p), b.value(p));
  }
}

/// Noise stays within a small multiple of its configured strength.
#[test]
fn test_noise_is_bounded_by_scale() {
  let settings = DensitySettings::new(3)
    .with_heightmap(FbmSettings::new(4, 0.01, 10.0))
    .with_perturbation(FbmSettings::new(2, 0.05, 2.0));
  let generator = DensityGenerator::new(settings);
  for i in 0..64 {
    let x = i as f32 * 13.0;
    let z = i as f32 * -5.0;
    let value = generator.get_value(x, 0.0, z);
    assert!(value.abs() <= 24.0, "density {} at ({}, {})", value, x, z);
  }
}

/// Deep underground is solid and high in the sky is air.
#[test]
fn test_planar_sign_convention() {
  let generator = DensityGenerator::default();
  assert!(generator.get_value(10.0, -500.0, 10.0) < 0.0);
  assert!(generator.get_value(10.0, 500.0, 10.0) > 0.0);
}

/// Usable concurrently through a shared reference.
#[test]
fn test_concurrent_sampling_matches_serial() {
  use rayon::prelude::*;

  let generator = DensityGenerator::default();
  let points: Vec<Vec3> = (0..256).map(|i| Vec3::new(i as f32, 0.5 * i as f32, -(i as f32))).collect();
  let serial: Vec<f32> = points.iter().map(|p| generator.value(*p)).collect();
  let parallel: Vec<f32> = points.par_iter().map(|p| generator.value(*p)).collect();
  assert_eq!(serial, parallel);
}
