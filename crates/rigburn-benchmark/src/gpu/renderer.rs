//! Instanced render target driven by the load ramp.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rigburn_core::{Result, RigBurnError};

/// A batched instance buffer with fixed capacity.
pub trait InstanceRenderer {
    /// Allocate buffers for `capacity` instances. Failure is fatal for the run.
    fn init(&mut self, capacity: usize) -> Result<()>;

    fn capacity(&self) -> usize;

    fn instance_count(&self) -> usize;

    /// Append up to `count` instances, clamped to capacity. Returns the new count.
    fn add_instances(&mut self, count: usize) -> usize;

    /// Per-frame transform update over all live instances.
    fn update(&mut self);

    fn render(&mut self) -> Result<()>;

    /// Drop all buffers. Safe to call more than once.
    fn release(&mut self);
}

const PALETTE: [[f32; 3]; 3] = [
    [0.0, 1.0, 0.255],
    [0.0, 0.851, 1.0],
    [0.69, 0.149, 1.0],
];
const SPAWN_RADIUS: f32 = 80.0;
const ORBIT_ANGLE: f32 = 0.0005;
const CAMERA: [f32; 3] = [0.0, 30.0, 100.0];
const FOV_DEG: f32 = 75.0;
const FAR_PLANE: f32 = 500.0;
const TILE_GRID: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
struct Instance {
    position: [f32; 3],
    rotation: [f32; 2],
    spin: [f32; 2],
    color: [f32; 3],
}

/// CPU-side instance buffer that performs the orbit/rotation transforms and a
/// coarse projection pass each frame.
pub struct SoftwareRenderer {
    instances: Vec<Instance>,
    transforms: Vec<[f32; 16]>,
    tiles: Vec<f32>,
    capacity: usize,
    visible: usize,
    rng: ChaCha8Rng,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            instances: Vec::new(),
            transforms: Vec::new(),
            tiles: Vec::new(),
            capacity: 0,
            visible: 0,
            rng,
        }
    }

    /// Instances that landed inside the view frustum on the last render.
    pub fn visible(&self) -> usize {
        self.visible
    }

    fn spawn(&mut self, index: usize) -> Instance {
        let theta = self.rng.gen::<f32>() * PI * 2.0;
        let phi = (2.0 * self.rng.gen::<f32>() - 1.0).acos();
        let r = SPAWN_RADIUS * self.rng.gen::<f32>().cbrt() * (1.0 + index as f32 / 5000.0);

        Instance {
            position: [
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            ],
            rotation: [self.rng.gen::<f32>() * PI, self.rng.gen::<f32>() * PI],
            spin: [
                (self.rng.gen::<f32>() - 0.5) * 0.05,
                (self.rng.gen::<f32>() - 0.5) * 0.05,
            ],
            color: PALETTE[index % PALETTE.len()],
        }
    }
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn compose(position: [f32; 3], rotation: [f32; 2]) -> [f32; 16] {
    let (sx, cx) = rotation[0].sin_cos();
    let (sy, cy) = rotation[1].sin_cos();
    // R = Ry * Rx, column-major with translation in the last column
    [
        cy,
        0.0,
        -sy,
        0.0,
        sy * sx,
        cx,
        cy * sx,
        0.0,
        sy * cx,
        -sx,
        cy * cx,
        0.0,
        position[0],
        position[1],
        position[2],
        1.0,
    ]
}

impl InstanceRenderer for SoftwareRenderer {
    fn init(&mut self, capacity: usize) -> Result<()> {
        self.release();

        let unavailable = |e: std::collections::TryReserveError| {
            RigBurnError::RendererUnavailable(format!(
                "cannot allocate instance buffer for {} instances: {}",
                capacity, e
            ))
        };
        if capacity == 0 {
            return Err(RigBurnError::RendererUnavailable(
                "instance buffer capacity is zero".to_string(),
            ));
        }

        self.instances.try_reserve_exact(capacity).map_err(unavailable)?;
        self.transforms.try_reserve_exact(capacity).map_err(unavailable)?;
        self.tiles = vec![f32::INFINITY; TILE_GRID * TILE_GRID];
        self.capacity = capacity;

        tracing::debug!(capacity, "Software renderer initialized");
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn add_instances(&mut self, count: usize) -> usize {
        let current = self.instances.len();
        let target = current.saturating_add(count).min(self.capacity);

        for i in current..target {
            let instance = self.spawn(i);
            self.transforms.push(compose(instance.position, instance.rotation));
            self.instances.push(instance);
        }

        self.instances.len()
    }

    fn update(&mut self) {
        let (s, c) = ORBIT_ANGLE.sin_cos();
        for (instance, transform) in self.instances.iter_mut().zip(self.transforms.iter_mut()) {
            let [x, y, z] = instance.position;
            instance.position = [x * c - z * s, y, x * s + z * c];
            instance.rotation[0] += instance.spin[0];
            instance.rotation[1] += instance.spin[1];
            *transform = compose(instance.position, instance.rotation);
        }
    }

    fn render(&mut self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RigBurnError::RendererUnavailable(
                "render called on a released renderer".to_string(),
            ));
        }

        self.tiles.fill(f32::INFINITY);
        let focal = 1.0 / (FOV_DEG.to_radians() / 2.0).tan();
        let mut visible = 0;

        for (instance, transform) in self.instances.iter().zip(self.transforms.iter()) {
            let depth = CAMERA[2] - transform[14];
            if depth <= 0.1 || depth > FAR_PLANE {
                continue;
            }
            let ndc_x = (transform[12] - CAMERA[0]) * focal / depth;
            let ndc_y = (transform[13] - CAMERA[1]) * focal / depth;
            if !(-1.0..=1.0).contains(&ndc_x) || !(-1.0..=1.0).contains(&ndc_y) {
                continue;
            }

            let tx = ((ndc_x + 1.0) * 0.5 * (TILE_GRID - 1) as f32) as usize;
            let ty = ((ndc_y + 1.0) * 0.5 * (TILE_GRID - 1) as f32) as usize;
            let tile = &mut self.tiles[ty * TILE_GRID + tx];
            // shade with the brightest channel so the palette stays in the pass
            let shade = depth - instance.color.iter().copied().fold(0.0, f32::max);
            if shade < *tile {
                *tile = shade;
            }
            visible += 1;
        }

        self.visible = visible;
        Ok(())
    }

    fn release(&mut self) {
        self.instances = Vec::new();
        self.transforms = Vec::new();
        self.tiles = Vec::new();
        self.capacity = 0;
        self.visible = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_unavailable() {
        let mut renderer = SoftwareRenderer::seeded(1);
        let err = renderer.init(0).unwrap_err();
        assert!(matches!(err, RigBurnError::RendererUnavailable(_)));
    }

    #[test]
    fn test_add_is_clamped_to_capacity() {
        let mut renderer = SoftwareRenderer::seeded(1);
        renderer.init(1_000).unwrap();
        assert_eq!(renderer.add_instances(600), 600);
        assert_eq!(renderer.add_instances(600), 1_000);
        assert_eq!(renderer.instance_count(), 1_000);
    }

    #[test]
    fn test_update_orbits_positions() {
        let mut renderer = SoftwareRenderer::seeded(7);
        renderer.init(10).unwrap();
        renderer.add_instances(10);
        let before = renderer.instances[0].position;
        renderer.update();
        let after = renderer.instances[0].position;
        assert_ne!(before, after);
        // orbit is a rotation about Y: radius in the XZ plane is preserved
        let r0 = (before[0].powi(2) + before[2].powi(2)).sqrt();
        let r1 = (after[0].powi(2) + after[2].powi(2)).sqrt();
        assert!((r0 - r1).abs() < 1e-3);
        assert_eq!(before[1], after[1]);
    }

    #[test]
    fn test_render_counts_visible_and_release_resets() {
        let mut renderer = SoftwareRenderer::seeded(3);
        renderer.init(2_000).unwrap();
        renderer.add_instances(2_000);
        renderer.render().unwrap();
        assert!(renderer.visible() > 0);
        assert!(renderer.visible() <= 2_000);

        renderer.release();
        assert_eq!(renderer.instance_count(), 0);
        assert_eq!(renderer.capacity(), 0);
        assert!(renderer.render().is_err());
        renderer.release();
    }
}
