//! Player-vs-level collision resolution
//!
//! Owns the level's triangle store and answers the two per-tick queries a
//! player controller needs:
//!
//! - [`CollisionSystem::resolve_collision`] corrects an attempted move so the
//!   player volume does not penetrate the level
//! - [`CollisionSystem::ground_height`] finds the highest walkable surface
//!   below (or above) a point, for terrain following
//!
//! The player volume is a vertical capsule approximated by a single sphere
//! at mid-height. Only that cross-section is tested, so geometry that
//! intersects the capsule well above or below mid-height is not caught.
//!
//! Correction is positional, not swept: by default the attempted position
//! is pushed out of every triangle it overlaps, in store order, in a single
//! greedy pass. Moves longer than the sphere radius per tick can tunnel
//! through thin geometry unless sub-stepping is enabled.

use crate::core::config::CollisionConfig;
use crate::foundation::math::Vec3;
use crate::physics::collision::{
    BoundingSphere, CollisionError, Ray, Triangle, TriangleSource, TriangleStore,
};

/// Default player sphere radius
pub const DEFAULT_PLAYER_RADIUS: f32 = 0.3;

/// Default player height (the sphere sits at half this height)
pub const DEFAULT_PLAYER_HEIGHT: f32 = 1.8;

/// Height above the query point that ground rays start from
pub const GROUND_RAY_HEIGHT: f32 = 1000.0;

/// Minimum face normal Y component for a triangle to count as ground
pub const GROUND_NORMAL_MIN_Y: f32 = 0.5;

/// Upper bound on sub-steps per resolve, whatever the move length
const MAX_SUBSTEPS: usize = 1024;

/// The player's collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerVolume {
    radius: f32,
    height: f32,
}

impl PlayerVolume {
    /// Create a player volume
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    /// Sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Player height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Collision sphere for a feet-anchored position
    pub fn sphere_at(&self, feet: Vec3) -> BoundingSphere {
        BoundingSphere::new(Vec3::new(feet.x, feet.y + self.height * 0.5, feet.z), self.radius)
    }
}

impl Default for PlayerVolume {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_RADIUS, DEFAULT_PLAYER_HEIGHT)
    }
}

/// Outcome of a collision resolve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Corrected feet position; the caller adopts this as authoritative
    pub position: Vec3,
    /// Number of triangle push-outs applied
    pub corrections: usize,
    /// Number of full scans over the triangle store
    pub passes: u32,
}

/// Collision system for a single player against a static level mesh
#[derive(Debug, Clone)]
pub struct CollisionSystem {
    triangles: TriangleStore,
    player: PlayerVolume,
    max_passes: u32,
    substep_length: Option<f32>,
    strict_index_count: bool,
}

impl CollisionSystem {
    /// Create a collision system with the given player dimensions
    ///
    /// Uses a single greedy correction pass and no sub-stepping.
    pub fn new(player_radius: f32, player_height: f32) -> Self {
        Self {
            triangles: TriangleStore::new(),
            player: PlayerVolume::new(player_radius, player_height),
            max_passes: 1,
            substep_length: None,
            strict_index_count: false,
        }
    }

    /// Create a collision system from configuration
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self::new(config.player_radius, config.player_height)
            .with_max_passes(config.max_passes)
            .with_substep_length(config.substep_length)
            .with_strict_index_count(config.strict_index_count)
    }

    /// Set how many full correction passes a resolve may run
    ///
    /// `1` reproduces the single greedy pass. Larger values repeat the scan
    /// until a pass applies no correction or the cap is reached.
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Split each move into sub-moves no longer than `length`
    ///
    /// `None` (or a non-positive length) disables sub-stepping.
    pub fn with_substep_length(mut self, length: Option<f32>) -> Self {
        self.substep_length = length.filter(|l| *l > 0.0);
        self
    }

    /// Reject index buffers with a trailing partial triangle instead of dropping it
    pub fn with_strict_index_count(mut self, strict: bool) -> Self {
        self.strict_index_count = strict;
        self
    }

    /// The player collision volume
    pub fn player(&self) -> PlayerVolume {
        self.player
    }

    /// Replace the collision geometry with the triangles of `mesh`
    ///
    /// The new triangle list is built completely before it replaces the old
    /// one; on error the previous geometry stays loaded.
    pub fn load_mesh_collision<S: TriangleSource + ?Sized>(&mut self, mesh: &S) -> Result<usize, CollisionError> {
        let store = TriangleStore::from_source(mesh, self.strict_index_count)?;
        self.triangles = store;
        log::info!("CollisionSystem: loaded {} triangles for collision", self.triangles.len());
        Ok(self.triangles.len())
    }

    /// Number of loaded triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Loaded triangles in store order
    pub fn triangles(&self) -> &[Triangle] {
        self.triangles.triangles()
    }

    /// Correct an attempted move; returns the position the caller must adopt
    pub fn resolve_collision(&self, old_position: Vec3, new_position: Vec3) -> Vec3 {
        self.resolve(old_position, new_position).position
    }

    /// Correct an attempted move and report how much work it took
    ///
    /// Without sub-stepping `old_position` is not used. With sub-stepping the
    /// path from `old_position` to `new_position` is split into equal
    /// sub-moves, each corrected before the next is applied.
    pub fn resolve(&self, old_position: Vec3, new_position: Vec3) -> Resolution {
        let mut resolution = Resolution {
            position: new_position,
            corrections: 0,
            passes: 0,
        };

        match self.substep_length {
            None => {
                resolution.position = self.push_out(new_position, &mut resolution);
            }
            Some(step) => {
                let delta = new_position - old_position;
                let steps = ((delta.norm() / step).ceil() as usize).clamp(1, MAX_SUBSTEPS);
                let increment = delta / steps as f32;

                let mut position = old_position;
                for _ in 0..steps {
                    position = self.push_out(position + increment, &mut resolution);
                }
                resolution.position = position;
            }
        }

        if resolution.corrections > 0 {
            log::trace!(
                "Resolved move to {:?} with {} correction(s) over {} pass(es)",
                resolution.position,
                resolution.corrections,
                resolution.passes
            );
        }

        resolution
    }

    /// Push `position` out of overlapping triangles, one greedy scan per pass
    fn push_out(&self, mut position: Vec3, resolution: &mut Resolution) -> Vec3 {
        for _ in 0..self.max_passes {
            resolution.passes += 1;

            let mut sphere = self.player.sphere_at(position);
            let mut corrected = false;
            for triangle in &self.triangles {
                if let Some(contact) = triangle.intersect_sphere(&sphere) {
                    position += contact.normal * contact.depth;
                    sphere = self.player.sphere_at(position);
                    resolution.corrections += 1;
                    corrected = true;
                }
            }

            if !corrected {
                break;
            }
        }
        position
    }

    /// Height of the highest upward-facing surface under `position`
    ///
    /// Casts a ray straight down from [`GROUND_RAY_HEIGHT`] above the point
    /// and keeps the highest hit among triangles whose face normal has a Y
    /// component of at least [`GROUND_NORMAL_MIN_Y`]. Walls, steep slopes and
    /// downward-wound faces are ignored. Returns `None` when nothing is hit.
    ///
    /// Every floor in the column counts, including ones above the point.
    /// Use [`CollisionSystem::ground_height_within`] to find the floor the
    /// player is standing on in a level with stacked storeys.
    pub fn ground_height(&self, position: Vec3) -> Option<f32> {
        self.highest_ground_below(position, GROUND_RAY_HEIGHT)
    }

    /// Height of the highest upward-facing surface at most `max_rise` above `position`
    ///
    /// Same filter as [`CollisionSystem::ground_height`], but the ray starts
    /// only `max_rise` above the point, so floors further overhead are not hit.
    pub fn ground_height_within(&self, position: Vec3, max_rise: f32) -> Option<f32> {
        self.highest_ground_below(position, max_rise.max(0.0))
    }

    fn highest_ground_below(&self, position: Vec3, rise: f32) -> Option<f32> {
        let ray = Ray::new(
            Vec3::new(position.x, position.y + rise, position.z),
            Vec3::new(0.0, -1.0, 0.0),
        );

        self.triangles
            .iter()
            .filter(|triangle| triangle.normal().y >= GROUND_NORMAL_MIN_Y)
            .filter_map(|triangle| triangle.intersect_ray(&ray))
            .map(|t| ray.point_at(t).y)
            .fold(None, |highest: Option<f32>, y| Some(highest.map_or(y, |h| h.max(y))))
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYER_RADIUS, DEFAULT_PLAYER_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::VERTEX_STRIDE;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[derive(Default)]
    struct Soup {
        vertices: Vec<f32>,
        indices: Vec<u32>,
    }

    impl Soup {
        fn triangle(mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Self {
            for p in [a, b, c] {
                let index = (self.vertices.len() / VERTEX_STRIDE) as u32;
                self.vertices.extend_from_slice(&[p[0], p[1], p[2], 0.0, 0.0, 0.0, 1.0, 0.0]);
                self.indices.push(index);
            }
            self
        }

        /// Upward-facing floor triangle at height `y`
        fn floor(self, y: f32) -> Self {
            self.triangle([-1.0, y, -1.0], [0.0, y, 1.0], [1.0, y, -1.0])
        }
    }

    impl TriangleSource for Soup {
        fn vertex_data(&self) -> &[f32] {
            &self.vertices
        }

        fn index_data(&self) -> &[u32] {
            &self.indices
        }
    }

    fn system_with(soup: &Soup) -> CollisionSystem {
        let mut system = CollisionSystem::default();
        system.load_mesh_collision(soup).unwrap();
        system
    }

    #[test]
    fn test_defaults() {
        let system = CollisionSystem::default();
        assert_eq!(system.player().radius(), 0.3);
        assert_eq!(system.player().height(), 1.8);
        assert_eq!(system.triangle_count(), 0);
    }

    #[test]
    fn test_load_replaces_previous_geometry() {
        let mut system = system_with(&Soup::default().floor(0.0).floor(3.0));
        assert_eq!(system.triangle_count(), 2);

        let count = system.load_mesh_collision(&Soup::default().floor(1.0)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(system.triangle_count(), 1);
        assert_eq!(system.triangles()[0].v0.y, 1.0);
    }

    #[test]
    fn test_failed_load_keeps_previous_geometry() {
        let mut system = system_with(&Soup::default().floor(0.0));

        let mut broken = Soup::default().floor(2.0);
        broken.indices[1] = 42;
        assert!(system.load_mesh_collision(&broken).is_err());
        assert_eq!(system.triangle_count(), 1);
        assert_eq!(system.triangles()[0].v0.y, 0.0);
    }

    #[test]
    fn test_resolve_pushes_sphere_out_of_floor() {
        // Vertex order as given: the face normal points down, which must not
        // matter for push-out because the contact normal follows the sphere.
        let soup = Soup::default().triangle([-1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 0.0, 1.0]);
        let system = system_with(&soup);

        let attempted = Vec3::new(0.0, -0.7, 0.0);
        let corrected = system.resolve_collision(Vec3::zeros(), attempted);

        let center_y = corrected.y + system.player().height() * 0.5;
        assert!(center_y >= system.player().radius() - EPSILON, "sphere center at {}", center_y);
        assert_relative_eq!(corrected, Vec3::new(0.0, -0.6, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_positional_resolve_tunnels_through_long_fall() {
        let system = system_with(&Soup::default().floor(0.0));
        let attempted = Vec3::new(0.0, -10.0, 0.0);
        assert_eq!(system.resolve_collision(Vec3::zeros(), attempted), attempted);
    }

    #[test]
    fn test_substepped_resolve_stops_long_fall_at_floor() {
        let system = system_with(&Soup::default().floor(0.0)).with_substep_length(Some(0.15));

        let resolution = system.resolve(Vec3::zeros(), Vec3::new(0.0, -10.0, 0.0));
        let center_y = resolution.position.y + system.player().height() * 0.5;

        assert_relative_eq!(center_y, system.player().radius(), epsilon = EPSILON);
        assert!(resolution.corrections > 0);
    }

    #[test]
    fn test_resolve_is_idempotent_when_clear() {
        let system = system_with(&Soup::default().floor(0.0));
        let standing = Vec3::new(0.2, 0.0, -0.1);
        let resolution = system.resolve(standing, standing);

        assert_eq!(resolution.position, standing);
        assert_eq!(resolution.corrections, 0);
        assert_eq!(resolution.passes, 1);
    }

    #[test]
    fn test_resolve_without_geometry_accepts_move() {
        let system = CollisionSystem::default();
        let attempted = Vec3::new(3.0, -2.0, 1.0);
        assert_eq!(system.resolve_collision(Vec3::zeros(), attempted), attempted);
    }

    #[test]
    fn test_wall_pushes_horizontally() {
        // Wall in the plane x = 1 facing -X, tall enough to cover mid-height
        let soup = Soup::default().triangle([1.0, -5.0, -5.0], [1.0, 5.0, 0.0], [1.0, -5.0, 5.0]);
        let system = system_with(&soup);

        let corrected = system.resolve_collision(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.9, 0.0, 0.0));
        assert_relative_eq!(corrected, Vec3::new(0.7, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_multiple_passes_settle_wedge() {
        // Floor at y = 0 followed by a sloped overhang whose push-out has a
        // downward component: a single greedy pass leaves the sphere back
        // inside the floor, repeated passes converge towards the wedge.
        let soup = Soup::default()
            .triangle([-2.0, 0.0, -2.0], [0.0, 0.0, 2.0], [2.0, 0.0, -2.0])
            .triangle([-2.0, -1.075, -3.0], [-2.0, -1.075, 3.0], [2.0, 1.925, 0.0]);

        let single = system_with(&soup);
        let multi = system_with(&soup).with_max_passes(8);

        let attempted = Vec3::new(0.0, -0.8, 0.0);
        let one_pass = single.resolve(attempted, attempted);
        let settled = multi.resolve(attempted, attempted);

        assert_eq!(one_pass.passes, 1);
        assert_eq!(one_pass.corrections, 2);
        assert_eq!(settled.passes, 8);

        let residual = |system: &CollisionSystem, position: Vec3| {
            let sphere = system.player().sphere_at(position);
            system
                .triangles()
                .iter()
                .filter_map(|t| t.intersect_sphere(&sphere))
                .map(|c| c.depth)
                .fold(0.0_f32, f32::max)
        };

        let single_residual = residual(&single, one_pass.position);
        let settled_residual = residual(&multi, settled.position);
        assert_relative_eq!(single_residual, 0.16, epsilon = 1e-3);
        assert!(settled_residual < 0.02, "residual {}", settled_residual);
    }

    #[test]
    fn test_ground_height_on_floor() {
        let system = system_with(&Soup::default().floor(0.0));

        let height = system.ground_height(Vec3::new(0.0, 5.0, 0.0)).expect("floor below");
        assert_relative_eq!(height, 0.0, epsilon = 1e-3);

        assert!(system.ground_height(Vec3::new(5.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn test_ground_height_ignores_downward_wound_floor() {
        let soup = Soup::default().triangle([-1.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 0.0, 1.0]);
        let system = system_with(&soup);
        assert!(system.ground_height(Vec3::new(0.0, 5.0, 0.0)).is_none());
    }

    #[test]
    fn test_ground_height_picks_highest_floor() {
        let system = system_with(&Soup::default().floor(0.0).floor(3.0).floor(-2.0));

        let height = system.ground_height(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert_relative_eq!(height, 3.0, epsilon = 1e-3);

        // Floors overhead count too: the ray starts far above the point
        let height = system.ground_height(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_relative_eq!(height, 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ground_height_within_skips_floors_overhead() {
        let system = system_with(&Soup::default().floor(0.0).floor(3.0).floor(-2.0));

        let height = system.ground_height_within(Vec3::new(0.0, 0.1, 0.0), 0.5).unwrap();
        assert_relative_eq!(height, 0.0, epsilon = 1e-3);

        // A floor within reach above the point is still found
        let height = system.ground_height_within(Vec3::new(0.0, 2.7, 0.0), 0.5).unwrap();
        assert_relative_eq!(height, 3.0, epsilon = 1e-3);

        let height = system.ground_height_within(Vec3::new(0.0, -1.0, 0.0), 0.5).unwrap();
        assert_relative_eq!(height, -2.0, epsilon = 1e-3);

        assert!(system.ground_height_within(Vec3::new(0.0, -2.5, 0.0), 0.1).is_none());
    }

    #[test]
    fn test_degenerate_triangles_do_not_stall_passes() {
        // Collinear triangle through the sphere center at mid-height
        let soup = Soup::default().triangle([0.0, 0.9, 0.0], [1.0, 0.9, 0.0], [2.0, 0.9, 0.0]);
        let system = system_with(&soup).with_max_passes(5);

        let resolution = system.resolve(Vec3::zeros(), Vec3::zeros());
        assert_eq!(resolution.position, Vec3::zeros());
        assert_eq!(resolution.corrections, 0);
        assert_eq!(resolution.passes, 1);
    }

    #[test]
    fn test_ground_height_ignores_walls_and_steep_slopes() {
        let soup = Soup::default()
            // Vertical wall through the query column
            .triangle([0.0, -1.0, -1.0], [0.0, 1.0, 0.0], [0.0, -1.0, 1.0])
            // 70 degree slope
            .triangle([-1.0, -3.0, -1.0], [-1.0, 2.5, 1.0], [1.0, -3.0, -1.0]);
        let system = system_with(&soup);

        for tri in system.triangles() {
            assert!(tri.normal().y < GROUND_NORMAL_MIN_Y);
        }
        assert!(system.ground_height(Vec3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_from_config() {
        let config = CollisionConfig {
            player_radius: 0.5,
            player_height: 2.0,
            max_passes: 0,
            substep_length: Some(-1.0),
            strict_index_count: true,
        };
        let mut system = CollisionSystem::from_config(&config);
        assert_eq!(system.player(), PlayerVolume::new(0.5, 2.0));

        let mut soup = Soup::default().floor(0.0);
        soup.indices.push(0);
        assert!(system.load_mesh_collision(&soup).is_err());

        // max_passes is clamped to one, substep ignored
        let resolution = system.resolve(Vec3::zeros(), Vec3::zeros());
        assert_eq!(resolution.passes, 1);
    }
}
