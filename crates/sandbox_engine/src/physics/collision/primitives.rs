//! Primitive collision shapes and intersection algorithms
//!
//! Provides the geometric building blocks of the collision system: rays,
//! spheres and triangles, plus the three narrow-phase tests built on them
//! (closest point on triangle, sphere vs triangle, ray vs triangle).
//! Everything here is a pure function of its inputs.

use crate::foundation::math::Vec3;

/// Determinant tolerance for the Möller-Trumbore test; also the minimum
/// accepted ray parameter
pub const RAY_EPSILON: f32 = 1e-7;

/// Distance below which the sphere center is treated as lying on the
/// triangle, so the face normal is used as push-out direction
pub const CONTACT_NORMAL_EPSILON: f32 = 1e-4;

/// Squared cross-product length below which a triangle counts as zero-area
const DEGENERATE_AREA_EPSILON: f32 = 1e-12;

/// A ray for ray casting
///
/// The direction is stored as given. Hit distances are measured in units of
/// `direction`'s length, so they are world distances only for unit directions.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (not required to be normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Penetration of a sphere into a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereContact {
    /// Unit push-out direction, pointing from the surface towards the sphere center
    pub normal: Vec3,
    /// Penetration depth (strictly positive)
    pub depth: f32,
    /// Closest point on the triangle to the sphere center
    pub point: Vec3,
}

/// A triangle of the static collision mesh
///
/// The face normal is computed once at construction from the winding order
/// `(v1 - v0) x (v2 - v0)`; it is never re-oriented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
    normal: Vec3,
}

impl Triangle {
    /// Creates a new triangle and precomputes its face normal
    ///
    /// A zero-area triangle gets a zero normal.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(f32::MIN_POSITIVE)
            .unwrap_or_else(Vec3::zeros);
        Self { v0, v1, v2, normal }
    }

    /// Unit face normal (zero for degenerate triangles)
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Whether the triangle has (approximately) zero area
    pub fn is_degenerate(&self) -> bool {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm_squared() <= DEGENERATE_AREA_EPSILON
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Get the closest point on the triangle to a given point
    ///
    /// Region test from Ericson, *Real-Time Collision Detection* (5.1.5).
    /// The Voronoi regions are checked in a fixed order (v0, v1, edge v0-v1,
    /// v2, edge v0-v2, edge v1-v2, interior); on boundaries the first region
    /// that matches wins. Degenerate triangles return `v0`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        if self.is_degenerate() {
            return self.v0;
        }

        let ab = self.v1 - self.v0;
        let ac = self.v2 - self.v0;

        // Vertex region outside v0
        let ap = point - self.v0;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let bp = point - self.v1;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Edge region v0-v1
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + ab * v;
        }

        // Vertex region outside v2
        let cp = point - self.v2;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge region v0-v2
        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + ac * w;
        }

        // Edge region v1-v2
        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Interior: barycentric combination
        let denom = 1.0 / (va + vb + vc);
        if !denom.is_finite() {
            return self.v0;
        }
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + ab * v + ac * w
    }

    /// Test a sphere against this triangle
    ///
    /// Reports a contact when the closest point on the triangle lies strictly
    /// inside the sphere. The push-out normal points from the closest point to
    /// the sphere center; when the center sits on the triangle (within
    /// [`CONTACT_NORMAL_EPSILON`]) the face normal is used instead.
    ///
    /// Degenerate triangles have no face to push out of and never collide.
    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<SphereContact> {
        if self.is_degenerate() {
            return None;
        }

        let closest = self.closest_point(sphere.center);
        let diff = sphere.center - closest;
        let dist_sq = diff.norm_squared();

        if dist_sq >= sphere.radius * sphere.radius {
            return None;
        }

        let dist = dist_sq.sqrt();
        let normal = if dist > CONTACT_NORMAL_EPSILON {
            diff / dist
        } else {
            self.normal
        };

        Some(SphereContact {
            normal,
            depth: sphere.radius - dist,
            point: closest,
        })
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    ///
    /// Returns the ray parameter `t` of the hit. Rays parallel to the
    /// triangle plane (or hitting a degenerate triangle) and hits at or behind
    /// the origin (`t <= RAY_EPSILON`) are rejected.
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a > -RAY_EPSILON && a < RAY_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > RAY_EPSILON).then_some(t)
    }
}

/// Closest point on `triangle` to `point`; see [`Triangle::closest_point`]
pub fn closest_point_on_triangle(point: Vec3, triangle: &Triangle) -> Vec3 {
    triangle.closest_point(point)
}

/// Sphere-triangle penetration test; see [`Triangle::intersect_sphere`]
pub fn sphere_triangle_collision(sphere: &BoundingSphere, triangle: &Triangle) -> Option<SphereContact> {
    triangle.intersect_sphere(sphere)
}

/// Ray-triangle intersection; see [`Triangle::intersect_ray`]
pub fn ray_triangle_intersection(origin: Vec3, direction: Vec3, triangle: &Triangle) -> Option<f32> {
    triangle.intersect_ray(&Ray::new(origin, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn floor_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
        )
    }

    /// Barycentric coordinates of `p` with respect to `tri` (p assumed in-plane)
    fn barycentric(tri: &Triangle, p: Vec3) -> (f32, f32, f32) {
        let v0 = tri.v1 - tri.v0;
        let v1 = tri.v2 - tri.v0;
        let v2 = p - tri.v0;
        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);
        let denom = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }

    #[test]
    fn test_face_normal_is_unit_and_follows_winding() {
        let tri = floor_triangle();
        assert_relative_eq!(tri.normal().norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(tri.normal(), Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);

        let flipped = Triangle::new(tri.v0, tri.v2, tri.v1);
        assert_relative_eq!(flipped.normal(), Vec3::new(0.0, -1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert!(tri.is_degenerate());
        assert_eq!(tri.normal(), Vec3::zeros());
    }

    #[test]
    fn test_closest_point_vertex_regions() {
        let tri = floor_triangle();
        assert_eq!(tri.closest_point(Vec3::new(-3.0, 1.0, -3.0)), tri.v0);
        assert_eq!(tri.closest_point(Vec3::new(0.0, -2.0, 4.0)), tri.v1);
        assert_eq!(tri.closest_point(Vec3::new(3.0, 5.0, -3.0)), tri.v2);
    }

    #[test]
    fn test_closest_point_edge_regions() {
        let tri = floor_triangle();

        // Edge v0-v2 runs along z = -1
        let on_back_edge = tri.closest_point(Vec3::new(0.25, 2.0, -4.0));
        assert_relative_eq!(on_back_edge, Vec3::new(0.25, 0.0, -1.0), epsilon = EPSILON);

        // Edge v0-v1 from (-1,0,-1) to (0,0,1): point far out to the left
        let left = tri.closest_point(Vec3::new(-2.0, 0.0, 0.5));
        let (u, v, w) = barycentric(&tri, left);
        assert_relative_eq!(w, 0.0, epsilon = EPSILON);
        assert!(u >= -EPSILON && v >= -EPSILON);
    }

    #[test]
    fn test_closest_point_interior_projects_onto_plane() {
        let tri = floor_triangle();
        let closest = tri.closest_point(Vec3::new(0.1, 3.0, -0.2));
        assert_relative_eq!(closest, Vec3::new(0.1, 0.0, -0.2), epsilon = EPSILON);
    }

    #[test]
    fn test_closest_point_stays_inside_triangle() {
        let tri = Triangle::new(
            Vec3::new(0.3, -0.2, 1.0),
            Vec3::new(2.5, 1.0, -0.5),
            Vec3::new(-1.0, 2.0, 0.4),
        );

        for i in -4..=4 {
            for j in -4..=4 {
                for k in -4..=4 {
                    let p = Vec3::new(i as f32 * 0.9, j as f32 * 0.7, k as f32 * 1.1);
                    let q = tri.closest_point(p);
                    let (u, v, w) = barycentric(&tri, q);
                    let tol = 1e-4;
                    assert!(u >= -tol && u <= 1.0 + tol, "u = {} for {:?}", u, p);
                    assert!(v >= -tol && v <= 1.0 + tol, "v = {} for {:?}", v, p);
                    assert!(w >= -tol && w <= 1.0 + tol, "w = {} for {:?}", w, p);
                    assert_relative_eq!(u + v + w, 1.0, epsilon = tol);
                }
            }
        }
    }

    #[test]
    fn test_closest_point_degenerate_returns_vertex() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let closest = tri.closest_point(Vec3::new(0.5, 1.0, 0.0));
        assert!(closest.iter().all(|c| c.is_finite()));
        assert_eq!(closest, tri.v0);
    }

    #[test]
    fn test_sphere_at_vertex_penetrates_by_radius() {
        let tri = floor_triangle();
        let contact = tri
            .intersect_sphere(&BoundingSphere::new(tri.v1, 0.5))
            .expect("sphere centered on a vertex must collide");

        assert_relative_eq!(contact.depth, 0.5, epsilon = EPSILON);
        // Center coincides with the closest point: face normal fallback
        assert_relative_eq!(contact.normal, tri.normal(), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_triangle_never_collides() {
        let tri = Triangle::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert!(tri.intersect_sphere(&BoundingSphere::new(tri.v0, 0.3)).is_none());
        assert!(tri.intersect_sphere(&BoundingSphere::new(Vec3::new(1.0, 0.1, 0.0), 0.3)).is_none());
    }

    #[test]
    fn test_sphere_above_floor_pushes_up() {
        let tri = floor_triangle();
        let contact = tri
            .intersect_sphere(&BoundingSphere::new(Vec3::new(0.0, 0.2, 0.0), 0.3))
            .expect("sphere overlaps the floor");

        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(contact.depth, 0.1, epsilon = EPSILON);
        assert_relative_eq!(contact.point, Vec3::new(0.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_sphere_below_floor_pushes_down() {
        // The contact normal follows the center, not the winding
        let tri = floor_triangle();
        let contact = tri
            .intersect_sphere(&BoundingSphere::new(Vec3::new(0.0, -0.1, 0.0), 0.3))
            .unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, -1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_sphere_touching_is_not_a_collision() {
        let tri = floor_triangle();
        assert!(tri.intersect_sphere(&BoundingSphere::new(Vec3::new(0.0, 0.5, 0.0), 0.5)).is_none());
        assert!(tri.intersect_sphere(&BoundingSphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5)).is_none());
    }

    #[test]
    fn test_ray_hits_facing_triangle() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );

        let t = ray_triangle_intersection(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), &tri)
            .expect("ray aimed at triangle must hit");
        assert_relative_eq!(t, 5.0, epsilon = EPSILON);

        let away = ray_triangle_intersection(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), &tri);
        assert!(away.is_none());
    }

    #[test]
    fn test_ray_parameter_scales_with_direction_length() {
        let tri = floor_triangle();
        let t = ray_triangle_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -2.0, 0.0), &tri).unwrap();
        assert_relative_eq!(t, 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_ray_parallel_and_outside_are_rejected() {
        let tri = floor_triangle();
        let parallel = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tri.intersect_ray(&parallel).is_none());

        let outside = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.intersect_ray(&outside).is_none());
    }

    #[test]
    fn test_ray_starting_on_surface_is_rejected() {
        let tri = floor_triangle();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0));
        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_free_functions_match_methods() {
        let tri = floor_triangle();
        let p = Vec3::new(0.3, 1.0, 0.1);
        assert_eq!(closest_point_on_triangle(p, &tri), tri.closest_point(p));

        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.1, 0.0), 0.3);
        assert_eq!(sphere_triangle_collision(&sphere, &tri), tri.intersect_sphere(&sphere));
    }
}
