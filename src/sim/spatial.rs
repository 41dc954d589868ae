//! Spatial queries against tagged scene bodies
//!
//! Obstacles and hit volumes register themselves at scene construction and
//! are looked up by tag. Ray casts run over the bodies of the requested tags
//! only, with no caching between calls.

use glam::Vec3;

/// What a body is, for filtering ray queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Wall,
    Character,
    CirclingCharacter,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        use crate::consts::*;
        match self {
            Tag::Wall => TAG_WALL,
            Tag::Character => TAG_CHARACTER,
            Tag::CirclingCharacter => TAG_CIRCLING_CHARACTER,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        use crate::consts::*;
        match s {
            TAG_WALL => Some(Tag::Wall),
            TAG_CHARACTER => Some(Tag::Character),
            TAG_CIRCLING_CHARACTER => Some(Tag::CirclingCharacter),
            _ => None,
        }
    }
}

/// Stable handle to a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

/// A single triangle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Geometric face normal from the winding (unit length, or zero if degenerate)
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }
}

/// Collision geometry of a body
#[derive(Debug, Clone)]
pub enum Shape {
    /// Static double-sided triangle soup with a bounding box for early reject
    TriangleMesh {
        triangles: Vec<Triangle>,
        min: Vec3,
        max: Vec3,
    },
    /// Axis-aligned box
    Aabb { center: Vec3, half_extents: Vec3 },
}

impl Shape {
    pub fn mesh(triangles: Vec<Triangle>) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for tri in &triangles {
            for p in [tri.a, tri.b, tri.c] {
                min = min.min(p);
                max = max.max(p);
            }
        }
        Shape::TriangleMesh { triangles, min, max }
    }

    pub fn aabb(center: Vec3, half_extents: Vec3) -> Self {
        Shape::Aabb {
            center,
            half_extents,
        }
    }
}

/// One ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    pub tag: Tag,
    /// Distance along the (normalized) ray
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal, when the shape defines one. Not oriented toward the ray.
    pub normal: Option<Vec3>,
}

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    tag: Tag,
    shape: Shape,
}

/// Registry of scene bodies answering ray queries
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    bodies: Vec<Body>,
    next_handle: u32,
}

const EPSILON: f32 = 1e-6;

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body; returns its handle
    pub fn register(&mut self, tag: Tag, shape: Shape) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.push(Body { handle, tag, shape });
        log::debug!("Registered {} body {:?}", tag.as_str(), handle);
        handle
    }

    /// Handles of every body with `tag`, in registration order
    pub fn query(&self, tag: Tag) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies
            .iter()
            .filter(move |b| b.tag == tag)
            .map(|b| b.handle)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn shape(&self, handle: BodyHandle) -> Option<&Shape> {
        self.bodies
            .iter()
            .find(|b| b.handle == handle)
            .map(|b| &b.shape)
    }

    /// Move a box body. Returns false for unknown handles and mesh bodies.
    pub fn set_center(&mut self, handle: BodyHandle, position: Vec3) -> bool {
        match self.bodies.iter_mut().find(|b| b.handle == handle) {
            Some(Body {
                shape: Shape::Aabb { center, .. },
                ..
            }) => {
                *center = position;
                true
            }
            _ => false,
        }
    }

    /// Cast a ray against bodies whose tag is in `tags`.
    ///
    /// Hits are ordered by ascending distance. `direction` need not be
    /// normalized; a zero direction yields no hits.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, tags: &[Tag]) -> Vec<RayHit> {
        self.cast_ray_filtered(origin, direction, tags, None)
    }

    /// Like `cast_ray`, skipping the body `exclude`
    pub fn cast_ray_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        tags: &[Tag],
        exclude: Option<BodyHandle>,
    ) -> Vec<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for body in &self.bodies {
            if !tags.contains(&body.tag) || Some(body.handle) == exclude {
                continue;
            }
            match &body.shape {
                Shape::TriangleMesh {
                    triangles,
                    min,
                    max,
                } => {
                    if ray_aabb_intersect(origin, dir, *min, *max).is_none() {
                        continue;
                    }
                    for tri in triangles {
                        if let Some(t) = ray_triangle_intersect(origin, dir, tri) {
                            let normal = tri.normal();
                            hits.push(RayHit {
                                body: body.handle,
                                tag: body.tag,
                                distance: t,
                                point: origin + dir * t,
                                normal: (normal != Vec3::ZERO).then_some(normal),
                            });
                        }
                    }
                }
                Shape::Aabb {
                    center,
                    half_extents,
                } => {
                    let min = *center - *half_extents;
                    let max = *center + *half_extents;
                    if let Some(t) = ray_aabb_intersect(origin, dir, min, max) {
                        let point = origin + dir * t;
                        hits.push(RayHit {
                            body: body.handle,
                            tag: body.tag,
                            distance: t,
                            point,
                            normal: Some(aabb_surface_normal(point, min, max)),
                        });
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit only
    pub fn cast_ray_nearest(
        &self,
        origin: Vec3,
        direction: Vec3,
        tags: &[Tag],
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        self.cast_ray_filtered(origin, direction, tags, exclude)
            .into_iter()
            .next()
    }
}

/// Moller-Trumbore ray/triangle test, double sided.
///
/// Returns the distance along `dir` (assumed normalized) for hits in front of
/// the origin.
pub fn ray_triangle_intersect(origin: Vec3, dir: Vec3, tri: &Triangle) -> Option<f32> {
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        // Ray parallel to the triangle plane
        return None;
    }
    let inv_det = 1.0 / det;

    let s = origin - tri.a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Slab-method ray/box test.
///
/// Returns the entry distance, or the exit distance when the origin is inside.
pub fn ray_aabb_intersect(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * if d.is_sign_negative() { -1.0 } else { 1.0 }
        }
    };
    let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

    let t1 = (min - origin) * inv_dir;
    let t2 = (max - origin) * inv_dir;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward normal of the box face nearest to `point`
pub fn aabb_surface_normal(point: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    let center = (min + max) * 0.5;
    let half = ((max - min) * 0.5).max(Vec3::splat(EPSILON));
    let n = (point - center) / half;
    let a = n.abs();

    if a.x >= a.y && a.x >= a.z {
        Vec3::new(n.x.signum(), 0.0, 0.0)
    } else if a.y >= a.z {
        Vec3::new(0.0, n.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, n.z.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A vertical wall quad in the plane x = `x`, spanning z in [-10, 10], y in [0, 10]
    fn wall_at_x(x: f32) -> Shape {
        let a = Vec3::new(x, 0.0, -10.0);
        let b = Vec3::new(x, 0.0, 10.0);
        let c = Vec3::new(x, 10.0, -10.0);
        let d = Vec3::new(x, 10.0, 10.0);
        Shape::mesh(vec![Triangle::new(a, c, b), Triangle::new(c, d, b)])
    }

    #[test]
    fn test_triangle_hit_from_both_sides() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        );
        let t = ray_triangle_intersect(Vec3::ZERO, Vec3::Z, &tri).unwrap();
        assert!((t - 5.0).abs() < 1e-5);

        let t = ray_triangle_intersect(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, &tri).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_behind_origin_missed() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -5.0),
            Vec3::new(1.0, -1.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        );
        assert!(ray_triangle_intersect(Vec3::ZERO, Vec3::Z, &tri).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray_missed() {
        let tri = Triangle::new(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 3.0),
        );
        assert!(ray_triangle_intersect(Vec3::ZERO, Vec3::Z, &tri).is_none());
    }

    #[test]
    fn test_aabb_from_outside_and_inside() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, min, max).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let t = ray_aabb_intersect(Vec3::ZERO, Vec3::Z, min, max).unwrap();
        assert!((t - 1.0).abs() < 1e-5);

        assert!(ray_aabb_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, min, max).is_none());
        assert!(ray_aabb_intersect(Vec3::new(3.0, 0.0, -5.0), Vec3::Z, min, max).is_none());
    }

    #[test]
    fn test_aabb_surface_normal_faces() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);
        assert_eq!(aabb_surface_normal(Vec3::new(1.0, 0.2, 0.1), min, max), Vec3::X);
        assert_eq!(aabb_surface_normal(Vec3::new(0.0, -1.0, 0.3), min, max), -Vec3::Y);
        assert_eq!(aabb_surface_normal(Vec3::new(0.1, 0.2, -1.0), min, max), -Vec3::Z);
    }

    #[test]
    fn test_cast_ray_sorted_and_filtered() {
        let mut index = SpatialIndex::new();
        let far = index.register(Tag::Wall, wall_at_x(8.0));
        let near = index.register(Tag::Wall, wall_at_x(3.0));
        let npc = index.register(
            Tag::CirclingCharacter,
            Shape::aabb(Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5)),
        );

        let origin = Vec3::new(0.0, 1.0, 0.0);
        let hits = index.cast_ray(origin, Vec3::X, &[Tag::Wall]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].body, near);
        assert_eq!(hits[1].body, far);
        assert!((hits[0].distance - 3.0).abs() < 1e-5);
        assert!((hits[0].point - Vec3::new(3.0, 1.0, 0.0)).length() < 1e-5);
        let n = hits[0].normal.unwrap();
        assert!((n.x.abs() - 1.0).abs() < 1e-5);

        let hits = index.cast_ray(origin, Vec3::X, &[Tag::Wall, Tag::CirclingCharacter]);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[1].body, npc);
        assert_eq!(hits[1].normal, Some(-Vec3::X));

        let hits = index.cast_ray_filtered(
            origin,
            Vec3::X,
            &[Tag::Wall, Tag::CirclingCharacter],
            Some(near),
        );
        assert_eq!(hits[0].body, npc);
    }

    #[test]
    fn test_unnormalized_direction_reports_true_distance() {
        let mut index = SpatialIndex::new();
        index.register(Tag::Wall, wall_at_x(4.0));
        let hit = index
            .cast_ray_nearest(Vec3::new(0.0, 1.0, 0.0), Vec3::X * 10.0, &[Tag::Wall], None)
            .unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_hits_nothing() {
        let mut index = SpatialIndex::new();
        index.register(Tag::Wall, wall_at_x(1.0));
        assert!(index.cast_ray(Vec3::ZERO, Vec3::ZERO, &[Tag::Wall]).is_empty());
    }

    #[test]
    fn test_query_by_tag_and_move_box() {
        let mut index = SpatialIndex::new();
        let wall = index.register(Tag::Wall, wall_at_x(3.0));
        let player = index.register(
            Tag::Character,
            Shape::aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5)),
        );

        assert_eq!(index.query(Tag::Wall).collect::<Vec<_>>(), vec![wall]);
        assert_eq!(index.query(Tag::Character).collect::<Vec<_>>(), vec![player]);
        assert_eq!(index.query(Tag::CirclingCharacter).count(), 0);

        assert!(index.set_center(player, Vec3::new(0.0, 1.0, 10.0)));
        assert!(!index.set_center(wall, Vec3::ZERO));

        let hit = index
            .cast_ray_nearest(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, &[Tag::Character], None)
            .unwrap();
        assert!((hit.distance - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_tag_names_round_trip() {
        for tag in [Tag::Wall, Tag::Character, Tag::CirclingCharacter] {
            assert_eq!(Tag::from_str(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_str("missile"), None);
    }
}
