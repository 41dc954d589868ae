//! Third-person follow camera

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::state::Transform;
use crate::rotate_y;
use crate::tuning::Tuning;

/// Vertical field of view (degrees)
pub const FOV_Y_DEGREES: f32 = 75.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Distance in front of the origin of the pose used when nothing is followed
const REST_DISTANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowCamera {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Offset from the followed character, in the character's local frame
    pub offset: Vec3,
    /// Height of the rest pose, adjusted by vertical pointer motion
    pub base_height: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Base height change per unit of pointer motion
    pub sensitivity: f32,
}

impl FollowCamera {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            offset: tuning.camera_offset,
            base_height: tuning.camera_base_height,
            min_height: tuning.camera_min_height,
            max_height: tuning.camera_max_height,
            sensitivity: tuning.pointer_sensitivity,
        };
        camera.rest();
        camera
    }

    /// Move the base height opposite to the pointer (moving up raises it)
    pub fn adjust_height(&mut self, pointer_dy: f32) {
        if pointer_dy == 0.0 {
            return;
        }
        self.base_height =
            (self.base_height - pointer_dy * self.sensitivity).clamp(self.min_height, self.max_height);
    }

    /// Track `subject`, or fall back to the rest pose when there is none
    pub fn follow(&mut self, subject: Option<&Transform>) {
        match subject {
            Some(t) => {
                self.position = t.position + rotate_y(self.offset, t.yaw);
                self.target = t.position;
            }
            None => self.rest(),
        }
    }

    fn rest(&mut self) {
        self.position = Vec3::new(0.0, self.base_height, REST_DISTANCE);
        self.target = Vec3::new(0.0, self.base_height, 0.0);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(1e-3), Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_follow_behind_and_above() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        let t = Transform::new(Vec3::new(1.0, 1.0, 2.0), 0.0);
        cam.follow(Some(&t));
        assert!((cam.position - Vec3::new(1.0, 4.0, -3.0)).length() < 1e-5);
        assert_eq!(cam.target, t.position);
    }

    #[test]
    fn test_offset_rotates_with_yaw() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        let t = Transform::new(Vec3::ZERO, std::f32::consts::FRAC_PI_2);
        cam.follow(Some(&t));
        // Facing +X, so the camera sits on -X
        assert!((cam.position - Vec3::new(-5.0, 3.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_height_clamped_to_range() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        assert_eq!(cam.base_height, 2.0);
        cam.adjust_height(-100.0);
        assert!((cam.base_height - 2.5).abs() < 1e-6);
        cam.adjust_height(-10_000.0);
        assert_eq!(cam.base_height, 3.0);
        cam.adjust_height(10_000.0);
        assert_eq!(cam.base_height, 1.0);
    }

    #[test]
    fn test_rest_pose_uses_base_height() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        cam.adjust_height(-200.0);
        cam.follow(None);
        assert!((cam.position - Vec3::new(0.0, 3.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_height_does_not_move_follow_pose() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        let t = Transform::new(Vec3::new(0.0, 1.0, 0.0), 0.0);
        cam.follow(Some(&t));
        let before = cam.position;
        cam.adjust_height(-150.0);
        cam.follow(Some(&t));
        assert_eq!(cam.position, before);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut cam = FollowCamera::from_tuning(&Tuning::default());
        let t = Transform::new(Vec3::new(3.0, 1.0, -7.0), 0.7);
        cam.follow(Some(&t));
        let clip = cam.view_proj(16.0 / 9.0) * t.position.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(clip.w > 0.0);
    }
}
