use nalgebra::{Rotation3, Vector3};

const BODY_HALF_WIDTH: f64 = 0.24;
const BODY_HALF_HEIGHT: f64 = 0.05;
const ARM_LENGTH: f64 = 0.8;
const ARM_HALF_THICKNESS: f64 = 0.05;
const RING_RADIUS: f64 = ARM_LENGTH * 1.2;
const RING_SEGMENTS: usize = 36;
const AXIS_LENGTH: f64 = ARM_LENGTH * 0.75;

/// Plot-ready orientation geometry for one attitude. Body and arm vertices
/// are rotated into the current attitude; the ring and the reference axes
/// stay in the world frame so the viewer keeps a fixed sense of "level".
#[derive(Debug, Clone)]
pub struct PoseFrame {
    pub body: Vec<[f64; 3]>,
    pub arm_front: Vec<[f64; 3]>,
    pub arm_back: Vec<[f64; 3]>,
    pub arm_right: Vec<[f64; 3]>,
    pub arm_left: Vec<[f64; 3]>,
    pub ring: Vec<[f64; 3]>,
    pub axis_forward: [[f64; 3]; 2],
    pub axis_right: [[f64; 3]; 2],
}

/// Attitude rotation from Euler angles in degrees, composed yaw (Z) then
/// pitch (Y) then roll (X). Applied to a vector, roll acts first.
pub fn attitude(roll_deg: f64, pitch_deg: f64, yaw_deg: f64) -> Rotation3<f64> {
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), yaw_deg.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), pitch_deg.to_radians());
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), roll_deg.to_radians());
    rz * ry * rx
}

/// Builds the full drone wireframe for the given attitude.
pub fn pose_frame(roll_deg: f64, pitch_deg: f64, yaw_deg: f64) -> PoseFrame {
    let rotation = attitude(roll_deg, pitch_deg, yaw_deg);

    let origin = [0.0, 0.0, 0.0];
    PoseFrame {
        body: rotate_all(&body_vertices(), &rotation),
        arm_front: rotate_all(&arm_vertices(Vector3::new(0.0, 1.0, 0.0)), &rotation),
        arm_back: rotate_all(&arm_vertices(Vector3::new(0.0, -1.0, 0.0)), &rotation),
        arm_right: rotate_all(&arm_vertices(Vector3::new(1.0, 0.0, 0.0)), &rotation),
        arm_left: rotate_all(&arm_vertices(Vector3::new(-1.0, 0.0, 0.0)), &rotation),
        ring: ring_vertices(),
        axis_forward: [origin, [0.0, AXIS_LENGTH, 0.0]],
        axis_right: [origin, [AXIS_LENGTH, 0.0, 0.0]],
    }
}

/// Eight corners of the rectangular center shell, top face first.
fn body_vertices() -> Vec<Vector3<f64>> {
    let w = BODY_HALF_WIDTH;
    let h = BODY_HALF_HEIGHT;
    vec![
        Vector3::new(w, w, h),
        Vector3::new(w, -w, h),
        Vector3::new(-w, -w, h),
        Vector3::new(-w, w, h),
        Vector3::new(w, w, -h),
        Vector3::new(w, -w, -h),
        Vector3::new(-w, -w, -h),
        Vector3::new(-w, w, -h),
    ]
}

/// Thin quad from the hub out along `direction`: root pair then tip pair,
/// upper vertex first in each pair.
fn arm_vertices(direction: Vector3<f64>) -> Vec<Vector3<f64>> {
    let t = ARM_HALF_THICKNESS;
    let tip = direction * ARM_LENGTH;
    vec![
        Vector3::new(0.0, 0.0, t),
        Vector3::new(0.0, 0.0, -t),
        tip + Vector3::new(0.0, 0.0, t),
        tip + Vector3::new(0.0, 0.0, -t),
    ]
}

/// Closed horizontal circle around the hub, in the world frame.
fn ring_vertices() -> Vec<[f64; 3]> {
    (0..=RING_SEGMENTS)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / RING_SEGMENTS as f64;
            [RING_RADIUS * angle.cos(), RING_RADIUS * angle.sin(), 0.0]
        })
        .collect()
}

fn rotate_all(vertices: &[Vector3<f64>], rotation: &Rotation3<f64>) -> Vec<[f64; 3]> {
    vertices
        .iter()
        .map(|v| {
            let r = rotation * v;
            [r.x, r.y, r.z]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: [f64; 3], expected: [f64; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() < 1e-9,
                "{:?} differs from {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_zero_attitude_leaves_geometry_unrotated() {
        let frame = pose_frame(0.0, 0.0, 0.0);

        let expected = body_vertices();
        for (vertex, unrotated) in frame.body.iter().zip(expected.iter()) {
            assert_close(*vertex, [unrotated.x, unrotated.y, unrotated.z]);
        }
        assert_close(frame.arm_front[2], [0.0, ARM_LENGTH, ARM_HALF_THICKNESS]);
    }

    #[test]
    fn test_yaw_90_rotates_front_arm_about_vertical() {
        let frame = pose_frame(0.0, 0.0, 90.0);

        // Front arm tip swings from +Y to -X; height is untouched.
        assert_close(frame.arm_front[2], [-ARM_LENGTH, 0.0, ARM_HALF_THICKNESS]);
        assert_close(frame.arm_right[2], [0.0, ARM_LENGTH, ARM_HALF_THICKNESS]);
    }

    #[test]
    fn test_roll_rotates_about_forward_axis() {
        let rotation = attitude(90.0, 0.0, 0.0);
        let up = rotation * Vector3::new(0.0, 1.0, 0.0);
        assert_close([up.x, up.y, up.z], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_composition_applies_roll_before_yaw() {
        // For v = +Y: roll 90 about X lifts it to +Z, which yaw then leaves
        // on the vertical. The reverse order would land on -X instead.
        let rotation = attitude(90.0, 0.0, 90.0);
        let v = rotation * Vector3::new(0.0, 1.0, 0.0);
        assert_close([v.x, v.y, v.z], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ring_and_axes_stay_fixed() {
        let level = pose_frame(0.0, 0.0, 0.0);
        let banked = pose_frame(45.0, 30.0, 60.0);

        assert_eq!(level.ring, banked.ring);
        assert_eq!(banked.axis_forward, [[0.0, 0.0, 0.0], [0.0, AXIS_LENGTH, 0.0]]);
        assert_eq!(banked.axis_right, [[0.0, 0.0, 0.0], [AXIS_LENGTH, 0.0, 0.0]]);
    }

    #[test]
    fn test_ring_is_closed_and_flat() {
        let ring = ring_vertices();
        assert_eq!(ring.len(), RING_SEGMENTS + 1);
        assert_close(ring[0], *ring.last().unwrap());
        assert!(ring.iter().all(|p| p[2] == 0.0));
    }
}
