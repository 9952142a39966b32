//! Frame-rate-independent scalar and angle smoothing.

/// Move `current` toward `target` with an exponential approach.
///
/// Equivalent to lerping with factor `1 - exp(-rate * dt)`, so two half-steps
/// equal one full step and convergence speed is independent of tick rate.
pub fn exp_approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

/// Shortest signed angular difference from `current` to `target`, in degrees,
/// in the range (-180, 180].
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Critically-damped angle smoothing in degrees.
///
/// Takes the shorter angular path across the ±180° wrap. `velocity` is the
/// smoothing-internal state in deg/s and must persist between calls;
/// `smooth_time` is roughly the time to cover most of the gap.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Critically-damped spring toward `target` (Game Programming Gems 4 form).
fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    // Padé approximation of exp(-omega * dt), stable for large steps.
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // The spring never overshoots a fixed target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exp_approach_is_framerate_independent() {
        let one_step = exp_approach(0.0, 10.0, 10.0, 0.1);
        let half = exp_approach(0.0, 10.0, 10.0, 0.05);
        let two_steps = exp_approach(half, 10.0, 10.0, 0.05);
        assert_relative_eq!(one_step, two_steps, epsilon = 1e-5);
    }

    #[test]
    fn exp_approach_never_overshoots() {
        let mut v = 0.0;
        for _ in 0..100 {
            let next = exp_approach(v, 5.335, 10.0, 0.3);
            assert!(next >= v && next <= 5.335 + 1e-6);
            v = next;
        }
        assert_relative_eq!(v, 5.335, epsilon = 1e-3);
    }

    #[test]
    fn delta_angle_wraps() {
        assert_relative_eq!(delta_angle(170.0, -170.0), 20.0);
        assert_relative_eq!(delta_angle(-170.0, 170.0), -20.0);
        assert_relative_eq!(delta_angle(0.0, 90.0), 90.0);
        assert_relative_eq!(delta_angle(350.0, 10.0), 20.0);
    }

    #[test]
    fn smooth_damp_angle_converges() {
        let mut current = 0.0;
        let mut velocity = 0.0;
        let dt = 1.0 / 60.0;
        for _ in 0..60 {
            current = smooth_damp_angle(current, 90.0, &mut velocity, 0.12, dt);
        }
        assert!((current - 90.0).abs() < 1.0, "current = {current}");
    }

    #[test]
    fn smooth_damp_angle_takes_short_path_across_wrap() {
        // 170° -> -170° should pass through 180°, not swing back through 0°.
        let mut current = 170.0;
        let mut velocity = 0.0;
        let dt = 1.0 / 60.0;
        for _ in 0..120 {
            let next = smooth_damp_angle(current, -170.0, &mut velocity, 0.12, dt);
            assert!(next >= current - 1e-3, "went the long way: {next}");
            current = next;
        }
        assert!((current - 190.0).abs() < 1.0, "current = {current}");
        assert_relative_eq!(delta_angle(current, -170.0), 0.0, epsilon = 1.0);
    }
}
