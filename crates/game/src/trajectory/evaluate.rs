use std::f32::consts::PI;

use glam::Vec3;

use super::{Trajectory, TrajectoryKind};

/// Gravity applied to the `Gravity` kinds. Physics objects scale it by mass.
#[derive(Debug, Clone, Copy)]
struct GravityScale {
    gravity: f32,
    mass: Option<f32>,
}

impl GravityScale {
    fn full(self) -> f32 {
        match self.mass {
            Some(mass) => self.gravity * mass,
            None => self.gravity,
        }
    }

    fn water(self) -> f32 {
        match self.mass {
            Some(mass) => self.gravity * (mass * 0.5),
            None => self.gravity * 0.5,
        }
    }
}

impl Trajectory {
    pub fn evaluate(&self, at_time: i32, gravity: f32) -> Vec3 {
        self.position(at_time, GravityScale { gravity, mass: None })
    }

    pub fn evaluate_delta(&self, at_time: i32, gravity: f32) -> Vec3 {
        self.velocity(at_time, GravityScale { gravity, mass: None })
    }

    /// Position for physics-driven objects whose fall rate scales with `mass`.
    pub fn evaluate_with_mass(&self, at_time: i32, gravity: f32, mass: f32) -> Vec3 {
        self.position(
            at_time,
            GravityScale {
                gravity,
                mass: Some(mass),
            },
        )
    }

    pub fn evaluate_delta_with_mass(&self, at_time: i32, gravity: f32, mass: f32) -> Vec3 {
        self.velocity(
            at_time,
            GravityScale {
                gravity,
                mass: Some(mass),
            },
        )
    }

    fn seconds_since_origin(&self, at_time: i32) -> f32 {
        (at_time - self.time) as f32 * 0.001
    }

    fn sine_phase(&self, at_time: i32) -> f32 {
        let delta_time = (at_time - self.time) as f32 / self.duration as f32;
        delta_time * PI * 2.0
    }

    fn position(&self, at_time: i32, scale: GravityScale) -> Vec3 {
        match self.kind {
            TrajectoryKind::Stationary | TrajectoryKind::Interpolate => self.base,
            TrajectoryKind::Linear => self.base + self.delta * self.seconds_since_origin(at_time),
            TrajectoryKind::Sine => self.base + self.delta * self.sine_phase(at_time).sin(),
            TrajectoryKind::LinearStop => {
                let at_time = at_time.min(self.time + self.duration);
                let delta_time = self.seconds_since_origin(at_time).max(0.0);
                self.base + self.delta * delta_time
            }
            TrajectoryKind::Gravity => {
                let delta_time = self.seconds_since_origin(at_time);
                let mut result = self.base + self.delta * delta_time;
                result.z -= 0.5 * scale.full() * delta_time * delta_time;
                result
            }
            TrajectoryKind::GravityWater => {
                let delta_time = self.seconds_since_origin(at_time);
                let mut result = self.base + self.delta * delta_time;
                result.z -= 0.5 * scale.water() * delta_time * delta_time;
                result
            }
            TrajectoryKind::Rotating => {
                let delta_time = if self.time > 0 {
                    self.time as f32 * 0.001
                } else if self.time < 0 {
                    (at_time + self.time) as f32 * 0.001
                } else {
                    self.seconds_since_origin(at_time)
                };
                self.base + self.delta * delta_time
            }
        }
    }

    fn velocity(&self, at_time: i32, scale: GravityScale) -> Vec3 {
        match self.kind {
            TrajectoryKind::Stationary | TrajectoryKind::Interpolate => Vec3::ZERO,
            TrajectoryKind::Linear | TrajectoryKind::Rotating => self.delta,
            TrajectoryKind::Sine => self.delta * (self.sine_phase(at_time).cos() * 0.5),
            TrajectoryKind::LinearStop => {
                if at_time > self.time + self.duration {
                    Vec3::ZERO
                } else {
                    self.delta
                }
            }
            TrajectoryKind::Gravity => {
                let mut result = self.delta;
                result.z -= scale.full() * self.seconds_since_origin(at_time);
                result
            }
            TrajectoryKind::GravityWater => {
                let mut result = self.delta;
                result.z -= scale.water() * self.seconds_since_origin(at_time);
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAVITY: f32 = 800.0;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn stationary_and_interpolate_hold_base() {
        let base = Vec3::new(1.0, 2.0, 3.0);
        for tr in [
            Trajectory::stationary(base),
            Trajectory::interpolate(base, Vec3::new(50.0, 0.0, 0.0)),
        ] {
            assert_eq!(tr.evaluate(12345, GRAVITY), base);
            assert_eq!(tr.evaluate_delta(12345, GRAVITY), Vec3::ZERO);
        }
    }

    #[test]
    fn linear_at_origin_time_is_base() {
        let tr = Trajectory::linear(1000, Vec3::new(10.0, 0.0, 0.0), Vec3::new(100.0, 0.0, -50.0));
        assert_eq!(tr.evaluate(1000, GRAVITY), tr.base);
        assert_eq!(tr.evaluate_delta(1000, GRAVITY), tr.delta);
        assert!(close(tr.evaluate(1500, GRAVITY), Vec3::new(60.0, 0.0, -25.0)));
    }

    #[test]
    fn linear_stop_clamps_to_window() {
        let tr = Trajectory::linear_stop(1000, 500, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(tr.evaluate(1000, GRAVITY), Vec3::ZERO);
        assert_eq!(tr.evaluate(900, GRAVITY), Vec3::ZERO);
        assert!(close(tr.evaluate(1250, GRAVITY), Vec3::new(25.0, 0.0, 0.0)));
        assert!(close(tr.evaluate(5000, GRAVITY), Vec3::new(50.0, 0.0, 0.0)));

        assert_eq!(tr.evaluate_delta(1500, GRAVITY), tr.delta);
        assert_eq!(tr.evaluate_delta(1501, GRAVITY), Vec3::ZERO);
    }

    #[test]
    fn sine_oscillates_around_base() {
        let tr = Trajectory::sine(0, 1000, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 8.0));
        assert!(close(tr.evaluate(0, GRAVITY), tr.base));
        assert!(close(tr.evaluate(250, GRAVITY), Vec3::new(0.0, 0.0, 18.0)));
        assert!(close(tr.evaluate(750, GRAVITY), Vec3::new(0.0, 0.0, 2.0)));
        assert!(close(tr.evaluate_delta(0, GRAVITY), Vec3::new(0.0, 0.0, 4.0)));
        assert!(close(tr.evaluate_delta(500, GRAVITY), Vec3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn gravity_falls_quadratically() {
        let tr = Trajectory::gravity(0, Vec3::new(0.0, 0.0, 100.0), Vec3::new(10.0, 0.0, 0.0));
        assert!(close(tr.evaluate(1000, GRAVITY), Vec3::new(10.0, 0.0, -300.0)));
        assert!(close(tr.evaluate_delta(1000, GRAVITY), Vec3::new(10.0, 0.0, -800.0)));
    }

    #[test]
    fn gravity_water_halves_gravity() {
        let tr = Trajectory::gravity_water(0, Vec3::ZERO, Vec3::ZERO);
        assert!(close(tr.evaluate(1000, GRAVITY), Vec3::new(0.0, 0.0, -200.0)));
        assert!(close(tr.evaluate_delta(1000, GRAVITY), Vec3::new(0.0, 0.0, -400.0)));
    }

    #[test]
    fn mass_scales_gravity() {
        let tr = Trajectory::gravity(0, Vec3::ZERO, Vec3::ZERO);
        assert!(close(
            tr.evaluate_with_mass(1000, GRAVITY, 2.0),
            Vec3::new(0.0, 0.0, -800.0)
        ));
        assert!(close(
            tr.evaluate_delta_with_mass(1000, GRAVITY, 0.5),
            Vec3::new(0.0, 0.0, -400.0)
        ));

        let water = Trajectory::gravity_water(0, Vec3::ZERO, Vec3::ZERO);
        assert!(close(
            water.evaluate_with_mass(1000, GRAVITY, 2.0),
            Vec3::new(0.0, 0.0, -400.0)
        ));
    }

    #[test]
    fn rotating_time_sign_selects_elapsed() {
        let rate = Vec3::new(0.0, 90.0, 0.0);

        let fixed = Trajectory::rotating(2000, Vec3::ZERO, rate);
        assert!(close(fixed.evaluate(99999, GRAVITY), Vec3::new(0.0, 180.0, 0.0)));

        let offset = Trajectory::rotating(-1000, Vec3::ZERO, rate);
        assert!(close(offset.evaluate(3000, GRAVITY), Vec3::new(0.0, 180.0, 0.0)));

        let running = Trajectory::rotating(0, Vec3::ZERO, rate);
        assert!(close(running.evaluate(1000, GRAVITY), Vec3::new(0.0, 90.0, 0.0)));
        assert_eq!(running.evaluate_delta(1000, GRAVITY), rate);
    }
}
