use glam::Vec3;

use crate::event::EntityEvent;

use super::Pmove;
use super::physics::clip_velocity;

const MAX_BUMPS: usize = 4;
const MAX_CLIP_PLANES: usize = 5;

impl Pmove<'_> {
    /// Moves along the velocity for the rest of the frame, clipping against
    /// every plane hit. Returns true if anything was hit.
    pub(super) fn slide_move(&mut self, gravity: bool) -> bool {
        let overclip = self.config.overclip;
        let mut primal_velocity = self.ps.velocity;
        let mut end_velocity = self.ps.velocity;

        if gravity {
            end_velocity.z -= self.ps.gravity as f32 * self.frame.frametime;
            self.ps.velocity.z = (self.ps.velocity.z + end_velocity.z) * 0.5;
            primal_velocity.z = end_velocity.z;
            if self.frame.ground_plane {
                self.ps.velocity = clip_velocity(
                    self.ps.velocity,
                    self.frame.ground_trace.plane_normal,
                    overclip,
                );
            }
        }

        let mut time_left = self.frame.frametime;

        let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
        let mut num_planes = 0;

        // never turn against the ground plane
        if self.frame.ground_plane {
            planes[0] = self.frame.ground_trace.plane_normal;
            num_planes = 1;
        }

        // never turn against the original velocity
        planes[num_planes] = self.ps.velocity.normalize_or_zero();
        num_planes += 1;

        let mut bump_count = 0;
        while bump_count < MAX_BUMPS {
            let end = self.ps.origin + time_left * self.ps.velocity;
            let trace = self.trace(self.ps.origin, end);

            if trace.all_solid {
                // keep sideways control but don't build up falling speed
                self.ps.velocity.z = 0.0;
                return true;
            }

            if trace.fraction > 0.0 {
                self.ps.origin = trace.end_pos;
            }

            if trace.fraction == 1.0 {
                break;
            }
            bump_count += 1;

            self.add_touch(trace.entity);

            time_left -= time_left * trace.fraction;

            if num_planes >= MAX_CLIP_PLANES {
                self.ps.velocity = Vec3::ZERO;
                return true;
            }

            // same plane as before: nudge out along it
            if planes[..num_planes]
                .iter()
                .any(|plane| trace.plane_normal.dot(*plane) > 0.99)
            {
                self.ps.velocity += trace.plane_normal;
                continue;
            }
            planes[num_planes] = trace.plane_normal;
            num_planes += 1;

            for i in 0..num_planes {
                let into = self.ps.velocity.dot(planes[i]);
                if into >= 0.1 {
                    continue;
                }

                let mut clip = clip_velocity(self.ps.velocity, planes[i], overclip);
                let mut end_clip = clip_velocity(end_velocity, planes[i], overclip);

                for j in 0..num_planes {
                    if j == i || clip.dot(planes[j]) >= 0.1 {
                        continue;
                    }

                    clip = clip_velocity(clip, planes[j], overclip);
                    end_clip = clip_velocity(end_clip, planes[j], overclip);

                    if clip.dot(planes[i]) >= 0.0 {
                        continue;
                    }

                    // slide along the crease
                    let dir = planes[i].cross(planes[j]).normalize_or_zero();
                    clip = dir * dir.dot(self.ps.velocity);
                    end_clip = dir * dir.dot(end_velocity);

                    let third = (0..num_planes)
                        .filter(|&k| k != i && k != j)
                        .any(|k| clip.dot(planes[k]) < 0.1);
                    if third {
                        self.ps.velocity = Vec3::ZERO;
                        return true;
                    }
                }

                self.ps.velocity = clip;
                end_velocity = end_clip;
                break;
            }
        }

        if gravity {
            self.ps.velocity = end_velocity;
        }

        // timers keep their launch velocity
        if self.ps.pm_time != 0 {
            self.ps.velocity = primal_velocity;
        }

        bump_count != 0
    }

    /// Slide, then retry from one step higher and keep whichever result
    /// ends up higher.
    pub(super) fn step_slide_move(&mut self, gravity: bool) {
        let start_origin = self.ps.origin;
        let start_velocity = self.ps.velocity;
        let step = self.config.step_size;

        if !self.slide_move(gravity) {
            return;
        }

        let down = Vec3::new(start_origin.x, start_origin.y, start_origin.z - step);
        let trace = self.trace(start_origin, down);
        if self.ps.velocity.z > 0.0
            && (trace.fraction == 1.0 || trace.plane_normal.z < self.config.min_walk_normal)
        {
            return;
        }

        let down_origin = self.ps.origin;
        let down_velocity = self.ps.velocity;

        let up = Vec3::new(start_origin.x, start_origin.y, start_origin.z + step);
        let trace = self.trace(start_origin, up);
        if trace.all_solid {
            log::trace!("client {}: no room to step up", self.ps.client_num);
            return;
        }

        let step_size = trace.end_pos.z - start_origin.z;
        self.ps.origin = trace.end_pos;
        self.ps.velocity = start_velocity;

        self.slide_move(gravity);

        let origin = self.ps.origin;
        let down = Vec3::new(origin.x, origin.y, origin.z - step_size);
        let trace = self.trace(origin, down);
        if !trace.all_solid {
            self.ps.origin = trace.end_pos;
        }
        if trace.hit_something() {
            self.ps.velocity =
                clip_velocity(self.ps.velocity, trace.plane_normal, self.config.overclip);
        }

        if down_origin.z > self.ps.origin.z {
            self.ps.origin = down_origin;
            self.ps.velocity = down_velocity;
            return;
        }

        let delta = self.ps.origin.z - start_origin.z;
        if let Some(event) = EntityEvent::for_step_height(delta) {
            log::trace!("client {}: stepped {:.1}", self.ps.client_num, delta);
            self.add_event(event);
        }
    }
}
