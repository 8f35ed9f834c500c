use std::collections::VecDeque;

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags};
use crate::event::EventRecord;
use crate::movement::{PmoveOptions, PmoveResult};
use crate::player::{PlayerController, PlayerState, PmType};

use super::UserCommand;

/// Outgoing commands kept for replay.
pub const CMD_BACKUP: usize = 64;
const ERROR_DECAY_MSEC: i32 = 100;
const ERROR_THRESHOLD: f32 = 0.1;

/// Client-side mirror of one player.
///
/// Every outgoing command is run immediately against a local copy of the
/// state. When an authoritative state arrives it replaces the local copy and
/// the commands the server has not executed yet are run again on top of it.
/// Any jump this causes in the view is blended out over a short period.
pub struct ClientPrediction {
    controller: PlayerController,
    commands: VecDeque<UserCommand>,
    predicted: PlayerState,
    predicted_error: Vec3,
    error_time: i32,
    last_event_sequence: u32,
}

impl ClientPrediction {
    pub fn new(controller: PlayerController, initial: PlayerState) -> Self {
        let last_event_sequence = initial.events.sequence();
        Self {
            controller,
            commands: VecDeque::with_capacity(CMD_BACKUP),
            predicted: initial,
            predicted_error: Vec3::ZERO,
            error_time: 0,
            last_event_sequence,
        }
    }

    pub fn predicted_state(&self) -> &PlayerState {
        &self.predicted
    }

    /// Records an outgoing command and predicts its result.
    pub fn push_command(
        &mut self,
        command: UserCommand,
        world: &dyn CollisionWorld,
    ) -> PmoveResult {
        if self.commands.len() == CMD_BACKUP {
            self.commands.pop_front();
        }
        self.commands.push_back(command);

        Self::predict(&self.controller, &mut self.predicted, &command, world)
    }

    /// Replaces the prediction with an authoritative state and replays every
    /// command the server had not run when it produced it.
    pub fn apply_snapshot(
        &mut self,
        authoritative: PlayerState,
        now: i32,
        world: &dyn CollisionWorld,
    ) {
        let old_origin = self.predicted.origin;
        let old_command_time = self.predicted.command_time;

        let acked = authoritative.command_time;
        while self
            .commands
            .front()
            .is_some_and(|command| command.server_time <= acked)
        {
            self.commands.pop_front();
        }

        if self.commands.len() == CMD_BACKUP {
            log::debug!(
                "client {}: command backup exceeded",
                authoritative.client_num
            );
        }

        self.predicted = authoritative;
        for command in &self.commands {
            Self::predict(&self.controller, &mut self.predicted, command, world);
        }

        // only comparable if both predictions ran up to the same command
        if self.predicted.command_time != old_command_time {
            return;
        }

        let delta = old_origin - self.predicted.origin;
        if delta.length() > ERROR_THRESHOLD {
            log::debug!(
                "client {}: prediction miss of {:.2}",
                self.predicted.client_num,
                delta.length()
            );
            self.predicted_error = self.current_error(now) + delta;
            self.error_time = now;
        }
    }

    /// Part of the last correction not yet blended out at `now`.
    pub fn current_error(&self, now: i32) -> Vec3 {
        let elapsed = now - self.error_time;
        if elapsed < 0 || elapsed >= ERROR_DECAY_MSEC {
            return Vec3::ZERO;
        }
        let f = (ERROR_DECAY_MSEC - elapsed) as f32 / ERROR_DECAY_MSEC as f32;
        self.predicted_error * f
    }

    /// Where the view should be drawn at `now`.
    pub fn view_origin(&self, now: i32) -> Vec3 {
        self.predicted.origin + self.current_error(now)
    }

    /// Predicted events not reported before. Events replayed after a
    /// snapshot keep their sequence numbers and are not reported twice.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        let events: Vec<EventRecord> = self
            .predicted
            .events
            .since(self.last_event_sequence)
            .collect();
        self.last_event_sequence = self.predicted.events.sequence();
        events
    }

    /// Commands sent but not yet covered by a snapshot.
    pub fn pending_command_count(&self) -> usize {
        self.commands.len()
    }

    fn predict(
        controller: &PlayerController,
        state: &mut PlayerState,
        command: &UserCommand,
        world: &dyn CollisionWorld,
    ) -> PmoveResult {
        let trace_mask = if state.pm_type == PmType::Dead {
            ContentFlags::MASK_PLAYERSOLID.difference(ContentFlags::BODY)
        } else {
            ContentFlags::MASK_PLAYERSOLID
        };
        let options = PmoveOptions {
            trace_mask,
            ..Default::default()
        };
        controller.advance_with(state, command, world, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EntityEvent;
    use crate::map::{BrushWorld, TestingGround};
    use crate::simulation::Buttons;

    fn setup() -> (ClientPrediction, BrushWorld) {
        let mut state = PlayerState::new(0);
        state.origin = TestingGround::standing_origin(0.0, 0.0, TestingGround::GROUND_Z);
        (
            ClientPrediction::new(PlayerController::default(), state),
            TestingGround::new().build_world(),
        )
    }

    #[test]
    fn commands_are_predicted_immediately() {
        let (mut prediction, world) = setup();

        for time in (16..=160).step_by(16) {
            prediction.push_command(UserCommand::new(time, [0, 0], Buttons::FORWARD), &world);
        }

        assert_eq!(prediction.predicted_state().command_time, 160);
        assert!(prediction.predicted_state().origin.x > 10.0);
        assert_eq!(prediction.pending_command_count(), 10);
    }

    #[test]
    fn matching_snapshot_leaves_no_error() {
        let (mut prediction, world) = setup();
        let mut server_state = prediction.predicted_state().clone();
        let controller = PlayerController::default();

        let commands: Vec<_> = (16..=160)
            .step_by(16)
            .map(|time| UserCommand::new(time, [0, 0], Buttons::FORWARD))
            .collect();
        for command in &commands {
            prediction.push_command(*command, &world);
        }
        for command in &commands[..5] {
            controller.advance(&mut server_state, command, &world);
        }

        let predicted = prediction.predicted_state().clone();
        prediction.apply_snapshot(server_state, 90, &world);

        assert_eq!(prediction.pending_command_count(), 5);
        assert_eq!(prediction.predicted_state().origin, predicted.origin);
        assert_eq!(prediction.current_error(90), Vec3::ZERO);
    }

    #[test]
    fn corrections_decay() {
        let (mut prediction, world) = setup();
        prediction.push_command(UserCommand::new(16, [0, 0], Buttons::empty()), &world);

        let mut server_state = prediction.predicted_state().clone();
        server_state.origin.y += 8.0;
        prediction.apply_snapshot(server_state, 1000, &world);

        assert!((prediction.current_error(1000).y + 8.0).abs() < 1e-3);
        assert!((prediction.current_error(1050).y + 4.0).abs() < 1e-3);
        assert_eq!(prediction.current_error(1100), Vec3::ZERO);
        assert!((prediction.view_origin(1000).y).abs() < 1e-3);
    }

    #[test]
    fn replayed_events_are_not_repeated() {
        let (mut prediction, world) = setup();
        let start = prediction.predicted_state().clone();

        prediction.push_command(UserCommand::new(16, [0, 0], Buttons::JUMP), &world);
        let events = prediction.take_events();
        assert!(events.iter().any(|record| record.event == EntityEvent::Jump));

        prediction.apply_snapshot(start, 0, &world);
        assert!(prediction.take_events().is_empty());
    }
}
