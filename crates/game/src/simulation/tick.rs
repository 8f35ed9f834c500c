use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionWorld;
use crate::event::{EntityState, EventRecord};
use crate::math::angle_vectors;
use crate::player::{
    MAX_CLIENTS, MINS_Z, PLAYER_HALF_WIDTH, PlayerController, PlayerState, STANDING_MAXS_Z,
};
use crate::weapon::AmmoInventory;

use super::CommandBuffer;
use super::think::{ClientSession, ThinkContext, ThinkSettings, client_think};

const COMMAND_BUFFER_SIZE: usize = 1024;
const MELEE_RANGE: f32 = 32.0;

pub struct FixedTimestep {
    tick_rate: u32,
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_rate,
            dt: 1.0 / tick_rate as f32,
            accumulator: 0.0,
        }
    }

    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Length of one tick on the millisecond level clock.
    pub fn dt_msec(&self) -> i32 {
        (self.dt * 1000.0) as i32
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.min(0.25);
    }

    pub fn should_tick(&self) -> bool {
        self.accumulator >= self.dt
    }

    pub fn consume_tick(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }
}

/// An event one client raised, stamped with the level time it was seen at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub client: u16,
    pub level_time: i32,
    pub record: EventRecord,
}

#[derive(Debug, Clone)]
pub struct ClientSlot {
    pub state: PlayerState,
    pub session: ClientSession,
    /// Entity view produced by the most recent think.
    pub entity: Option<EntityState>,
}

/// Authoritative side: owns every connected player and runs their buffered
/// commands against the world once per frame.
pub struct ServerSimulation<W> {
    world: W,
    controller: PlayerController,
    settings: ThinkSettings,
    ammo: AmmoInventory,
    clients: Vec<Option<ClientSlot>>,
    commands: CommandBuffer,
    outbox: Vec<BroadcastEvent>,
    level_time: i32,
}

impl<W: CollisionWorld> ServerSimulation<W> {
    pub fn new(world: W, controller: PlayerController, settings: ThinkSettings) -> Self {
        Self {
            world,
            controller,
            settings,
            ammo: AmmoInventory::new(),
            clients: vec![None; MAX_CLIENTS],
            commands: CommandBuffer::new(COMMAND_BUFFER_SIZE),
            outbox: Vec::new(),
            level_time: 0,
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn settings(&self) -> &ThinkSettings {
        &self.settings
    }

    pub fn ammo_mut(&mut self) -> &mut AmmoInventory {
        &mut self.ammo
    }

    pub fn level_time(&self) -> i32 {
        self.level_time
    }

    /// Places a fresh player in slot `client`, replacing anyone already there.
    ///
    /// # Panics
    ///
    /// If `client` is not below [`MAX_CLIENTS`].
    pub fn connect(
        &mut self,
        client: u16,
        origin: Vec3,
        session: ClientSession,
    ) -> &mut PlayerState {
        let mut state = PlayerState::spawn(client, origin, self.level_time);
        state.gravity = self.settings.gravity;
        state.speed = self.settings.speed;

        log::info!("client {} connected at {:?}", client, origin);
        let slot = self.clients[client as usize].insert(ClientSlot {
            state,
            session,
            entity: None,
        });
        &mut slot.state
    }

    pub fn disconnect(&mut self, client: u16) {
        Self::check_client(client);
        if self.clients[client as usize].take().is_some() {
            log::info!("client {} disconnected", client);
        }
        self.commands.remove_client(client);
        self.ammo.clear_client(client);
    }

    pub fn client(&self, client: u16) -> Option<&ClientSlot> {
        Self::check_client(client);
        self.clients[client as usize].as_ref()
    }

    pub fn client_mut(&mut self, client: u16) -> Option<&mut ClientSlot> {
        Self::check_client(client);
        self.clients[client as usize].as_mut()
    }

    pub fn connected(&self) -> impl Iterator<Item = &ClientSlot> {
        self.clients.iter().flatten()
    }

    pub fn queue_command(&mut self, client: u16, command: super::UserCommand) {
        Self::check_client(client);
        self.commands.push(client, command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Advances the level clock and thinks every buffered command that is now
    /// due. Returns how many commands moved a player.
    pub fn run_frame(&mut self, msec: i32) -> usize {
        self.level_time += msec;

        let mut executed = 0;
        for pending in self.commands.drain_until(self.level_time) {
            let index = pending.client as usize;
            if self.clients[index].is_none() {
                log::warn!("dropping command for empty slot {}", pending.client);
                continue;
            }

            let melee_hit = self.melee_target(pending.client);

            let Some(slot) = self.clients[index].as_mut() else {
                continue;
            };
            let mut ctx = ThinkContext {
                controller: &self.controller,
                world: &self.world,
                settings: &self.settings,
                ammo: &mut self.ammo,
                level_time: self.level_time,
            };

            let Some(outcome) = client_think(
                &mut ctx,
                &mut slot.state,
                &slot.session,
                &pending.command,
                melee_hit,
            ) else {
                continue;
            };

            executed += 1;
            self.outbox
                .extend(outcome.events.into_iter().map(|record| BroadcastEvent {
                    client: pending.client,
                    level_time: self.level_time,
                    record,
                }));
            slot.entity = Some(outcome.entity);
        }

        executed
    }

    /// Events raised since the last call.
    pub fn take_events(&mut self) -> Vec<BroadcastEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Whether another live player stands right in front of `client`'s eyes.
    fn melee_target(&self, client: u16) -> bool {
        let Some(attacker) = &self.clients[client as usize] else {
            return false;
        };
        let state = &attacker.state;
        if !self.controller.weapons().get(state.weapon).is_melee() {
            return false;
        }

        let (forward, _, _) = angle_vectors(state.view_angles);
        let muzzle = state.origin + Vec3::new(0.0, 0.0, state.view_height as f32);
        let point = muzzle + forward * MELEE_RANGE;

        self.connected()
            .filter(|other| other.state.client_num != client && other.state.health > 0)
            .any(|other| {
                let offset = point - other.state.origin;
                offset.x.abs() <= PLAYER_HALF_WIDTH
                    && offset.y.abs() <= PLAYER_HALF_WIDTH
                    && offset.z >= MINS_Z as f32
                    && offset.z <= STANDING_MAXS_Z
            })
    }

    fn check_client(client: u16) {
        assert!(
            (client as usize) < MAX_CLIENTS,
            "client number {client} out of range"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EntityEvent;
    use crate::map::{BrushWorld, TestingGround};
    use crate::simulation::{Buttons, UserCommand};
    use crate::weapon::{AmmoLedger, Weapon};

    fn server() -> ServerSimulation<BrushWorld> {
        ServerSimulation::new(
            TestingGround::new().build_world(),
            PlayerController::default(),
            ThinkSettings::default(),
        )
    }

    fn spot(x: f32, y: f32) -> Vec3 {
        TestingGround::standing_origin(x, y, TestingGround::GROUND_Z)
    }

    #[test]
    fn fixed_timestep_accumulation() {
        let mut ts = FixedTimestep::new(60);

        ts.accumulate(1.0 / 30.0);
        assert!(ts.should_tick());
        assert!(ts.consume_tick());
        assert!(ts.consume_tick());
        assert!(!ts.consume_tick());
        assert_eq!(ts.dt_msec(), 16);
    }

    #[test]
    fn commands_move_the_right_client() {
        let mut server = server();
        server.connect(0, spot(0.0, 0.0), ClientSession::default());
        server.connect(5, spot(-128.0, 0.0), ClientSession::default());

        for time in (16..=320).step_by(16) {
            server.queue_command(5, UserCommand::new(time, [0, 0], Buttons::FORWARD));
        }
        let mut executed = 0;
        for _ in 0..20 {
            executed += server.run_frame(16);
        }

        assert_eq!(executed, 20);
        assert_eq!(server.client(0).unwrap().state.origin, spot(0.0, 0.0));
        assert!(server.client(5).unwrap().state.origin.x > -128.0 + 50.0);
        assert!(server.client(5).unwrap().entity.is_some());
    }

    #[test]
    fn commands_wait_for_their_frame() {
        let mut server = server();
        server.connect(1, spot(0.0, 0.0), ClientSession::default());
        server.queue_command(1, UserCommand::new(100, [0, 0], Buttons::empty()));

        assert_eq!(server.run_frame(50), 0);
        assert_eq!(server.pending_commands(), 1);
        assert_eq!(server.run_frame(50), 1);
        assert_eq!(server.client(1).unwrap().state.command_time, 100);
    }

    #[test]
    fn events_reach_the_outbox() {
        let mut server = server();
        server.connect(2, spot(0.0, 0.0), ClientSession::default());
        server.client_mut(2).unwrap().state.pm_flags = Default::default();

        server.queue_command(2, UserCommand::new(16, [0, 0], Buttons::JUMP));
        server.run_frame(16);

        let events = server.take_events();
        assert!(events
            .iter()
            .any(|e| e.client == 2 && e.record.event == EntityEvent::Jump));
        assert!(server.take_events().is_empty());
    }

    #[test]
    fn disconnect_frees_the_slot() {
        let mut server = server();
        server.connect(3, spot(0.0, 0.0), ClientSession::default());
        server.ammo_mut().set(3, Weapon::Machinegun, 50);
        server.queue_command(3, UserCommand::new(16, [0, 0], Buttons::FORWARD));

        server.disconnect(3);

        assert!(server.client(3).is_none());
        assert_eq!(server.pending_commands(), 0);
        assert_eq!(server.ammo_mut().ammo(3, Weapon::Machinegun), 0);
        assert_eq!(server.connected().count(), 0);
    }

    #[test]
    fn gauntlet_hits_a_player_in_front() {
        let mut server = server();
        let attacker = server.connect(0, spot(0.0, 0.0), ClientSession::default());
        attacker.weapon = Weapon::Gauntlet;
        server.connect(1, spot(40.0, 0.0), ClientSession::default());

        assert!(server.melee_target(0));
        assert!(!server.melee_target(1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_client_panics() {
        let mut server = server();
        server.connect(MAX_CLIENTS as u16, spot(0.0, 0.0), ClientSession::default());
    }
}
