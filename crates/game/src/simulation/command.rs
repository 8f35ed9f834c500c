use std::collections::VecDeque;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u32 {
        const ATTACK = 1;
        const ATTACK2 = 2;
        const USE = 4;
        const FORWARD = 8;
        const LEFT = 16;
        const BACK = 32;
        const RIGHT = 64;
        const JUMP = 128;
        const CROUCH = 256;
    }
}

impl Buttons {
    pub const MOVEMENT: Self = Self::FORWARD
        .union(Self::LEFT)
        .union(Self::BACK)
        .union(Self::RIGHT)
        .union(Self::JUMP)
        .union(Self::CROUCH);
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown button bits {0:#x}")]
    UnknownButtons(u32),
    #[error("command for client {0} out of range")]
    ClientOutOfRange(u16),
}

/// One frame of player input, stamped with the server time it should run to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserCommand {
    pub server_time: i32,
    /// Pitch and yaw in 16-bit angle units.
    pub angles: [i32; 2],
    pub buttons: Buttons,
}

impl UserCommand {
    pub fn new(server_time: i32, angles: [i32; 2], buttons: Buttons) -> Self {
        Self {
            server_time,
            angles,
            buttons,
        }
    }

    /// Decodes a command arriving off the wire, rejecting undefined bits.
    pub fn from_raw(
        server_time: i32,
        angles: [i32; 2],
        buttons: u32,
    ) -> Result<Self, CommandError> {
        let buttons = Buttons::from_bits(buttons).ok_or(CommandError::UnknownButtons(
            buttons & !Buttons::all().bits(),
        ))?;
        Ok(Self::new(server_time, angles, buttons))
    }

    pub fn forward_move(&self) -> i8 {
        axis(self.buttons, Buttons::FORWARD, Buttons::BACK)
    }

    pub fn right_move(&self) -> i8 {
        axis(self.buttons, Buttons::RIGHT, Buttons::LEFT)
    }

    pub fn up_move(&self) -> i8 {
        axis(self.buttons, Buttons::JUMP, Buttons::CROUCH)
    }

    pub fn held(&self, buttons: Buttons) -> bool {
        self.buttons.contains(buttons)
    }
}

fn axis(buttons: Buttons, positive: Buttons, negative: Buttons) -> i8 {
    match (buttons.contains(positive), buttons.contains(negative)) {
        (true, false) => 127,
        (false, true) => -127,
        _ => 0,
    }
}

#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub client: u16,
    pub command: UserCommand,
}

/// Commands waiting for the server tick that covers their time. Ordered by
/// server time, oldest dropped first when full.
pub struct CommandBuffer {
    commands: VecDeque<PendingCommand>,
    max_size: usize,
}

impl CommandBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    pub fn push(&mut self, client: u16, command: UserCommand) {
        if self.commands.len() >= self.max_size {
            self.commands.pop_front();
        }
        let at = self
            .commands
            .iter()
            .rposition(|pending| pending.command.server_time <= command.server_time)
            .map_or(0, |index| index + 1);
        self.commands.insert(at, PendingCommand { client, command });
    }

    pub fn drain_until(&mut self, server_time: i32) -> Vec<PendingCommand> {
        let mut result = Vec::new();
        while self
            .commands
            .front()
            .is_some_and(|pending| pending.command.server_time <= server_time)
        {
            result.extend(self.commands.pop_front());
        }
        result
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn remove_client(&mut self, client: u16) {
        self.commands.retain(|pending| pending.client != client);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
