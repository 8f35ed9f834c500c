mod command;
mod prediction;
mod think;
mod tick;

pub use command::{Buttons, CommandBuffer, CommandError, PendingCommand, UserCommand};
pub use prediction::{CMD_BACKUP, ClientPrediction};
pub use think::{ClientSession, ThinkContext, ThinkOutcome, ThinkSettings, client_think};
pub use tick::{BroadcastEvent, ClientSlot, FixedTimestep, ServerSimulation};
