use serde::{Deserialize, Serialize};

use super::types::EntityEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u32,
    pub event: EntityEvent,
    pub parm: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct EventSlot {
    event: EntityEvent,
    parm: i32,
}

/// Fixed ring of the most recent predictable events.
///
/// Every push advances the sequence number; once the ring is full the oldest
/// slot is overwritten. Readers remember the last sequence they consumed and
/// ask for everything after it, losing whatever was overwritten meanwhile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictableEvents {
    slots: [Option<EventSlot>; Self::CAPACITY],
    sequence: u32,
    entity_sequence: u32,
    external: Option<EventSlot>,
}

impl Default for PredictableEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictableEvents {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self {
            slots: [None; Self::CAPACITY],
            sequence: 0,
            entity_sequence: 0,
            external: None,
        }
    }

    pub fn push(&mut self, event: EntityEvent, parm: i32) -> u32 {
        let sequence = self.sequence;
        self.slots[Self::slot(sequence)] = Some(EventSlot { event, parm });
        self.sequence = self.sequence.wrapping_add(1);
        sequence
    }

    /// Sequence number the next pushed event will receive.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn get(&self, sequence: u32) -> Option<EventRecord> {
        let oldest = self.oldest_retained();
        if !sequence_lte(oldest, sequence) || !sequence_lt(sequence, self.sequence) {
            return None;
        }
        self.slots[Self::slot(sequence)].map(|slot| EventRecord {
            sequence,
            event: slot.event,
            parm: slot.parm,
        })
    }

    /// Events pushed at or after `sequence` that are still in the ring.
    pub fn since(&self, sequence: u32) -> impl Iterator<Item = EventRecord> + '_ {
        let oldest = self.oldest_retained();
        let mut next = if sequence_lt(sequence, oldest) {
            oldest
        } else {
            sequence
        };
        std::iter::from_fn(move || {
            while sequence_lt(next, self.sequence) {
                let record = self.get(next);
                next = next.wrapping_add(1);
                if record.is_some() {
                    return record;
                }
            }
            None
        })
    }

    pub fn latest(&self) -> Option<EventRecord> {
        self.get(self.sequence.wrapping_sub(1))
    }

    pub fn set_external(&mut self, event: EntityEvent, parm: i32) {
        self.external = Some(EventSlot { event, parm });
    }

    pub fn clear_external(&mut self) {
        self.external = None;
    }

    /// Picks the event the owning entity broadcasts this frame.
    ///
    /// An external event always wins. Otherwise the next untransmitted
    /// predictable event is returned with the low two bits of its sequence in
    /// bits 8-9 of the code so repeats of the same event are distinguishable.
    /// A cursor that fell too far behind skips the overwritten events.
    pub fn next_entity_event(&mut self) -> Option<(u16, i32)> {
        if let Some(external) = self.external {
            return Some((external.event.code() as u16, external.parm));
        }

        if !sequence_lt(self.entity_sequence, self.sequence) {
            return None;
        }

        let oldest = self.oldest_retained();
        if sequence_lt(self.entity_sequence, oldest) {
            self.entity_sequence = oldest;
        }

        let slot = self.slots[Self::slot(self.entity_sequence)];
        let bits = ((self.entity_sequence & 3) << 8) as u16;
        self.entity_sequence = self.entity_sequence.wrapping_add(1);
        slot.map(|slot| (slot.event.code() as u16 | bits, slot.parm))
    }

    pub fn entity_sequence(&self) -> u32 {
        self.entity_sequence
    }

    fn oldest_retained(&self) -> u32 {
        self.sequence.wrapping_sub(Self::CAPACITY as u32)
    }

    fn slot(sequence: u32) -> usize {
        sequence as usize & (Self::CAPACITY - 1)
    }
}

fn sequence_lte(a: u32, b: u32) -> bool {
    let diff = b.wrapping_sub(a);
    diff < u32::MAX / 2
}

fn sequence_lt(a: u32, b: u32) -> bool {
    a != b && sequence_lte(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequences() {
        let mut events = PredictableEvents::new();
        assert_eq!(events.push(EntityEvent::Jump, 0), 0);
        assert_eq!(events.push(EntityEvent::Footstep, 0), 1);
        assert_eq!(events.sequence(), 2);
        assert_eq!(events.latest().map(|r| r.event), Some(EntityEvent::Footstep));
    }

    #[test]
    fn overflow_overwrites_oldest() {
        let mut events = PredictableEvents::new();
        events.push(EntityEvent::Jump, 0);
        events.push(EntityEvent::Footstep, 0);
        events.push(EntityEvent::FallShort, 0);

        assert_eq!(events.get(0), None);
        let seen: Vec<_> = events.since(0).map(|r| r.event).collect();
        assert_eq!(seen, vec![EntityEvent::Footstep, EntityEvent::FallShort]);
    }

    #[test]
    fn since_skips_consumed() {
        let mut events = PredictableEvents::new();
        events.push(EntityEvent::WaterTouch, 0);
        let mark = events.sequence();
        events.push(EntityEvent::WaterLeave, 7);

        let seen: Vec<_> = events.since(mark).collect();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].event, EntityEvent::WaterLeave);
        assert_eq!(seen[0].parm, 7);
        assert_eq!(events.since(events.sequence()).count(), 0);
    }

    #[test]
    fn entity_event_catches_up() {
        let mut events = PredictableEvents::new();
        for _ in 0..5 {
            events.push(EntityEvent::Footstep, 0);
        }

        let (code, _) = events.next_entity_event().unwrap();
        assert_eq!(code & 0xff, EntityEvent::Footstep.code() as u16);
        assert_eq!(code >> 8, 3);
        assert!(events.next_entity_event().is_some());
        assert!(events.next_entity_event().is_none());
        assert_eq!(events.entity_sequence(), 5);
    }

    #[test]
    fn external_event_takes_priority() {
        let mut events = PredictableEvents::new();
        events.push(EntityEvent::Jump, 0);
        events.set_external(EntityEvent::NoAmmo, 3);

        assert_eq!(
            events.next_entity_event(),
            Some((EntityEvent::NoAmmo.code() as u16, 3))
        );
        events.clear_external();
        assert_eq!(
            events.next_entity_event(),
            Some((EntityEvent::Jump.code() as u16, 0))
        );
    }
}
