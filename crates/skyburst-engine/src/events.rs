//! Simulation events for the host (sound, UI)

use serde::Serialize;

/// Something audible or notable happened during a step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SimEvent {
    /// A shell left the ground
    Launch { x: f32 },
    /// A shell exploded into `count` stars
    Burst {
        x: f32,
        y: f32,
        shell: String,
        count: usize,
    },
    /// Crackle stars popped; one event per burst group per step
    Crackle { x: f32, y: f32, count: usize },
}

/// Queue the engine pushes to and the host drains
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<SimEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(SimEvent::Launch { x: 10.0 });
        bus.push(SimEvent::Crackle {
            x: 1.0,
            y: 2.0,
            count: 5,
        });
        assert_eq!(bus.len(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn events_serialize_tagged() {
        let json = serde_json::to_string(&SimEvent::Launch { x: 4.0 }).unwrap();
        assert_eq!(json, r#"{"event":"launch","x":4.0}"#);
    }
}
