use engine::TopicEvent;

use super::registry::{ActorId, ActorState, ZoneSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PortalTopic {
    PlayerDepart,
    PlayerArrive,
    DisplayCount,
}

impl PortalTopic {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PortalTopic::PlayerDepart => "player-depart",
            PortalTopic::PlayerArrive => "player-arrive",
            PortalTopic::DisplayCount => "display-count",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PortalEvent {
    /// Published before the registry mutates; `side` is the side being left.
    Depart { actor_id: ActorId, side: ZoneSide },
    /// The complete post-transfer state.
    Arrive(ActorState),
    DisplayCount(u32),
}

impl TopicEvent for PortalEvent {
    type Topic = PortalTopic;

    fn topic(&self) -> PortalTopic {
        match self {
            PortalEvent::Depart { .. } => PortalTopic::PlayerDepart,
            PortalEvent::Arrive(_) => PortalTopic::PlayerArrive,
            PortalEvent::DisplayCount(_) => PortalTopic::DisplayCount,
        }
    }
}

pub(crate) type PortalBus = engine::EventBus<PortalEvent>;
