use std::cell::Cell;
use std::rc::Rc;

use engine::{HandlerId, OwnerId};
use tracing::info;

use super::events::{PortalBus, PortalEvent, PortalTopic};

/// Read-only listener for the display-count topic. It never publishes and
/// never looks at actor events.
pub(crate) struct DisplayCountBadge {
    bus: Rc<PortalBus>,
    owner: OwnerId,
    handler_id: HandlerId,
    count: Rc<Cell<Option<u32>>>,
}

impl DisplayCountBadge {
    pub(crate) fn attach(bus: Rc<PortalBus>) -> Self {
        let owner = bus.allocate_owner();
        let count = Rc::new(Cell::new(None));
        let sink = Rc::clone(&count);
        let handler_id = bus.subscribe(PortalTopic::DisplayCount, owner, move |event| {
            if let PortalEvent::DisplayCount(value) = event {
                sink.set(Some(*value));
                info!(
                    topic = PortalTopic::DisplayCount.as_str(),
                    count = *value,
                    "display_count_updated"
                );
            }
        });
        Self {
            bus,
            owner,
            handler_id,
            count,
        }
    }

    pub(crate) fn count(&self) -> Option<u32> {
        self.count.get()
    }

    pub(crate) fn label(&self) -> Option<String> {
        self.count().map(|count| format!("users: {count}"))
    }
}

impl Drop for DisplayCountBadge {
    fn drop(&mut self) {
        self.bus.unsubscribe(PortalTopic::DisplayCount, self.handler_id, self.owner);
    }
}
