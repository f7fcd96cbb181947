#![forbid(unsafe_code)]

//! Scoped input listeners.
//!
//! A drag session listens for pointer moves, pointer release, keys and
//! (optionally) focus changes only while it is active. Listeners are acquired
//! from a [`ListenerRegistry`] as a [`ListenerGuard`]; dropping the guard
//! detaches them, so every exit path out of a drag (commit, cancel, editor
//! drop) releases them without bookkeeping at the call site.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use panelwall_core::{Event, PointerEventKind};
use serde::{Deserialize, Serialize};

/// Input channels a listener can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputChannel {
    PointerMove,
    PointerUp,
    Key,
    Focus,
}

impl InputChannel {
    /// Channel an event is delivered on, if any.
    #[must_use]
    pub const fn of(event: &Event) -> Option<Self> {
        match event {
            Event::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Moved => Some(Self::PointerMove),
                PointerEventKind::Up(_) | PointerEventKind::Cancel => Some(Self::PointerUp),
                PointerEventKind::Down(_) => None,
            },
            Event::Key(_) => Some(Self::Key),
            Event::Focus(_) => Some(Self::Focus),
        }
    }
}

#[derive(Debug, Default)]
struct Attached {
    counts: BTreeMap<InputChannel, usize>,
    next_id: u64,
}

/// Reference-counted registry of attached listeners.
///
/// Cloning yields another handle onto the same registry.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Attached>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach listeners on `channels` until the returned guard is dropped.
    #[must_use = "listeners detach as soon as the guard is dropped"]
    pub fn acquire(&self, channels: &[InputChannel]) -> ListenerGuard {
        let mut attached = self.inner.borrow_mut();
        attached.next_id = attached.next_id.wrapping_add(1);
        let id = attached.next_id;
        for channel in channels {
            *attached.counts.entry(*channel).or_default() += 1;
        }
        tracing::debug!(
            target: "panelwall.drag",
            guard_id = id,
            channels = ?channels,
            "attaching input listeners"
        );
        ListenerGuard {
            id,
            channels: channels.to_vec(),
            registry: Rc::clone(&self.inner),
        }
    }

    /// Whether anything listens on `channel`.
    #[must_use]
    pub fn is_listening(&self, channel: InputChannel) -> bool {
        self.count(channel) > 0
    }

    #[must_use]
    pub fn count(&self, channel: InputChannel) -> usize {
        self.inner
            .borrow()
            .counts
            .get(&channel)
            .copied()
            .unwrap_or(0)
    }

    /// Total attached listeners across all channels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.borrow().counts.values().sum()
    }

    /// Channels with at least one listener, in order.
    #[must_use]
    pub fn channels(&self) -> Vec<InputChannel> {
        self.inner
            .borrow()
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(channel, _)| *channel)
            .collect()
    }
}

/// Keeps listeners attached while alive.
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    channels: Vec<InputChannel>,
    registry: Rc<RefCell<Attached>>,
}

impl ListenerGuard {
    #[must_use]
    pub fn channels(&self) -> &[InputChannel] {
        &self.channels
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut attached = self.registry.borrow_mut();
        for channel in &self.channels {
            if let Some(count) = attached.counts.get_mut(channel) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    attached.counts.remove(channel);
                }
            }
        }
        tracing::debug!(
            target: "panelwall.drag",
            guard_id = self.id,
            "detaching input listeners"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelwall_core::{KeyCode, KeyEvent, PointerButton, PointerEvent};

    const DRAG: [InputChannel; 3] = [
        InputChannel::PointerMove,
        InputChannel::PointerUp,
        InputChannel::Key,
    ];

    #[test]
    fn guard_detaches_on_drop() {
        let registry = ListenerRegistry::new();
        {
            let guard = registry.acquire(&DRAG);
            assert_eq!(guard.channels(), &DRAG);
            assert_eq!(registry.total(), 3);
            assert!(registry.is_listening(InputChannel::Key));
            assert!(!registry.is_listening(InputChannel::Focus));
        }
        assert_eq!(registry.total(), 0);
        assert!(registry.channels().is_empty());
    }

    #[test]
    fn overlapping_guards_are_counted() {
        let registry = ListenerRegistry::new();
        let first = registry.acquire(&DRAG);
        let second = registry.acquire(&[InputChannel::Key, InputChannel::Focus]);
        assert_eq!(registry.count(InputChannel::Key), 2);
        drop(first);
        assert_eq!(
            registry.channels(),
            vec![InputChannel::Key, InputChannel::Focus]
        );
        drop(second);
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn clones_share_state() {
        let registry = ListenerRegistry::new();
        let handle = registry.clone();
        let _guard = registry.acquire(&[InputChannel::PointerMove]);
        assert!(handle.is_listening(InputChannel::PointerMove));
    }

    #[test]
    fn events_route_to_channels() {
        assert_eq!(
            InputChannel::of(&Event::Pointer(PointerEvent::moved(0.0, 0.0))),
            Some(InputChannel::PointerMove)
        );
        assert_eq!(
            InputChannel::of(&Event::Pointer(PointerEvent::released(0.0, 0.0))),
            Some(InputChannel::PointerUp)
        );
        assert_eq!(
            InputChannel::of(&Event::Pointer(PointerEvent::new(
                PointerEventKind::Down(PointerButton::Primary),
                0.0,
                0.0
            ))),
            None
        );
        assert_eq!(
            InputChannel::of(&Event::Key(KeyEvent::new(KeyCode::Escape))),
            Some(InputChannel::Key)
        );
        assert_eq!(InputChannel::of(&Event::Focus(false)), Some(InputChannel::Focus));
    }
}
