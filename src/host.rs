use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;

use crate::surface::ContainerBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PointerLeave,
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer position in client coordinates.
    PointerMove(Vec2),
    PointerLeave,
    Scroll,
    Resize,
}

impl HostEvent {
    pub fn kind(self) -> EventKind {
        match self {
            Self::PointerMove(_) => EventKind::PointerMove,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::Scroll => EventKind::Scroll,
            Self::Resize => EventKind::Resize,
        }
    }
}

/// What a backdrop needs from the environment it is mounted in.
pub trait Host {
    fn container_box(&self) -> ContainerBox;
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self) -> FrameId;
    /// Revoke a requested frame. Unknown or already-fired ids are ignored.
    fn cancel_frame(&mut self, frame: FrameId);
    fn add_listener(&mut self, kind: EventKind) -> ListenerId;
    fn remove_listener(&mut self, listener: ListenerId);
}

/// In-memory host: frames fire in request order when the caller pumps them.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    container: ContainerBox,
    next_id: u64,
    frames: VecDeque<FrameId>,
    listeners: BTreeMap<ListenerId, EventKind>,
}

impl HeadlessHost {
    pub fn new(container: ContainerBox) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    pub fn set_container(&mut self, container: ContainerBox) {
        self.container = container;
    }

    /// Pop the oldest pending frame, as a display refresh would.
    pub fn next_frame(&mut self) -> Option<FrameId> {
        self.frames.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for HeadlessHost {
    fn container_box(&self) -> ContainerBox {
        self.container
    }

    fn request_frame(&mut self) -> FrameId {
        let frame = FrameId(self.allocate());
        self.frames.push_back(frame);
        frame
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|&f| f != frame);
    }

    fn add_listener(&mut self, kind: EventKind) -> ListenerId {
        let listener = ListenerId(self.allocate());
        self.listeners.insert(listener, kind);
        listener
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }
}
