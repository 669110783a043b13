//! In-memory page used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::binder::Command;
use crate::error::HostError;
use crate::host::{
    Handler, MediaEvent, Page, PlayableElement, ReadySource, ReadyState, ToggleControl,
};

fn refused(event: &str) -> HostError {
    HostError::Listener {
        event: event.to_string(),
        reason: "refused by test".to_string(),
    }
}

#[derive(Default)]
struct ControlState {
    id: Option<String>,
    classes: BTreeMap<String, usize>,
    handlers: Vec<Handler>,
    bound: bool,
}

#[derive(Clone)]
pub struct FakeControl(Rc<RefCell<ControlState>>);

impl PartialEq for FakeControl {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl FakeControl {
    pub fn activate(&self) {
        let mut handlers = std::mem::take(&mut self.0.borrow_mut().handlers);
        for handler in handlers.iter_mut() {
            handler();
        }
        self.0.borrow_mut().handlers = handlers;
    }

    pub fn activation_count(&self) -> usize {
        self.0.borrow().handlers.len()
    }

    /// Times the class appears in the class list.
    pub fn class_count(&self, class: &str) -> usize {
        self.0.borrow().classes.get(class).copied().unwrap_or(0)
    }
}

impl ToggleControl for FakeControl {
    fn describe(&self) -> String {
        match &self.0.borrow().id {
            Some(id) => format!("button#{id}"),
            None => "button".to_string(),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_count(class) > 0
    }

    fn set_class(&self, class: &str, present: bool) {
        let mut state = self.0.borrow_mut();
        if present {
            state.classes.insert(class.to_string(), 1);
        } else {
            state.classes.remove(class);
        }
    }

    fn on_activate(&self, handler: Handler) -> Result<(), HostError> {
        self.0.borrow_mut().handlers.push(handler);
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.0.borrow().bound
    }

    fn mark_bound(&self) {
        self.0.borrow_mut().bound = true;
    }
}

struct MediaState {
    paused: bool,
    ended: bool,
    refuse: bool,
    bound: bool,
    commands: Vec<Command>,
    handlers: HashMap<MediaEvent, Vec<Handler>>,
}

#[derive(Clone)]
pub struct FakeMedia(Rc<RefCell<MediaState>>);

impl PartialEq for FakeMedia {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("FakeMedia")
            .field("paused", &state.paused)
            .field("ended", &state.ended)
            .finish()
    }
}

impl FakeMedia {
    pub fn emit(&self, event: MediaEvent) {
        let mut handlers = self
            .0
            .borrow_mut()
            .handlers
            .remove(&event)
            .unwrap_or_default();
        for handler in handlers.iter_mut() {
            handler();
        }
        self.0.borrow_mut().handlers.insert(event, handlers);
    }

    /// Playback reached the end of the track.
    pub fn finish(&self) {
        self.0.borrow_mut().ended = true;
    }

    pub fn commands(&self) -> Vec<Command> {
        self.0.borrow().commands.clone()
    }

    pub fn listener_count(&self, event: MediaEvent) -> usize {
        self.0.borrow().handlers.get(&event).map_or(0, Vec::len)
    }

    pub fn refuse_listeners(&self) {
        self.0.borrow_mut().refuse = true;
    }
}

impl PlayableElement for FakeMedia {
    fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }

    fn is_ended(&self) -> bool {
        self.0.borrow().ended
    }

    fn play(&self) {
        let mut state = self.0.borrow_mut();
        state.paused = false;
        state.ended = false;
        state.commands.push(Command::Play);
    }

    fn pause(&self) {
        let mut state = self.0.borrow_mut();
        state.paused = true;
        state.commands.push(Command::Pause);
    }

    fn on_event(&self, event: MediaEvent, handler: Handler) -> Result<(), HostError> {
        let mut state = self.0.borrow_mut();
        if state.refuse {
            return Err(refused(event.as_str()));
        }
        state.handlers.entry(event).or_default().push(handler);
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.0.borrow().bound
    }

    fn mark_bound(&self) {
        self.0.borrow_mut().bound = true;
    }
}

enum Node {
    Control(FakeControl),
    Wrapper,
    Media(FakeMedia),
}

/// Flat list of sibling nodes in document order.
#[derive(Default)]
pub struct FakePage {
    nodes: RefCell<Vec<Node>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control(&self, id: Option<&str>) -> FakeControl {
        let control = FakeControl(Rc::new(RefCell::new(ControlState {
            id: id.map(str::to_string),
            ..ControlState::default()
        })));
        self.nodes.borrow_mut().push(Node::Control(control.clone()));
        control
    }

    pub fn wrapper(&self) {
        self.nodes.borrow_mut().push(Node::Wrapper);
    }

    pub fn media(&self) -> FakeMedia {
        let media = FakeMedia(Rc::new(RefCell::new(MediaState {
            paused: true,
            ended: false,
            refuse: false,
            bound: false,
            commands: Vec::new(),
            handlers: HashMap::new(),
        })));
        self.nodes.borrow_mut().push(Node::Media(media.clone()));
        media
    }

    fn position_of_media(&self, media: &FakeMedia) -> Option<usize> {
        self.nodes
            .borrow()
            .iter()
            .position(|node| matches!(node, Node::Media(m) if m == media))
    }
}

impl Page for FakePage {
    type Control = FakeControl;
    type Media = FakeMedia;

    fn control_by_id(&self, id: &str) -> Option<FakeControl> {
        self.nodes.borrow().iter().find_map(|node| match node {
            Node::Control(c) if c.0.borrow().id.as_deref() == Some(id) => Some(c.clone()),
            _ => None,
        })
    }

    fn playable_elements(&self, selector: &str) -> Result<Vec<FakeMedia>, HostError> {
        if selector != "audio" {
            return Ok(Vec::new());
        }
        Ok(self
            .nodes
            .borrow()
            .iter()
            .filter_map(|node| match node {
                Node::Media(m) => Some(m.clone()),
                _ => None,
            })
            .collect())
    }

    fn preceding_control(&self, media: &FakeMedia, offset: usize) -> Option<FakeControl> {
        let index = self.position_of_media(media)?.checked_sub(offset)?;
        match self.nodes.borrow().get(index)? {
            Node::Control(c) => Some(c.clone()),
            _ => None,
        }
    }

    fn following_media(&self, control: &FakeControl) -> Option<FakeMedia> {
        let nodes = self.nodes.borrow();
        let index = nodes
            .iter()
            .position(|node| matches!(node, Node::Control(c) if c == control))?;
        match nodes.get(index + 1)? {
            Node::Media(m) => Some(m.clone()),
            _ => None,
        }
    }
}

/// Document whose loading is finished by hand.
pub struct FakeDocument {
    state: Cell<ReadyState>,
    refuse: Cell<bool>,
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl FakeDocument {
    pub fn new(state: ReadyState) -> Self {
        Self {
            state: Cell::new(state),
            refuse: Cell::new(false),
            pending: RefCell::new(Vec::new()),
        }
    }

    pub fn refuse_listeners(&self) {
        self.refuse.set(true);
    }

    pub fn pending_listeners(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Fire content-loaded. One-shot listeners are dropped after running.
    pub fn finish_loading(&self) {
        self.state.set(ReadyState::Interactive);
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        for callback in pending {
            callback();
        }
    }
}

impl ReadySource for FakeDocument {
    fn ready_state(&self) -> ReadyState {
        self.state.get()
    }

    fn on_content_loaded_once(&self, callback: Box<dyn FnOnce()>) -> Result<(), HostError> {
        if self.refuse.get() {
            return Err(refused("DOMContentLoaded"));
        }
        self.pending.borrow_mut().push(callback);
        Ok(())
    }
}
