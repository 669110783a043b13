//! Seam between the binder and the page it runs in.
//!
//! The browser implementation lives in `web`; tests drive the binder through
//! an in-memory page.

use crate::error::HostError;

/// Listener callback. Lives for the rest of the page.
pub type Handler = Box<dyn FnMut()>;

/// Media notifications the binder subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    Play,
    Playing,
    Pause,
    Ended,
}

impl MediaEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaEvent::Play => "play",
            MediaEvent::Playing => "playing",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
        }
    }
}

/// Document parsing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn is_queryable(self) -> bool {
        !matches!(self, ReadyState::Loading)
    }
}

/// Element that toggles playback and carries the playing class.
pub trait ToggleControl: Clone + PartialEq + 'static {
    /// Short label for logs, e.g. `button#playpause`.
    fn describe(&self) -> String;
    fn has_class(&self, class: &str) -> bool;
    fn set_class(&self, class: &str, present: bool);
    fn on_activate(&self, handler: Handler) -> Result<(), HostError>;
    /// Whether an activation listener was already attached by a previous bind.
    fn is_bound(&self) -> bool;
    fn mark_bound(&self);
}

/// Host media element: read state, issue commands, subscribe to events.
pub trait PlayableElement: Clone + PartialEq + 'static {
    fn is_paused(&self) -> bool;
    fn is_ended(&self) -> bool;
    /// Fire-and-forget; the outcome arrives later as media events.
    fn play(&self);
    fn pause(&self);
    fn on_event(&self, event: MediaEvent, handler: Handler) -> Result<(), HostError>;
    /// Whether state listeners were already attached by a previous bind.
    fn is_bound(&self) -> bool;
    fn mark_bound(&self);
}

/// Queries over the loaded document.
pub trait Page {
    type Control: ToggleControl;
    type Media: PlayableElement;

    fn control_by_id(&self, id: &str) -> Option<Self::Control>;

    /// Every playable element in document order, snapshot at call time.
    fn playable_elements(&self, selector: &str) -> Result<Vec<Self::Media>, HostError>;

    /// The control `offset` sibling nodes before `media`, if that node is an element.
    fn preceding_control(&self, media: &Self::Media, offset: usize) -> Option<Self::Control>;

    /// The next element sibling of `control`, if it is playable.
    fn following_media(&self, control: &Self::Control) -> Option<Self::Media>;
}

/// Something that reports document readiness and can notify once loaded.
pub trait ReadySource {
    fn ready_state(&self) -> ReadyState;
    fn on_content_loaded_once(&self, callback: Box<dyn FnOnce()>) -> Result<(), HostError>;
}
