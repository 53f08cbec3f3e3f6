//! Diagnostic sink threaded through the analysis passes
//!
//! Every pass takes a `&mut dyn Observer`. Nothing is global: an observer
//! lives exactly as long as the call it is handed to.

use crate::semantic::{BindingKind, ReferenceShape};

/// Where in the source an event happened, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub trait Observer {
    /// Whether the analysis passes should report to this observer at all.
    /// Passes skip locating events nobody will see.
    fn is_enabled(&self) -> bool {
        true
    }

    fn declared(&mut self, _name: &str, _kind: BindingKind, _at: Location) {}

    /// A reference with no binding in this file (global or free variable).
    fn unresolved(&mut self, _name: &str, _at: Location) {}

    fn used(&mut self, _name: &str, _shape: ReferenceShape, _at: Location) {}

    /// `action` is `"annotate"` or `"remove"`.
    fn edited(&mut self, _name: &str, _action: &'static str, _at: Location) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn is_enabled(&self) -> bool {
        false
    }
}

/// Forwards events to `tracing` under the `sweep` target.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver {
    filename: String,
}

impl TracingObserver {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl Observer for TracingObserver {
    fn is_enabled(&self) -> bool {
        tracing::enabled!(target: "sweep", tracing::Level::TRACE)
    }

    fn declared(&mut self, name: &str, kind: BindingKind, at: Location) {
        tracing::trace!(
            target: "sweep",
            file = %self.filename,
            name,
            ?kind,
            line = at.line,
            column = at.column,
            "declared"
        );
    }

    fn unresolved(&mut self, name: &str, at: Location) {
        tracing::trace!(
            target: "sweep",
            file = %self.filename,
            name,
            line = at.line,
            "unresolved reference"
        );
    }

    fn used(&mut self, name: &str, shape: ReferenceShape, at: Location) {
        tracing::trace!(
            target: "sweep",
            file = %self.filename,
            name,
            ?shape,
            line = at.line,
            "used"
        );
    }

    fn edited(&mut self, name: &str, action: &'static str, at: Location) {
        tracing::debug!(
            target: "sweep",
            file = %self.filename,
            name,
            action,
            line = at.line,
            column = at.column,
            "rewrote declaration"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    Declared {
        name: String,
        kind: BindingKind,
        line: usize,
    },
    Unresolved {
        name: String,
        line: usize,
    },
    Used {
        name: String,
        shape: ReferenceShape,
        line: usize,
    },
    Edited {
        name: String,
        action: &'static str,
        line: usize,
    },
}

/// Keeps every event in order; used by tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ObserverEvent::Used { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn unresolved_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ObserverEvent::Unresolved { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn declared(&mut self, name: &str, kind: BindingKind, at: Location) {
        self.events.push(ObserverEvent::Declared {
            name: name.to_string(),
            kind,
            line: at.line,
        });
    }

    fn unresolved(&mut self, name: &str, at: Location) {
        self.events.push(ObserverEvent::Unresolved {
            name: name.to_string(),
            line: at.line,
        });
    }

    fn used(&mut self, name: &str, shape: ReferenceShape, at: Location) {
        self.events.push(ObserverEvent::Used {
            name: name.to_string(),
            shape,
            line: at.line,
        });
    }

    fn edited(&mut self, name: &str, action: &'static str, at: Location) {
        self.events.push(ObserverEvent::Edited {
            name: name.to_string(),
            action,
            line: at.line,
        });
    }
}
