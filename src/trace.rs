//! Structured trace of a resolution
//!
//! The resolver reports each step to an injected [`ResolutionObserver`]
//! instead of writing to a global logger. `TracingObserver` forwards the
//! stream to `tracing`; `RecordingObserver` keeps it for inspection.

use std::sync::Mutex;

use serde::Serialize;

use crate::engine::ResolutionPath;
use crate::model::{OverrideKind, Role};

/// Why a fragment was not merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// No required overlays and the gate policy treats that as unsatisfied
    EmptyGate,
    /// Required overlays that are not active
    MissingOverlays(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolutionEvent {
    Started {
        entity_id: String,
        campaign_id: String,
        active_overlays: Vec<String>,
        role: Role,
    },
    EntityFound {
        entity_id: String,
        entity_type: String,
        name: String,
        core_keys: Vec<String>,
    },
    FragmentApplied {
        index: usize,
        required_overlays: Vec<String>,
        keys: Vec<String>,
    },
    FragmentSkipped {
        index: usize,
        required_overlays: Vec<String>,
        reason: SkipReason,
    },
    OverrideApplied {
        kind: OverrideKind,
    },
    VisibilityFiltered {
        kept: Vec<String>,
        dropped: Vec<String>,
    },
    Completed {
        path: ResolutionPath,
        keys: Vec<String>,
    },
    /// Terminal event when a disable override applies
    Suppressed {
        entity_id: String,
        campaign_id: String,
    },
}

impl ResolutionEvent {
    /// One-line human description
    pub fn describe(&self) -> String {
        match self {
            ResolutionEvent::Started {
                entity_id,
                campaign_id,
                active_overlays,
                role,
            } => format!(
                "Starting resolution for entity_id={} campaign={} role={} active overlays: [{}]",
                entity_id,
                campaign_id,
                role,
                active_overlays.join(", ")
            ),
            ResolutionEvent::EntityFound {
                entity_type,
                name,
                core_keys,
                ..
            } => format!(
                "Found entity: name={} type={}; starting with core_data keys [{}]",
                name,
                entity_type,
                core_keys.join(", ")
            ),
            ResolutionEvent::FragmentApplied {
                index,
                required_overlays,
                keys,
            } => format!(
                "Fragment {} matched: required=[{}] data keys [{}]",
                index,
                required_overlays.join(", "),
                keys.join(", ")
            ),
            ResolutionEvent::FragmentSkipped {
                index,
                required_overlays,
                reason,
            } => {
                let why = match reason {
                    SkipReason::EmptyGate => "empty required_overlays".to_string(),
                    SkipReason::MissingOverlays(missing) => {
                        format!("inactive overlays [{}]", missing.join(", "))
                    }
                };
                format!(
                    "Fragment {} skipped: required=[{}] ({})",
                    index,
                    required_overlays.join(", "),
                    why
                )
            }
            ResolutionEvent::OverrideApplied { kind } => format!("DM override applied: {}", kind),
            ResolutionEvent::VisibilityFiltered { kept, dropped } => format!(
                "Visibility filter kept [{}] dropped [{}]",
                kept.join(", "),
                dropped.join(", ")
            ),
            ResolutionEvent::Completed { path, keys } => format!(
                "Resolution complete ({}). Final data keys: [{}]",
                path,
                keys.join(", ")
            ),
            ResolutionEvent::Suppressed {
                entity_id,
                campaign_id,
            } => format!(
                "Resolution stopped: entity_id={} disabled in campaign={}",
                entity_id, campaign_id
            ),
        }
    }
}

/// Receives resolution events. Must be shareable across threads.
pub trait ResolutionObserver: Send + Sync {
    fn on_event(&self, event: &ResolutionEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {
    fn on_event(&self, _event: &ResolutionEvent) {}
}

/// Forwards events to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn on_event(&self, event: &ResolutionEvent) {
        tracing::debug!(target: "playkit::resolve", "{}", event.describe());
    }
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn into_events(self) -> Vec<ResolutionEvent> {
        self.events
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Render the recorded events, one numbered line each
    pub fn render(&self) -> String {
        self.events()
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{:>2}. {}", i + 1, e.describe()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ResolutionObserver for RecordingObserver {
    fn on_event(&self, event: &ResolutionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Fans events out to two observers
pub struct Tee<'a>(pub &'a dyn ResolutionObserver, pub &'a dyn ResolutionObserver);

impl ResolutionObserver for Tee<'_> {
    fn on_event(&self, event: &ResolutionEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}
