//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use ftthmap_core::{Dataset, FilterAction, FilterState};

use crate::screen::ScreenId;

/// Viewport movement on the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pan {
    North,
    South,
    East,
    West,
}

#[derive(Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data ──
    /// The data bridge finished loading.
    DatasetLoaded(Arc<Dataset>),
    /// Loading failed; the UI stays empty.
    LoadFailed(String),

    // ── Filters ──
    /// A filter transition requested by a key binding.
    Filter(FilterAction),
    /// The filter state after a transition. Broadcast to every screen.
    FilterChanged(FilterState),

    // ── Map viewport ──
    Pan(Pan),
    ZoomIn,
    ZoomOut,
    FitBounds,
}

// Dataset snapshots can be large; keep Debug output to a count.
impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => write!(f, "Quit"),
            Self::Tick => write!(f, "Tick"),
            Self::Render => write!(f, "Render"),
            Self::Resize(w, h) => write!(f, "Resize({w}, {h})"),
            Self::SwitchScreen(id) => write!(f, "SwitchScreen({id})"),
            Self::GoBack => write!(f, "GoBack"),
            Self::ToggleHelp => write!(f, "ToggleHelp"),
            Self::DatasetLoaded(ds) => write!(f, "DatasetLoaded({} entities)", ds.entities.len()),
            Self::LoadFailed(e) => write!(f, "LoadFailed({e})"),
            Self::Filter(a) => write!(f, "Filter({a:?})"),
            Self::FilterChanged(s) => write!(f, "FilterChanged({})", s.describe()),
            Self::Pan(dir) => write!(f, "Pan({dir:?})"),
            Self::ZoomIn => write!(f, "ZoomIn"),
            Self::ZoomOut => write!(f, "ZoomOut"),
            Self::FitBounds => write!(f, "FitBounds"),
        }
    }
}
