use dioxus::prelude::*;

/// Breakpoint at and above which the sidebar starts open.
pub const SIDEBAR_OPEN_MIN_WIDTH: f64 = 1024.0;
/// Below this width tables collapse into cards.
pub const COMPACT_MAX_WIDTH: f64 = 768.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Users,
    Ships,
    Parts,
    ShipEdit(String),
    PartEdit(String),
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Users => "Users",
            Page::Ships => "Ships",
            Page::Parts => "Parts",
            Page::ShipEdit(_) => "Edit Ship",
            Page::PartEdit(_) => "Edit Part",
        }
    }

    /// The list page an edit page returns to.
    pub fn parent(&self) -> Page {
        match self {
            Page::ShipEdit(_) => Page::Ships,
            Page::PartEdit(_) => Page::Parts,
            other => other.clone(),
        }
    }
}

/// Sidebar visibility: unset until the window is measured, then following
/// the viewport until the user toggles it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SidebarState {
    #[default]
    Uninitialized,
    FromViewport(bool),
    UserControlled(bool),
}

impl SidebarState {
    pub fn is_open(self) -> bool {
        match self {
            SidebarState::Uninitialized => false,
            SidebarState::FromViewport(open) | SidebarState::UserControlled(open) => open,
        }
    }

    /// Applies a viewport measurement. Ignored once the user has toggled.
    pub fn observe_width(self, width: f64) -> Self {
        match self {
            SidebarState::UserControlled(_) => self,
            _ => SidebarState::FromViewport(width >= SIDEBAR_OPEN_MIN_WIDTH),
        }
    }

    pub fn toggled(self) -> Self {
        SidebarState::UserControlled(!self.is_open())
    }
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub page: Signal<Page>,
    pub sidebar: Signal<SidebarState>,
    pub viewport_width: Signal<f64>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: use_signal(|| Page::Ships),
            sidebar: use_signal(SidebarState::default),
            viewport_width: use_signal(|| SIDEBAR_OPEN_MIN_WIDTH),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }

    pub fn is_compact(&self) -> bool {
        *self.viewport_width.read() < COMPACT_MAX_WIDTH
    }
}
