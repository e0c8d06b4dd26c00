use crate::routes::{CHAT_ID_PREFIX, HOME_ID};
use crate::signal::Signal;

/// Menu id for a browser path: the first path segment, or `home` at the
/// root. Query strings and fragments are ignored.
#[must_use]
pub fn selected_id_from_path(path: &str) -> String {
    let path_before_query = path.split('?').next().unwrap_or_default();
    let path = path_before_query
        .split('#')
        .next()
        .unwrap_or(path_before_query);
    let segment = path.split('/').nth(1).unwrap_or_default();
    if segment.is_empty() {
        HOME_ID.to_string()
    } else {
        segment.to_string()
    }
}

/// Chat views render edge to edge; everything else keeps the padding.
#[must_use]
pub fn inner_padding_for(id: &str) -> bool {
    !id.starts_with(CHAT_ID_PREFIX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub selection: SelectionState,
    pub is_collapsed: bool,
}

impl NavigationState {
    #[must_use]
    pub fn new(is_collapsed: bool) -> Self {
        Self {
            selection: SelectionState::Unselected,
            is_collapsed,
        }
    }

    /// Selected id, reporting `home` before the first selection.
    #[must_use]
    pub fn selected_id(&self) -> &str {
        match &self.selection {
            SelectionState::Unselected => HOME_ID,
            SelectionState::Selected(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionSynchronizer {
    state: SelectionState,
    inner_padding: Signal<bool>,
}

impl SelectionSynchronizer {
    #[must_use]
    pub fn new(inner_padding: Signal<bool>) -> Self {
        Self {
            state: SelectionState::Unselected,
            inner_padding,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Derives the selection from the URL. Only the first call leaves the
    /// unselected state; later calls return `false` and change nothing.
    pub fn sync_from_path(&mut self, path: &str) -> bool {
        if !matches!(self.state, SelectionState::Unselected) {
            return false;
        }
        let id = selected_id_from_path(path);
        tracing::debug!(path, id = %id, "selection derived from path");
        self.state = SelectionState::Selected(id);
        true
    }

    pub fn select(&mut self, id: &str) {
        self.inner_padding.set(inner_padding_for(id));
        self.state = SelectionState::Selected(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_map_to_ids() {
        let cases = [
            ("/", "home"),
            ("", "home"),
            ("/token", "token"),
            ("/channel/edit/3", "channel"),
            ("/chat/1", "chat"),
            ("/log?page=2", "log"),
            ("/detail#range", "detail"),
            ("//token", "home"),
        ];
        for (path, expected) in cases {
            assert_eq!(selected_id_from_path(path), expected, "path {path}");
        }
    }

    #[test]
    fn mount_selects_once() {
        let mut sync = SelectionSynchronizer::new(Signal::new(true));
        assert_eq!(sync.state(), &SelectionState::Unselected);

        assert!(sync.sync_from_path("/log"));
        assert!(!sync.sync_from_path("/token"));
        assert_eq!(sync.state(), &SelectionState::Selected("log".to_string()));
    }

    #[test]
    fn chat_selection_toggles_inner_padding_both_ways() {
        let padding = Signal::new(true);
        let mut sync = SelectionSynchronizer::new(padding.clone());
        sync.sync_from_path("/token");

        sync.select("chat0");
        assert!(!padding.get());
        assert_eq!(sync.state(), &SelectionState::Selected("chat0".to_string()));

        sync.select("log");
        assert!(padding.get());

        sync.select("chat");
        assert!(!padding.get());

        sync.select("setting");
        assert!(padding.get());
        assert_eq!(padding.revision(), 4);
    }

    #[test]
    fn navigation_state_reports_home_before_selection() {
        let state = NavigationState::new(true);
        assert_eq!(state.selected_id(), "home");
        assert!(state.is_collapsed);
    }
}
