use crate::preferences::{
    KEY_CHAT_LINK, KEY_ENABLE_DATA_EXPORT, KEY_ENABLE_DRAWING, KEY_ENABLE_TASK, PreferenceStore,
    read_flag, read_non_empty,
};
use crate::role::Role;
use crate::routes::ChatEntry;

pub const CSS_CLASS_NORMAL: &str = "semi-navigation-item-normal";
pub const CSS_CLASS_HIDDEN: &str = "tableHiddle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuIcon {
    Layers,
    Key,
    User,
    Histogram,
    CalendarClock,
    Setting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityClass {
    Normal,
    /// Rendered but suppressed; the entry keeps its layout slot.
    Hidden,
}

impl VisibilityClass {
    #[must_use]
    pub fn from_gate(visible: bool) -> Self {
        if visible { Self::Normal } else { Self::Hidden }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Normal => CSS_CLASS_NORMAL,
            Self::Hidden => CSS_CLASS_HIDDEN,
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    pub label: String,
    pub path: String,
    pub icon: MenuIcon,
    pub visibility: VisibilityClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuGate {
    Always,
    Admin,
    DataExport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItemSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    pub icon: MenuIcon,
    pub gate: MenuGate,
}

/// Tab order users see.
pub const MENU_ITEMS: [MenuItemSpec; 6] = [
    MenuItemSpec {
        id: "channel",
        label: "Channels",
        path: "/channel",
        icon: MenuIcon::Layers,
        gate: MenuGate::Admin,
    },
    MenuItemSpec {
        id: "token",
        label: "Tokens",
        path: "/token",
        icon: MenuIcon::Key,
        gate: MenuGate::Always,
    },
    MenuItemSpec {
        id: "user",
        label: "Users",
        path: "/user",
        icon: MenuIcon::User,
        gate: MenuGate::Admin,
    },
    MenuItemSpec {
        id: "log",
        label: "Logs",
        path: "/log",
        icon: MenuIcon::Histogram,
        gate: MenuGate::Always,
    },
    MenuItemSpec {
        id: "detail",
        label: "Dashboard",
        path: "/detail",
        icon: MenuIcon::CalendarClock,
        gate: MenuGate::DataExport,
    },
    MenuItemSpec {
        id: "setting",
        label: "Settings",
        path: "/setting",
        icon: MenuIcon::Setting,
        gate: MenuGate::Always,
    },
];

/// Every input the menu depends on. A change to any field forces a
/// recomputation in [`MenuResolver`], including fields no gate reads yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuInputs {
    pub data_export_enabled: bool,
    pub drawing_enabled: bool,
    pub task_enabled: bool,
    pub chat_link: Option<String>,
    pub chat_entries: Vec<ChatEntry>,
    pub is_admin: bool,
}

impl MenuInputs {
    pub fn from_store<S: PreferenceStore + ?Sized>(
        store: &S,
        chat_entries: Vec<ChatEntry>,
        role: Role,
    ) -> Self {
        Self {
            data_export_enabled: read_flag(store, KEY_ENABLE_DATA_EXPORT),
            drawing_enabled: read_flag(store, KEY_ENABLE_DRAWING),
            task_enabled: read_flag(store, KEY_ENABLE_TASK),
            chat_link: read_non_empty(store, KEY_CHAT_LINK),
            chat_entries,
            is_admin: role.is_admin(),
        }
    }

    #[must_use]
    pub fn gate_open(&self, gate: MenuGate) -> bool {
        match gate {
            MenuGate::Always => true,
            MenuGate::Admin => self.is_admin,
            MenuGate::DataExport => self.data_export_enabled,
        }
    }
}

#[must_use]
pub fn resolve_menu(inputs: &MenuInputs) -> Vec<MenuEntry> {
    MENU_ITEMS
        .iter()
        .map(|item| MenuEntry {
            id: item.id.to_string(),
            label: item.label.to_string(),
            path: item.path.to_string(),
            icon: item.icon,
            visibility: VisibilityClass::from_gate(inputs.gate_open(item.gate)),
        })
        .collect()
}

/// Memoized [`resolve_menu`].
#[derive(Debug, Default)]
pub struct MenuResolver {
    inputs: Option<MenuInputs>,
    entries: Vec<MenuEntry>,
    recomputations: u64,
}

impl MenuResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, inputs: MenuInputs) -> &[MenuEntry] {
        if self.inputs.as_ref() != Some(&inputs) {
            self.entries = resolve_menu(&inputs);
            self.inputs = Some(inputs);
            self.recomputations = self.recomputations.saturating_add(1);
            tracing::debug!(recomputations = self.recomputations, "menu recomputed");
        }
        &self.entries
    }

    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferenceStore;
    use quickcheck::{QuickCheck, TestResult};

    fn visible_ids(entries: &[MenuEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter(|entry| entry.visibility.is_visible())
            .map(|entry| entry.id.as_str())
            .collect()
    }

    fn inputs(flags: (bool, bool, bool, bool)) -> MenuInputs {
        let (data_export_enabled, drawing_enabled, task_enabled, is_admin) = flags;
        MenuInputs {
            data_export_enabled,
            drawing_enabled,
            task_enabled,
            is_admin,
            ..MenuInputs::default()
        }
    }

    #[test]
    fn order_is_fixed_and_hidden_entries_are_kept() {
        let entries = resolve_menu(&MenuInputs::default());
        let ids = entries.iter().map(|entry| entry.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["channel", "token", "user", "log", "detail", "setting"]);
        assert_eq!(visible_ids(&entries), ["token", "log", "setting"]);
        assert_eq!(entries[0].visibility.css_class(), CSS_CLASS_HIDDEN);
        assert_eq!(entries[1].visibility.css_class(), CSS_CLASS_NORMAL);
    }

    #[test]
    fn admin_and_export_open_their_gates() {
        let entries = resolve_menu(&inputs((true, false, false, true)));
        assert_eq!(
            visible_ids(&entries),
            ["channel", "token", "user", "log", "detail", "setting"]
        );
    }

    #[test]
    fn visible_set_matches_gates_for_all_flag_combinations() {
        fn property(export: bool, drawing: bool, task: bool, admin: bool) -> bool {
            let inputs = inputs((export, drawing, task, admin));
            let entries = resolve_menu(&inputs);
            MENU_ITEMS.iter().zip(&entries).all(|(item, entry)| {
                entry.id == item.id && entry.visibility.is_visible() == inputs.gate_open(item.gate)
            })
        }
        QuickCheck::new().quickcheck(property as fn(bool, bool, bool, bool) -> bool);
    }

    #[test]
    fn toggling_one_flag_only_changes_entries_it_gates() {
        fn property(export: bool, drawing: bool, task: bool, admin: bool, which: u8) -> TestResult {
            let before = (export, drawing, task, admin);
            let (after, gated): ((bool, bool, bool, bool), &[&str]) = match which % 4 {
                0 => ((!export, drawing, task, admin), &["detail"]),
                1 => ((export, !drawing, task, admin), &[]),
                2 => ((export, drawing, !task, admin), &[]),
                _ => ((export, drawing, task, !admin), &["channel", "user"]),
            };
            let left = resolve_menu(&inputs(before));
            let right = resolve_menu(&inputs(after));
            let ok = left.iter().zip(&right).all(|(l, r)| {
                let changed = l.visibility != r.visibility;
                changed == gated.contains(&l.id.as_str())
            });
            TestResult::from_bool(ok)
        }
        QuickCheck::new()
            .quickcheck(property as fn(bool, bool, bool, bool, u8) -> TestResult);
    }

    #[test]
    fn resolver_recomputes_on_every_named_input() {
        let mut resolver = MenuResolver::new();
        let mut current = MenuInputs::default();
        resolver.resolve(current.clone());
        resolver.resolve(current.clone());
        assert_eq!(resolver.recomputations(), 1);

        let changes: [fn(&mut MenuInputs); 6] = [
            |inputs| inputs.data_export_enabled = true,
            |inputs| inputs.drawing_enabled = true,
            |inputs| inputs.task_enabled = true,
            |inputs| inputs.chat_link = Some("https://chat.example.com".to_string()),
            |inputs| {
                inputs.chat_entries = vec![ChatEntry {
                    index: 0,
                    label: "Chat".to_string(),
                    link: None,
                }];
            },
            |inputs| inputs.is_admin = true,
        ];
        for (step, change) in changes.iter().enumerate() {
            change(&mut current);
            resolver.resolve(current.clone());
            assert_eq!(resolver.recomputations(), step as u64 + 2);
        }
    }

    #[test]
    fn inputs_read_flags_from_store() {
        let store = MemoryPreferenceStore::with_entries([
            (KEY_ENABLE_DATA_EXPORT, "true"),
            (KEY_ENABLE_DRAWING, "false"),
            (KEY_ENABLE_TASK, "true"),
            (KEY_CHAT_LINK, ""),
        ]);
        let inputs = MenuInputs::from_store(&store, Vec::new(), Role::Admin);
        assert!(inputs.data_export_enabled);
        assert!(!inputs.drawing_enabled);
        assert!(inputs.task_enabled);
        assert_eq!(inputs.chat_link, None);
        assert!(inputs.is_admin);
    }
}
