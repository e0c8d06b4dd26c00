use std::collections::BTreeMap;

use serde_json::Value;

use crate::preferences::{KEY_CHAT_LINK, KEY_CHATS, PreferenceStore, read_non_empty};

pub const HOME_ID: &str = "home";
pub const CHAT_ID: &str = "chat";
pub const CHAT_ID_PREFIX: &str = "chat";

pub const BASE_ROUTES: [(&str, &str); 12] = [
    (HOME_ID, "/"),
    ("channel", "/channel"),
    ("token", "/token"),
    ("redemption", "/redemption"),
    ("user", "/user"),
    ("log", "/log"),
    ("midjourney", "/midjourney"),
    ("setting", "/setting"),
    ("about", "/about"),
    ("detail", "/detail"),
    ("pricing", "/pricing"),
    ("task", "/task"),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatListError {
    #[error("cached chat list is not valid JSON: {message}")]
    Malformed { message: String },
    #[error("cached chat list is not a JSON array")]
    NotAnArray,
}

impl ChatListError {
    /// Text shown to the user when the chat list cannot be used.
    #[must_use]
    pub fn notice(&self) -> &'static str {
        "Failed to parse chat data"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub index: usize,
    pub label: String,
    pub link: Option<String>,
}

impl ChatEntry {
    #[must_use]
    pub fn id(&self) -> String {
        chat_id(self.index)
    }

    #[must_use]
    pub fn path(&self) -> String {
        chat_path(self.index)
    }
}

#[must_use]
pub fn chat_id(index: usize) -> String {
    format!("{CHAT_ID_PREFIX}{index}")
}

#[must_use]
pub fn chat_path(index: usize) -> String {
    format!("/chat/{index}")
}

/// Parses the cached chat list. Every array element becomes one entry at
/// its index; an object element is labelled by its last key, whose string
/// value is the chat link.
pub fn parse_chat_entries(raw: &str) -> Result<Vec<ChatEntry>, ChatListError> {
    let value = serde_json::from_str::<Value>(raw).map_err(|error| ChatListError::Malformed {
        message: error.to_string(),
    })?;
    let Value::Array(items) = value else {
        return Err(ChatListError::NotAnArray);
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let last = item.as_object().and_then(|object| object.iter().last());
            match last {
                Some((label, link)) => ChatEntry {
                    index,
                    label: label.clone(),
                    link: link.as_str().map(ToString::to_string),
                },
                None => ChatEntry {
                    index,
                    label: chat_id(index),
                    link: None,
                },
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatDiscovery {
    pub entries: Vec<ChatEntry>,
    pub warning: Option<ChatListError>,
}

/// Reads chat entries from the store. A primary chat link short-circuits
/// discovery; a blank or `null` list means no entries.
pub fn discover_chat_entries<S: PreferenceStore + ?Sized>(store: &S) -> ChatDiscovery {
    if read_non_empty(store, KEY_CHAT_LINK).is_some() {
        return ChatDiscovery::default();
    }
    let Some(raw) = read_non_empty(store, KEY_CHATS) else {
        return ChatDiscovery::default();
    };
    if raw.trim() == "null" {
        return ChatDiscovery::default();
    }

    match parse_chat_entries(&raw) {
        Ok(entries) => ChatDiscovery {
            entries,
            warning: None,
        },
        Err(error) => {
            tracing::warn!(error = %error, "ignoring cached chat list");
            ChatDiscovery {
                entries: Vec::new(),
                warning: Some(error),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    #[must_use]
    pub fn base() -> Self {
        Self {
            routes: BASE_ROUTES
                .iter()
                .map(|(id, path)| ((*id).to_string(), (*path).to_string()))
                .collect(),
        }
    }

    /// Base table extended with chat entries. One entry also aliases the
    /// generic `chat` id to `/chat/0`; two or more leave `chat` unmapped.
    #[must_use]
    pub fn with_chat_entries(entries: &[ChatEntry]) -> Self {
        let mut table = Self::base();
        for entry in entries {
            table.routes.insert(entry.id(), entry.path());
        }
        match entries.len() {
            0 => {}
            1 => {
                table.routes.insert(CHAT_ID.to_string(), chat_path(0));
            }
            _ => {
                table.routes.remove(CHAT_ID);
            }
        }
        table
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.routes.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.routes.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes
            .iter()
            .map(|(id, path)| (id.as_str(), path.as_str()))
    }

    /// Ids added for discovered chats, excluding the generic alias.
    pub fn chat_ids(&self) -> impl Iterator<Item = &str> {
        self.routes
            .keys()
            .map(String::as_str)
            .filter(|id| *id != CHAT_ID && id.starts_with(CHAT_ID_PREFIX))
    }

    /// Resolves a rendered menu id to its link target. A rendered id with
    /// no mapping is a wiring bug: it asserts in debug builds and logs in
    /// release builds.
    #[must_use]
    pub fn link_for(&self, id: &str) -> Option<&str> {
        let path = self.get(id);
        debug_assert!(path.is_some(), "menu id `{id}` has no route mapping");
        if path.is_none() {
            tracing::error!(id, "menu id has no route mapping");
        }
        path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBuild {
    pub table: RouteTable,
    pub chat_entries: Vec<ChatEntry>,
    pub warning: Option<ChatListError>,
}

/// Builds the route table from the current store contents. Called once per
/// render pass; nothing is cached between calls.
pub fn build_route_table<S: PreferenceStore + ?Sized>(store: &S) -> RouteBuild {
    let ChatDiscovery { entries, warning } = discover_chat_entries(store);
    RouteBuild {
        table: RouteTable::with_chat_entries(&entries),
        chat_entries: entries,
        warning,
    }
}
