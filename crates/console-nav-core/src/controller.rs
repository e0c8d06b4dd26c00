use crate::menu::{MenuEntry, MenuInputs, MenuResolver};
use crate::notice::{Notice, NoticeQueue};
use crate::preferences::{KEY_DEFAULT_COLLAPSE_SIDEBAR, PreferenceStore, read_flag};
use crate::role::caller_role;
use crate::routes::{ChatEntry, RouteTable, build_route_table, discover_chat_entries};
use crate::selection::{NavigationState, SelectionSynchronizer};
use crate::signal::SharedSignals;
use crate::status::{
    AppStatus, StatusLoadError, StatusTransport, load_status, persist_status_projection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusRequest {
    InFlight,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountPhase {
    Detached,
    Mounted { status: StatusRequest },
}

/// Permission to apply one status result. Issued once per mount.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct StatusTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Applied,
    Failed,
    /// The ticket belongs to an unmounted or replaced mount.
    Discarded,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass {
    pub routes: RouteTable,
    pub menu: Vec<MenuEntry>,
}

impl RenderPass {
    /// Link target for each menu entry, resolved through the route table.
    pub fn links(&self) -> impl Iterator<Item = (&MenuEntry, Option<&str>)> {
        self.menu
            .iter()
            .map(|entry| (entry, self.routes.link_for(&entry.id)))
    }
}

/// Sidebar navigation state for one page.
pub struct NavController<S: PreferenceStore> {
    store: S,
    signals: SharedSignals,
    selection: SelectionSynchronizer,
    is_collapsed: bool,
    chat_entries: Vec<ChatEntry>,
    menu: MenuResolver,
    notices: NoticeQueue,
    generation: u64,
    phase: MountPhase,
}

impl<S: PreferenceStore> NavController<S> {
    pub fn new(store: S, signals: SharedSignals) -> Self {
        let is_collapsed = read_flag(&store, KEY_DEFAULT_COLLAPSE_SIDEBAR);
        let selection = SelectionSynchronizer::new(signals.inner_padding.clone());
        Self {
            store,
            signals,
            selection,
            is_collapsed,
            chat_entries: Vec::new(),
            menu: MenuResolver::new(),
            notices: NoticeQueue::default(),
            generation: 0,
            phase: MountPhase::Detached,
        }
    }

    /// Starts a page lifetime at `path`: selects from the URL, discovers
    /// cached chat entries and issues the single status ticket for this
    /// mount. Mounting while already mounted replaces the previous mount.
    pub fn mount(&mut self, path: &str) -> StatusTicket {
        if self.phase != MountPhase::Detached {
            tracing::debug!(generation = self.generation, "replacing active mount");
        }
        self.generation = self.generation.saturating_add(1);
        self.is_collapsed = read_flag(&self.store, KEY_DEFAULT_COLLAPSE_SIDEBAR);
        self.selection = SelectionSynchronizer::new(self.signals.inner_padding.clone());
        self.selection.sync_from_path(path);

        let discovery = discover_chat_entries(&self.store);
        if let Some(warning) = discovery.warning {
            self.notices.push(Notice::warning(warning.notice()));
        }
        self.chat_entries = discovery.entries;

        self.phase = MountPhase::Mounted {
            status: StatusRequest::InFlight,
        };
        tracing::debug!(
            generation = self.generation,
            path,
            chats = self.chat_entries.len(),
            "navigation mounted"
        );
        StatusTicket {
            generation: self.generation,
        }
    }

    /// Ends the page lifetime. Results for earlier tickets are discarded.
    pub fn unmount(&mut self) {
        self.phase = MountPhase::Detached;
        self.generation = self.generation.saturating_add(1);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.phase != MountPhase::Detached
    }

    /// Applies a finished status request. Success publishes the status and
    /// persists its projection; failure only queues a notice. Either way the
    /// persisted collapse preference is re-read afterwards.
    pub fn finish_status_load(
        &mut self,
        ticket: StatusTicket,
        result: Result<AppStatus, StatusLoadError>,
    ) -> StatusOutcome {
        let expected = MountPhase::Mounted {
            status: StatusRequest::InFlight,
        };
        if ticket.generation != self.generation || self.phase != expected {
            tracing::debug!(
                ticket = ticket.generation,
                generation = self.generation,
                "discarding late status result"
            );
            return StatusOutcome::Discarded;
        }

        let outcome = match result {
            Ok(status) => {
                persist_status_projection(&self.store, &status);
                self.signals.status.set(Some(status));
                StatusOutcome::Applied
            }
            Err(error) => {
                tracing::warn!(error = %error, "status load failed");
                self.notices.push(Notice::error(error.notice()));
                StatusOutcome::Failed
            }
        };

        self.phase = MountPhase::Mounted {
            status: StatusRequest::Completed,
        };
        self.is_collapsed = read_flag(&self.store, KEY_DEFAULT_COLLAPSE_SIDEBAR);
        outcome
    }

    /// Mounts, performs the status request and applies its result.
    pub async fn mount_and_load<T: StatusTransport + ?Sized>(
        &mut self,
        path: &str,
        transport: &T,
    ) -> StatusOutcome {
        let ticket = self.mount(path);
        let result = load_status(transport).await;
        self.finish_status_load(ticket, result)
    }

    /// Rebuilds the route table from the store and resolves the menu.
    pub fn render_pass(&mut self) -> RenderPass {
        let build = build_route_table(&self.store);
        if let Some(warning) = build.warning {
            self.notices.push(Notice::warning(warning.notice()));
        }

        let inputs = MenuInputs::from_store(
            &self.store,
            self.chat_entries.clone(),
            caller_role(&self.store),
        );
        let menu = self.menu.resolve(inputs).to_vec();
        RenderPass {
            routes: build.table,
            menu,
        }
    }

    pub fn select(&mut self, id: &str) {
        self.selection.select(id);
    }

    /// User toggled the collapse button.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.is_collapsed = collapsed;
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        NavigationState {
            selection: self.selection.state().clone(),
            is_collapsed: self.is_collapsed,
        }
    }

    #[must_use]
    pub fn chat_entries(&self) -> &[ChatEntry] {
        &self.chat_entries
    }

    #[must_use]
    pub fn signals(&self) -> &SharedSignals {
        &self.signals
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn menu_recomputations(&self) -> u64 {
        self.menu.recomputations()
    }

    #[must_use]
    pub fn pending_notices(&self) -> &[Notice] {
        self.notices.pending()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }
}
