//! Navigation state for the console sidebar: route table, menu visibility,
//! URL-driven selection and the mount-time status load.

pub mod controller;
pub mod menu;
pub mod notice;
pub mod preferences;
pub mod role;
pub mod routes;
pub mod selection;
pub mod signal;
pub mod status;

pub use controller::{NavController, RenderPass, StatusOutcome, StatusTicket};
pub use menu::{MenuEntry, MenuIcon, MenuInputs, MenuResolver, VisibilityClass, resolve_menu};
pub use notice::{Notice, NoticeLevel};
pub use preferences::{MemoryPreferenceStore, PreferenceStore};
pub use role::{Role, caller_role};
pub use routes::{ChatEntry, ChatListError, RouteBuild, RouteTable, build_route_table};
pub use selection::{NavigationState, SelectionState, SelectionSynchronizer, selected_id_from_path};
pub use signal::{SharedSignals, Signal};
pub use status::{AppStatus, StatusEnvelope, StatusLoadError, StatusTransport, load_status};
