//! Front-end core of the desktop shell: the view surface, the projector that
//! mirrors host state into it, the dispatcher that turns UI actions into host
//! commands, and the host-side state store feeding the projector.

pub mod bridge;
pub mod dispatcher;
pub mod host_state;
pub mod projector;
pub mod view;

pub use bridge::{ChannelBridge, HostBridge, HostCall, HostReply, HostRequest};
pub use dispatcher::{ActionDispatcher, LoginLock, DEFAULT_LOGIN_COOLDOWN, LOGIN_BUTTON_ID};
pub use host_state::{HostState, UserData, UserDataUpdate};
pub use projector::{managed_element_ids, ProjectionTable, ViewBindings, ViewProjector};
pub use view::{ElementHandle, ElementState, ElementTree, ViewSurface};
