//! Control-plane surface consumed by the (out-of-scope) REST/WebSocket
//! transport (§6): DTOs, the `ControlPlane` trait, and its concrete
//! implementation over a `Pipeline` + `ReclusterScheduler` pair. No HTTP
//! server, router, or wire codec lives here — those are external
//! collaborators per §1.

pub mod control_plane;
pub mod dto;

pub use control_plane::{rag_chat, ControlPlane, SefsControlPlane};
pub use dto::{
    ChatEvent, ChatRequest, MetricsResponse, RescanResponse, SearchHit, SearchQuery,
    StatusResponse, StreamEvent, SwitchRootRequest,
};
