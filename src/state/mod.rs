pub mod error;
pub mod event;
pub mod machine;
pub mod model;
pub mod pending;

pub use error::{StateError, StateResult};
pub use event::{Effect, MoveEventKind, Outcome, ZoomEvent, ZoomEventKind};
pub use machine::InteractionMachine;
pub use model::{
    GestureSession, InputMode, InteractionState, LayoutSnapshot, StateKind, Standby,
    ZoomImageMetrics,
};
pub use pending::PendingSlot;
