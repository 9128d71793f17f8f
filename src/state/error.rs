use super::event::ZoomEventKind;
use super::model::StateKind;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid state transition: from {from} using event {event:?}")]
    InvalidStateTransition { from: StateKind, event: ZoomEventKind },
}
