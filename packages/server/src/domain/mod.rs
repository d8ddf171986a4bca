//! Domain layer: value objects, entities and the trait seams the usecase
//! layer depends on.

pub mod entity;
mod error;
mod pusher;
mod repository;
pub mod value_object;

pub use entity::{Member, OnlineRegistry, RegisterOutcome};
pub use error::{RegistryError, RepositoryError};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::RegistryRepository;
pub use value_object::{
    ConnectionId, ConnectionIdFactory, MessageText, Timestamp, Username, ValueObjectError,
};
