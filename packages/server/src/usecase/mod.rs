//! UseCase layer: application services orchestrating the domain seams.

mod connect_session;
mod disconnect_session;
mod error;
mod get_online_users;
mod register_identity;
mod relay_message;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::{DisconnectOutcome, DisconnectSessionUseCase};
pub use error::{RegisterError, RelayError};
pub use get_online_users::GetOnlineUsersUseCase;
pub use register_identity::{RegisterIdentityUseCase, RegistrationOutcome};
pub use relay_message::RelayMessageUseCase;
