pub mod auth;
pub mod candidate;
pub mod envelope;
pub mod events;
pub mod lottery;
pub mod vote;

pub use auth::*;
pub use candidate::*;
pub use envelope::Envelope;
pub use events::PushEvent;
pub use lottery::*;
pub use vote::*;
