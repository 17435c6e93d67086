pub mod dispatcher;
pub mod error;
pub mod request;
pub mod response;

pub use dispatcher::SkillDispatcher;
pub use error::SkillError;
pub use request::SkillRequest;
pub use response::SkillResponse;
