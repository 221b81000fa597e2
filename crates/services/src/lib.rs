#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod gateway;
pub mod http_gateway;
pub mod session;

pub use clock::Clock;
pub use error::{GatewayError, SessionError};
pub use gateway::{ContentGateway, InMemoryContentGateway, TopicFixture};
pub use http_gateway::{GatewayConfig, HttpContentGateway};
pub use session::{LearningSession, QuizProgress, Stage};
