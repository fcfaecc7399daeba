pub mod advisor;
pub mod credentials;
pub mod fallback;
pub mod highlight;
pub mod openai;

pub use crate::domain::model::{Advice, Answers, Recommendation};
pub use crate::domain::ports::{CompletionClient, ConfigProvider, Storage};
pub use crate::utils::error::Result;
