mod api;
mod app;
mod engine;

pub use api::ApiError;
pub use app::{AppError, AppResult};
pub use engine::EngineError;
