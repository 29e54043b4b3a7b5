use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Scale to {active_vus} VUs failed: {reason}")]
    ScaleFailed { active_vus: u64, reason: String },
}
