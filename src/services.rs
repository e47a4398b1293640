pub mod hazard_service;
pub mod preprocess_service;
pub mod risk_service;

pub use hazard_service::HazardService;
pub use preprocess_service::{PreprocessError, PreprocessService, PreprocessStats};
pub use risk_service::{RiskAssessment, RiskCategory, RiskService, RiskThresholds};
