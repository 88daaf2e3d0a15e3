//! Relay to the external scoring service and the shape of its answer.

pub mod gateway;
pub mod proxy;
pub mod response;
pub mod router;

pub use gateway::{AnalysisGateway, GatewayError, HttpAnalysisGateway};
pub use proxy::{AnalysisProxy, ProxyError, ProxyReply};
pub use response::{
    carries_estimate, AreaCredits, EstimatedValue, FarmAnalysisData, FarmAnalysisResponse,
    GenerationPotential,
};
pub use router::{analysis_router, ANALYSIS_PROXY_PATH};
