//! End-to-end jacket building.
//!
//! [`PipelineDriver::run`] validates the request, loads the image, derives
//! both texture variants once, then writes one bundle per
//! [`PlatformTarget`](crate::bundle::PlatformTarget) in fixed order.

mod driver;
mod error;
mod request;

pub use driver::PipelineDriver;
pub use error::{PipelineError, PipelineResult};
pub use request::{JacketRequest, PipelineSummary};
