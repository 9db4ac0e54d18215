// petcare-assist - AI pet-care assistant backend
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod gemini;
pub mod metrics;
pub mod places;
pub mod server;
pub mod surface;
pub mod utils;
pub mod vision;
