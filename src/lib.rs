pub mod config;
pub mod error;
pub mod generator;
pub mod naming;
pub mod scan;
pub mod processing {
    pub mod layout;
    pub mod resize;
}

pub use config::Configuration;
pub use error::Error;
pub use generator::{BatchReport, Generator, Processed, Stage};
