mod common;

#[cfg(feature = "generator-go")]
mod go;
#[cfg(feature = "generator-rust")]
mod rust;

#[cfg(not(any(feature = "generator-go", feature = "generator-rust")))]
compile_error!("At least one target must be enabled");

pub use common::{method_name, ClientHeader, ClientTemplate};
#[cfg(feature = "generator-rust")]
pub use rust::RustArgumentRenderer;

use clap::ValueEnum;

use crate::args::ArgumentRenderer;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    #[cfg(feature = "generator-go")]
    Go,
    #[cfg(feature = "generator-rust")]
    Rust,
}

impl Target {
    pub fn template(&self) -> Box<dyn ClientTemplate> {
        match *self {
            #[cfg(feature = "generator-go")]
            Self::Go => Box::new(go::GoTemplate),
            #[cfg(feature = "generator-rust")]
            Self::Rust => Box::new(rust::RustTemplate),
        }
    }

    pub fn argument_renderer(&self) -> Box<dyn ArgumentRenderer> {
        match *self {
            #[cfg(feature = "generator-go")]
            Self::Go => Box::new(crate::args::SignatureArgumentRenderer),
            #[cfg(feature = "generator-rust")]
            Self::Rust => Box::new(RustArgumentRenderer),
        }
    }
}
