pub mod config;
pub mod error;
pub mod image;
pub mod locator;

pub use config::GantryConfig;
pub use error::GantryError;
pub use image::ModuleImage;
pub use locator::ImageLocator;
