//! Services — external collaborators of the core

pub mod image;

pub use self::image::ImageService;
