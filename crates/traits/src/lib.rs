pub mod resource;

pub use resource::{ImageSource, InMemoryImageSource, NoImages, ResourceError, SharedImageData};
