pub mod proxy;
pub mod video;
