//! Domain models shared between the server and its consumers

pub mod banner;
pub mod country;
pub mod customization;
pub mod product;
pub mod subscription;
