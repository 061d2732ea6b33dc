pub mod geometry;
pub mod pubsub;
pub mod render;
pub mod drawing;
pub mod maps;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
