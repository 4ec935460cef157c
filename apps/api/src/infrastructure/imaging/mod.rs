pub mod compositor;
pub mod decoder;
