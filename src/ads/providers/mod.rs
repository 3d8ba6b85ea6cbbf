pub mod mock;
pub mod none;
