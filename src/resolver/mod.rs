mod strategy;

pub use strategy::{AddressResolver, DEFAULT_LOOPBACK_HOST};
