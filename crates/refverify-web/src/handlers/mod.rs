pub mod index;
pub mod ping;
pub mod verify;
