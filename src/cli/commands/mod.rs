pub mod decrypt;
pub mod verify;
pub mod verify_inline;
