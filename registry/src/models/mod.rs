pub mod player;
pub mod token;
