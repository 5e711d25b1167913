pub mod segment;
pub mod timecode;
pub mod transcript;
