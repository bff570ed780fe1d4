pub mod alphabet;
pub mod bins;
pub mod engine;
pub mod error;
pub mod io;
pub mod rank;
pub mod seq;
