pub mod accumulator;
pub mod merge;
pub mod wav;
