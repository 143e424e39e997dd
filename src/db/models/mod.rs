mod course;
mod quiz;

#[allow(unused)]
pub use course::*;
#[allow(unused)]
pub use quiz::*;
