//! Small filesystem helpers shared by the listener setup code.

pub mod fs;
