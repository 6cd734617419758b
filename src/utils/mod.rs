pub mod io;
pub mod process;
