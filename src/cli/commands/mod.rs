mod command_result;
pub mod helper;
pub mod init;
pub mod lookup;
pub mod translate;
pub mod works;

pub use command_result::*;
