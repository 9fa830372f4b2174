pub mod generate;
pub mod init;
pub mod session;
pub mod styles;

pub use generate::*;
pub use init::*;
pub use session::*;
pub use styles::*;
