pub mod i8042;
pub mod parallel;
pub mod serial;

pub use i8042::I8042Keyboard;
pub use parallel::ParallelPort;
pub use serial::SerialPort;
