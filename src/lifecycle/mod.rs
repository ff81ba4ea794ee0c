//! Process lifecycle: shutdown on SIGINT/SIGTERM

mod shutdown;

pub use shutdown::ShutdownSignal;
