mod cap;

pub use cap::CapSubCommand;
