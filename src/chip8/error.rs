use thiserror::Error;

/// Conditions that stop the machine.
///
/// Unknown opcodes are not faults; they are skipped.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum Fault {
    #[error("program is too large ({len} bytes), at most {max} bytes fit after {load_addr:#06X}")]
    ProgramTooLarge {
        len: usize,
        max: usize,
        load_addr: u16,
    },

    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("stack overflow: call with {depth} return addresses already stacked")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("key {0:#04X} is outside the 16-key pad")]
    InvalidKey(u8),
}

pub type Result<T> = std::result::Result<T, Fault>;
