use std::io;
use thiserror::Error;

/// Reasons a program image can be rejected before anything runs
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read program image: {0}")]
    ImageUnreadable(#[from] io::Error),

    #[error("program image is {size} bytes, but only {max} bytes fit above 0x200")]
    ImageTooLarge { size: usize, max: usize },
}

/// Fatal faults raised by the interpreter; every one of them ends the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("illegal program counter 0x{pc:04x}")]
    IllegalAddress { pc: u16 },

    #[error("stack overflow at 0x{pc:04x} (opcode 0x{opcode:04x})")]
    StackOverflow { pc: u16, opcode: u16 },

    #[error("stack underflow at 0x{pc:04x} (opcode 0x{opcode:04x})")]
    StackUnderflow { pc: u16, opcode: u16 },

    #[error("unsupported opcode 0x{opcode:04x} at 0x{pc:04x}")]
    UnsupportedOpcode { pc: u16, opcode: u16 },

    #[error("key code 0x{key:02x} out of range at 0x{pc:04x}")]
    InvalidKey { pc: u16, key: u8 },

    #[error("write to reserved address 0x{addr:03x} at 0x{pc:04x} (opcode 0x{opcode:04x})")]
    ReservedWrite { pc: u16, opcode: u16, addr: u16 },
}

/// A key code outside the 16-key pad was queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key code 0x{0:02x} is outside 0x0..=0xf")]
pub struct KeyOutOfRange(pub u8);
