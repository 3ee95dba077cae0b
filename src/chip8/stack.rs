use crate::chip8::error::{Fault, Result};

pub const STACK_SIZE: usize = 16;

/// Fixed-depth return-address stack.
///
/// The stack pointer always names the next free slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stack {
    slots: [u16; STACK_SIZE],
    stack_pointer: u8,
}

impl Stack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `addr` in the free slot and move the pointer up.
    pub fn push(&mut self, addr: u16) -> Result<()> {
        let sp = self.stack_pointer as usize;
        if sp >= STACK_SIZE {
            return Err(Fault::StackOverflow { depth: sp });
        }
        self.slots[sp] = addr;
        self.stack_pointer += 1;
        Ok(())
    }

    /// Move the pointer down and return the address found there.
    pub fn pop(&mut self) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.stack_pointer -= 1;
        Ok(self.slots[self.stack_pointer as usize])
    }

    /// Index of the next free slot.
    pub fn pointer(&self) -> u8 {
        self.stack_pointer
    }

    /// `true` when there is nothing to return to.
    pub fn is_empty(&self) -> bool {
        self.stack_pointer == 0
    }

    /// Return addresses currently stacked, oldest first.
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.stack_pointer as usize]
    }
}
