//! An interpreter for the CHIP-8 instruction set.
//!
//! The machine never drives itself: the host calls [`CPU::step`] (or fetches
//! and calls [`CPU::execute`] on its own), counts the timers down and renders
//! [`CPU::display`]. `Fx0A` parks the machine in [`Status::AwaitingKey`]
//! until the host feeds it a key through [`CPU::press_key`] or
//! [`CPU::wait_for_key`].
//!
//! [`CPU::step`]: chip8::CPU::step
//! [`CPU::execute`]: chip8::CPU::execute
//! [`CPU::display`]: chip8::CPU::display
//! [`CPU::press_key`]: chip8::CPU::press_key
//! [`CPU::wait_for_key`]: chip8::CPU::wait_for_key
//! [`Status::AwaitingKey`]: chip8::Status::AwaitingKey

pub mod chip8;
