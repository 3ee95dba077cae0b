use crate::chip8::config::{Config, TimerMode};
use crate::chip8::display::Display;
use crate::chip8::error::Result;
use crate::chip8::keyboard::Keyboard;
use crate::chip8::ram::{GLYPH_HEIGHT, PROGRAM_ADDR, RAM};
use crate::chip8::registers::{Registers, V0};
use crate::chip8::stack::Stack;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Longest sprite a `Dxyn` can draw.
const MAX_SPRITE_HEIGHT: usize = 15;

/// Where the engine is between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Running,
    /// `Fx0A` was executed; the next mapped key press goes to `Vx`.
    AwaitingKey { register: u8 },
}

/// What the host should do after a [`CPU::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Nothing will execute until a key is pressed.
    AwaitingKey,
}

pub struct CPU {
    registers: Registers,
    stack: Stack,
    ram: RAM,
    display: Display,
    keyboard: Keyboard,
    state: ExecState,
    config: Config,
    cycles_since_tick: u32,
    rng: StdRng,
}

fn seeded_rng(config: &Config) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl CPU {
    /// Create a new CPU instance with the default [`Config`].
    /// Every component is started at `0`, with the digit glyphs in memory.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new CPU instance using `config`.
    pub fn with_config(config: Config) -> Self {
        CPU {
            registers: Registers::new(),
            stack: Stack::new(),
            ram: RAM::new(),
            display: Display::new(),
            keyboard: Keyboard::new(),
            state: ExecState::Running,
            rng: seeded_rng(&config),
            config,
            cycles_since_tick: 0,
        }
    }

    /// Put the machine back into its freshly constructed state, keeping the config.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Copy `program` to `0x200` and point the program counter at it.
    ///
    /// A program that does not fit is rejected before anything changes.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.ram.load(program)?;
        self.registers.set_pc(PROGRAM_ADDR);
        log::debug!("loaded {} byte program at {:#05x}", program.len(), PROGRAM_ADDR);
        Ok(())
    }

    /// Register file, including the program counter.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Main memory.
    pub fn ram(&self) -> &RAM {
        &self.ram
    }

    /// Call stack and its pointer.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Framebuffer for the render driver.
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Current key states.
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Settings the machine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the engine is running or parked on `Fx0A`, and for which register.
    pub fn state(&self) -> ExecState {
        self.state
    }

    /// Host-facing view of [`CPU::state`].
    pub fn status(&self) -> Status {
        match self.state {
            ExecState::Running => Status::Running,
            ExecState::AwaitingKey { .. } => Status::AwaitingKey,
        }
    }

    /// `true` while an `Fx0A` is pending.
    pub fn is_awaiting_key(&self) -> bool {
        self.status() == Status::AwaitingKey
    }

    /// `true` while the sound timer is non-zero.
    pub fn sound_active(&self) -> bool {
        self.registers.sound_timer() > 0
    }

    /// Count both timers down by one.
    ///
    /// Returns `true` when the sound timer has just run out.
    pub fn tick_timers(&mut self) -> bool {
        let stopped = self.registers.tick_timers();
        if stopped {
            log::debug!("sound timer expired");
        }
        stopped
    }

    /// Read the instruction word at the program counter and move the counter past it.
    ///
    /// For hosts running their own fetch/execute loop. A word that would run
    /// off the end of memory is a fault and leaves the counter alone.
    pub fn fetch(&mut self) -> Result<u16> {
        let pc = self.registers.pc();
        let opcode = self.ram.read_word(pc as usize)?;
        self.registers.set_pc(pc.wrapping_add(2));
        Ok(opcode)
    }

    /// Fetch the word at the program counter, move past it and execute it.
    ///
    /// While a key is awaited nothing is fetched. On a fault the program
    /// counter is left on the faulting instruction.
    pub fn step(&mut self) -> Result<Status> {
        if self.is_awaiting_key() {
            if self.config.tick_timers_while_waiting {
                self.count_cycle();
            }
            return Ok(Status::AwaitingKey);
        }

        let pc = self.registers.pc();
        let opcode = self.fetch()?;
        let status = match self.execute(opcode) {
            Ok(status) => status,
            Err(fault) => {
                self.registers.set_pc(pc);
                return Err(fault);
            }
        };
        self.count_cycle();
        Ok(status)
    }

    fn count_cycle(&mut self) {
        if let TimerMode::PerInstructions(n) = self.config.timer_mode {
            self.cycles_since_tick += 1;
            if self.cycles_since_tick >= n.max(1) {
                self.cycles_since_tick = 0;
                self.tick_timers();
            }
        }
    }

    /// Mark `key` as held down, completing a pending `Fx0A`.
    pub fn press_key(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_down(key, true)?;
        self.complete_key_wait(key);
        Ok(())
    }

    /// Mark `key` as released.
    pub fn release_key(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_down(key, false)
    }

    /// Resolve a pending `Fx0A` from a host event source.
    ///
    /// Events are translated by `map` and the first one naming a pad key
    /// is stored in the waiting register. Returns that key, or `None` if
    /// the machine was not waiting or the source ran dry.
    pub fn wait_for_key<C, I, F>(&mut self, events: I, map: F) -> Option<u8>
    where
        I: IntoIterator<Item = C>,
        F: FnMut(C) -> Option<u8>,
    {
        if !self.is_awaiting_key() {
            return None;
        }
        let key = self.keyboard.wait_for_key(events, map)?;
        self.complete_key_wait(key);
        Some(key)
    }

    /// Give up on a pending `Fx0A`, leaving its register untouched.
    ///
    /// Returns `false` if nothing was pending.
    pub fn cancel_key_wait(&mut self) -> bool {
        let waiting = self.is_awaiting_key();
        if waiting {
            log::debug!("key wait cancelled");
            self.state = ExecState::Running;
        }
        waiting
    }

    fn complete_key_wait(&mut self, key: u8) {
        if let ExecState::AwaitingKey { register } = self.state {
            log::debug!("key {:#x} resolved wait into V{:X}", key, register);
            self.registers.set_v(register, key);
            self.state = ExecState::Running;
        }
    }

    /// Clear the display.
    fn clear_display(&mut self) {
        self.display.clear();
    }

    /// Return from a subroutine.
    ///
    /// Pops the return address off the stack into the program counter.
    fn ret_subroutine(&mut self) -> Result<()> {
        let addr = self.stack.pop()?;
        self.registers.set_pc(addr);
        Ok(())
    }

    /// Jump to a memory address.
    ///
    /// Writes `addr` to the program counter.
    fn jmp_addr(&mut self, addr: u16) {
        self.registers.set_pc(addr);
    }

    /// Call subroutine.
    ///
    /// Pushes the current program counter, then sets the program counter to `addr`.
    fn call_subroutine(&mut self, addr: u16) -> Result<()> {
        self.stack.push(self.registers.pc())?;
        self.registers.set_pc(addr);
        Ok(())
    }

    /// Skip the next instruction if the value in the register `x_idx` is equal to `value`.
    ///
    /// If the values are equal, the program counter is incremented by 2.
    fn skip_eq_value(&mut self, x_idx: u8, value: u8) {
        if self.registers.v(x_idx) == value {
            self.registers.skip();
        }
    }

    /// Skip the next instruction if the value in the register `x_idx` is not equal to `value`.
    fn skip_neq_value(&mut self, x_idx: u8, value: u8) {
        if self.registers.v(x_idx) != value {
            self.registers.skip();
        }
    }

    /// Skip the next instruction if the registers `x_idx` and `y_idx` hold the same value.
    fn skip_eq_xy(&mut self, x_idx: u8, y_idx: u8) {
        if self.registers.v(x_idx) == self.registers.v(y_idx) {
            self.registers.skip();
        }
    }

    /// Set the register `x_idx` to `value`.
    fn set_x_value(&mut self, x_idx: u8, value: u8) {
        self.registers.set_v(x_idx, value);
    }

    /// Add `value` to the current value of the register `x_idx`.
    ///
    /// Wraps around at 256 and never touches `VF`.
    fn add_x_value(&mut self, x_idx: u8, value: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_v(x_idx, vx.wrapping_add(value));
    }

    /// Store the value of the register `y_idx` in the register `x_idx`.
    fn store_xy(&mut self, x_idx: u8, y_idx: u8) {
        let vy = self.registers.v(y_idx);
        self.registers.set_v(x_idx, vy);
    }

    /// Perform a bitwise *OR* between the values of the registers `x_idx` and `y_idx`,
    /// then store the result in the register `x_idx`.
    fn or_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        self.registers.set_v(x_idx, vx | vy);
    }

    /// Perform a bitwise *AND* between the values of the registers `x_idx` and `y_idx`,
    /// then store the result in the register `x_idx`.
    fn and_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        self.registers.set_v(x_idx, vx & vy);
    }

    /// Perform a bitwise *XOR* between the values of the registers `x_idx` and `y_idx`,
    /// then store the result in the register `x_idx`.
    fn xor_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        self.registers.set_v(x_idx, vx ^ vy);
    }

    /// Add the values in registers `x_idx` and `y_idx`, storing the result in `x_idx`.
    ///
    /// If the result is greater than `255` then the `VF` register is set to `1`,
    /// otherwise, it is set to `0`.
    /// The lower 8 bits of the result are kept and stored in the register `x_idx`.
    fn add_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        let (sum, carry) = vx.overflowing_add(vy);
        self.registers.set_v(x_idx, sum);
        self.registers.set_flag(carry);
    }

    /// Subtract the value of `y_idx` from `x_idx`, storing the result in `x_idx`.
    ///
    /// If the value of the register `x_idx` is greater than `y_idx`,
    /// then the `VF` register is set to `1`, otherwise it is set to `0`.
    fn sub_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        self.registers.set_v(x_idx, vx.wrapping_sub(vy));
        self.registers.set_flag(vx > vy);
    }

    /// Perform a bitwise-shift *right* on the value of the register `x_idx`.
    ///
    /// `VF` receives the bit shifted out.
    fn shr_x(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_v(x_idx, vx >> 1);
        self.registers.set_flag(vx & 0x1 == 1);
    }

    /// Subtract the value of `x_idx` from `y_idx`, storing the result in `x_idx`.
    ///
    /// If the value of the register `y_idx` is greater than `x_idx`,
    /// then the `VF` register is set to `1`, otherwise it is set to `0`.
    fn subn_xy(&mut self, x_idx: u8, y_idx: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        self.registers.set_v(x_idx, vy.wrapping_sub(vx));
        self.registers.set_flag(vy > vx);
    }

    /// Perform a bitwise-shift *left* on the value of the register `x_idx`.
    ///
    /// `VF` receives the bit shifted out.
    fn shl_x(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_v(x_idx, vx << 1);
        self.registers.set_flag(vx >> 7 == 1);
    }

    /// Skip the next instruction if the values in registers `x_idx` and `y_idx` are not equal.
    fn skip_neq_xy(&mut self, x_idx: u8, y_idx: u8) {
        if self.registers.v(x_idx) != self.registers.v(y_idx) {
            self.registers.skip();
        }
    }

    /// Set the value of the `I` register to `addr`.
    fn set_i(&mut self, addr: u16) {
        self.registers.set_i(addr);
    }

    /// Jump to the location `addr + V0`.
    fn jmp_addr_offset(&mut self, addr: u16) {
        let v0 = self.registers.v(V0 as u8);
        self.registers.set_pc(addr + u16::from(v0));
    }

    /// Generate a random byte and mask it with `value`, storing the result in `x_idx`.
    fn rnd_and(&mut self, x_idx: u8, value: u8) {
        let r_num: u8 = self.rng.gen();
        self.registers.set_v(x_idx, r_num & value);
    }

    /// Draw the `n` byte sprite at `I` to the screen at (`Vx`, `Vy`).
    ///
    /// `VF` is set to `1` if any lit pixel was turned off, otherwise `0`.
    fn draw(&mut self, x_idx: u8, y_idx: u8, n: u8) {
        let (vx, vy) = (self.registers.v(x_idx), self.registers.v(y_idx));
        let start = self.registers.i() as usize;
        let height = n as usize;
        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        for (offset, byte) in sprite.iter_mut().take(height).enumerate() {
            *byte = self.ram.read_wrapping(start + offset);
        }
        let collision = self
            .display
            .draw_sprite(vx as usize, vy as usize, &sprite, height);
        self.registers.set_flag(collision);
    }

    /// Skip the next instruction if the key numbered by `Vx` is down.
    fn skip_key_pressed(&mut self, x_idx: u8) {
        if self.keyboard.is_down(self.registers.v(x_idx)) {
            self.registers.skip();
        }
    }

    /// Skip the next instruction if the key numbered by `Vx` is up.
    fn skip_key_not_pressed(&mut self, x_idx: u8) {
        if !self.keyboard.is_down(self.registers.v(x_idx)) {
            self.registers.skip();
        }
    }

    /// Read the value from the delay timer into the register `x_idx`.
    fn read_delay_timer(&mut self, x_idx: u8) {
        let dt = self.registers.delay_timer();
        self.registers.set_v(x_idx, dt);
    }

    /// Suspend execution until a key is pressed; the key goes to `x_idx`.
    fn wait_keypress(&mut self, x_idx: u8) {
        log::debug!("waiting for a key press into V{:X}", x_idx);
        self.state = ExecState::AwaitingKey { register: x_idx };
    }

    /// Write the value of the register `x_idx` into the delay timer.
    fn set_delay_timer(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_delay_timer(vx);
    }

    /// Write the value of the register `x_idx` into the sound timer.
    fn set_sound_timer(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_sound_timer(vx);
    }

    /// Increment the value of the `I` register by the value in the `x_idx` register.
    fn add_i(&mut self, x_idx: u8) {
        let i = self.registers.i();
        let vx = self.registers.v(x_idx);
        self.registers.set_i(i.wrapping_add(u16::from(vx)));
    }

    /// Point `I` at the built-in glyph for the digit in `x_idx`.
    fn set_i_digit(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        self.registers.set_i(u16::from(vx) * GLYPH_HEIGHT);
    }

    /// Write the decimal digits of `Vx` to `I`, `I+1` and `I+2`, most significant first.
    fn store_bcd(&mut self, x_idx: u8) {
        let vx = self.registers.v(x_idx);
        let i = self.registers.i() as usize;
        self.ram.write_wrapping(i, vx / 100);
        self.ram.write_wrapping(i + 1, (vx / 10) % 10);
        self.ram.write_wrapping(i + 2, vx % 10);
    }

    /// Write registers from `0` to `x_idx` (inclusive), to memory.
    ///
    /// Writing starts at the address in `I` and progresses in increments (`I`, `I+1`, `I+2`, `...`).
    /// `I` itself is left unchanged.
    fn store_registers(&mut self, x_idx: u8) {
        let i = self.registers.i() as usize;
        for idx in 0..=x_idx {
            self.ram
                .write_wrapping(i + idx as usize, self.registers.v(idx));
        }
    }

    /// Read from memory to registers `0` to `x_idx` (inclusive).
    ///
    /// Reading starts at the address in `I` and progresses in increments (`I`, `I+1`, `I+2`, `...`).
    fn read_registers(&mut self, x_idx: u8) {
        let i = self.registers.i() as usize;
        for idx in 0..=x_idx {
            let value = self.ram.read_wrapping(i + idx as usize);
            self.registers.set_v(idx, value);
        }
    }

    /// Execute a single instruction word and report the resulting status.
    ///
    /// The caller is expected to have already moved the program counter past
    /// `opcode`, e.g. with [`CPU::fetch`]. Words that match no instruction are
    /// skipped. Only call and return can fail, when the stack is full or empty.
    ///
    /// While an `Fx0A` is pending the word is not executed and
    /// [`Status::AwaitingKey`] comes back; the host keeps the word and hands
    /// it over again once a key has been pressed.
    pub fn execute(&mut self, opcode: u16) -> Result<Status> {
        if let ExecState::AwaitingKey { register } = self.state {
            log::debug!(
                "not executing {:#06x}: still waiting for a key into V{:X}",
                opcode,
                register
            );
            return Ok(Status::AwaitingKey);
        }

        let op_1 = ((opcode & 0xF000) >> 12) as u8;
        let op_2 = ((opcode & 0x0F00) >> 8) as u8;
        let op_3 = ((opcode & 0x00F0) >> 4) as u8;
        let op_4 = (opcode & 0x000F) as u8;
        let nnn = opcode & 0x0FFF;
        let kk = (opcode & 0x00FF) as u8;

        log::trace!("{:#05x}: {:04x}", self.registers.pc().wrapping_sub(2), opcode);

        match (op_1, op_2, op_3, op_4) {
            (0x0, 0x0, 0xE, 0x0) => self.clear_display(),
            (0x0, 0x0, 0xE, 0xE) => self.ret_subroutine()?,
            (0x1, _, _, _) => self.jmp_addr(nnn),
            (0x2, _, _, _) => self.call_subroutine(nnn)?,
            (0x3, x_idx, _, _) => self.skip_eq_value(x_idx, kk),
            (0x4, x_idx, _, _) => self.skip_neq_value(x_idx, kk),
            (0x5, x_idx, y_idx, 0x0) => self.skip_eq_xy(x_idx, y_idx),
            (0x6, x_idx, _, _) => self.set_x_value(x_idx, kk),
            (0x7, x_idx, _, _) => self.add_x_value(x_idx, kk),
            (0x8, x_idx, y_idx, 0x0) => self.store_xy(x_idx, y_idx),
            (0x8, x_idx, y_idx, 0x1) => self.or_xy(x_idx, y_idx),
            (0x8, x_idx, y_idx, 0x2) => self.and_xy(x_idx, y_idx),
            (0x8, x_idx, y_idx, 0x3) => self.xor_xy(x_idx, y_idx),
            (0x8, x_idx, y_idx, 0x4) => self.add_xy(x_idx, y_idx),
            (0x8, x_idx, y_idx, 0x5) => self.sub_xy(x_idx, y_idx),
            (0x8, x_idx, _, 0x6) => self.shr_x(x_idx),
            (0x8, x_idx, y_idx, 0x7) => self.subn_xy(x_idx, y_idx),
            (0x8, x_idx, _, 0xE) => self.shl_x(x_idx),
            (0x9, x_idx, y_idx, 0x0) => self.skip_neq_xy(x_idx, y_idx),
            (0xA, _, _, _) => self.set_i(nnn),
            (0xB, _, _, _) => self.jmp_addr_offset(nnn),
            (0xC, x_idx, _, _) => self.rnd_and(x_idx, kk),
            (0xD, x_idx, y_idx, n) => self.draw(x_idx, y_idx, n),
            (0xE, x_idx, 0x9, 0xE) => self.skip_key_pressed(x_idx),
            (0xE, x_idx, 0xA, 0x1) => self.skip_key_not_pressed(x_idx),
            (0xF, x_idx, 0x0, 0x7) => self.read_delay_timer(x_idx),
            (0xF, x_idx, 0x0, 0xA) => self.wait_keypress(x_idx),
            (0xF, x_idx, 0x1, 0x5) => self.set_delay_timer(x_idx),
            (0xF, x_idx, 0x1, 0x8) => self.set_sound_timer(x_idx),
            (0xF, x_idx, 0x1, 0xE) => self.add_i(x_idx),
            (0xF, x_idx, 0x2, 0x9) => self.set_i_digit(x_idx),
            (0xF, x_idx, 0x3, 0x3) => self.store_bcd(x_idx),
            (0xF, x_idx, 0x5, 0x5) => self.store_registers(x_idx),
            (0xF, x_idx, 0x6, 0x5) => self.read_registers(x_idx),
            // 0nnn machine code routines land here too
            _ => log::debug!("ignoring unknown opcode {:#06x}", opcode),
        }
        Ok(self.status())
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
