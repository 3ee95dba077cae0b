pub const N_VREGISTERS: usize = 16;
pub const VF: usize = 0xF;
pub const V0: usize = 0x0;

/// The register file, minus the stack pointer which lives with the stack.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registers {
    v_reg: [u8; N_VREGISTERS],
    i_reg: u16,
    delay_timer: u8,
    sound_timer: u8,
    program_counter: u16,
}

impl Registers {
    /// Every register starts at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the general register `Vx`. Only the low nibble of `x` is used.
    pub fn v(&self, x: u8) -> u8 {
        self.v_reg[(x & 0xF) as usize]
    }

    /// Overwrite `Vx`. Only the low nibble of `x` is used.
    pub fn set_v(&mut self, x: u8, value: u8) {
        self.v_reg[(x & 0xF) as usize] = value;
    }

    /// Write `1` or `0` to `VF`.
    pub fn set_flag(&mut self, flag: bool) {
        self.v_reg[VF] = flag as u8;
    }

    /// Current value of `VF`.
    pub fn flag(&self) -> u8 {
        self.v_reg[VF]
    }

    /// All sixteen general registers, `V0` first.
    pub fn v_all(&self) -> &[u8; N_VREGISTERS] {
        &self.v_reg
    }

    /// The address register `I`.
    pub fn i(&self) -> u16 {
        self.i_reg
    }

    /// Overwrite `I`.
    pub fn set_i(&mut self, value: u16) {
        self.i_reg = value;
    }

    /// Current delay timer value.
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// Load the delay timer.
    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    /// Current sound timer value.
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Load the sound timer.
    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// The program counter.
    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    /// Overwrite the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.program_counter = value;
    }

    /// Move the program counter past the next instruction.
    pub fn skip(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2);
    }

    /// Count both timers down by one, stopping at zero.
    ///
    /// Returns `true` when the sound timer has just reached zero.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        let sounding = self.sound_timer > 0;
        self.sound_timer = self.sound_timer.saturating_sub(1);
        sounding && self.sound_timer == 0
    }
}
