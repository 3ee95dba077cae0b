use c8vm::chip8::{Config, CPU};
use proptest::prelude::*;

fn cpu() -> CPU {
    CPU::with_config(Config::default().with_seed(0))
}

fn load(cpu: &mut CPU, x: u8, value: u8) {
    cpu.execute(0x6000 | u16::from(x) << 8 | u16::from(value))
        .unwrap();
}

fn alu(x: u8, y: u8, op: u8) -> u16 {
    0x8000 | u16::from(x) << 8 | u16::from(y) << 4 | u16::from(op)
}

proptest! {
    #[test]
    fn add_immediate_wraps_and_keeps_flag(x in 0u8..15, vx: u8, kk: u8, vf: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 0xF, vf);
        load(&mut cpu, x, vx);
        cpu.execute(0x7000 | u16::from(x) << 8 | u16::from(kk)).unwrap();
        prop_assert_eq!(cpu.registers().v(x), vx.wrapping_add(kk));
        prop_assert_eq!(cpu.registers().flag(), vf);
    }

    #[test]
    fn add_registers_reports_carry(vx: u8, vy: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 1, vx);
        load(&mut cpu, 2, vy);
        cpu.execute(alu(1, 2, 0x4)).unwrap();
        prop_assert_eq!(cpu.registers().v(1), vx.wrapping_add(vy));
        prop_assert_eq!(cpu.registers().flag(), (u16::from(vx) + u16::from(vy) > 0xFF) as u8);
    }

    #[test]
    fn sub_registers_reports_no_borrow(vx: u8, vy: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 1, vx);
        load(&mut cpu, 2, vy);
        cpu.execute(alu(1, 2, 0x5)).unwrap();
        prop_assert_eq!(cpu.registers().v(1), vx.wrapping_sub(vy));
        prop_assert_eq!(cpu.registers().flag(), (vx > vy) as u8);
    }

    #[test]
    fn subn_registers_reports_no_borrow(vx: u8, vy: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 1, vx);
        load(&mut cpu, 2, vy);
        cpu.execute(alu(1, 2, 0x7)).unwrap();
        prop_assert_eq!(cpu.registers().v(1), vy.wrapping_sub(vx));
        prop_assert_eq!(cpu.registers().flag(), (vy > vx) as u8);
    }

    #[test]
    fn shifts_report_shifted_out_bit(vx: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 3, vx);
        cpu.execute(alu(3, 0, 0x6)).unwrap();
        prop_assert_eq!(cpu.registers().v(3), vx >> 1);
        prop_assert_eq!(cpu.registers().flag(), vx & 1);

        load(&mut cpu, 3, vx);
        cpu.execute(alu(3, 0, 0xE)).unwrap();
        prop_assert_eq!(cpu.registers().v(3), vx << 1);
        prop_assert_eq!(cpu.registers().flag(), vx >> 7);
    }

    #[test]
    fn bcd_digits(vx: u8) {
        let mut cpu = cpu();
        load(&mut cpu, 4, vx);
        cpu.execute(0xA300).unwrap();
        cpu.execute(0xF433).unwrap();
        let ram = cpu.ram();
        let value = ram.read(0x300).unwrap() as u32 * 100
            + ram.read(0x301).unwrap() as u32 * 10
            + ram.read(0x302).unwrap() as u32;
        prop_assert_eq!(value, u32::from(vx));
    }

    #[test]
    fn double_draw_is_identity(x: u8, y: u8, n in 1u8..16, digit in 0u8..16) {
        let mut cpu = cpu();
        load(&mut cpu, 0, x);
        load(&mut cpu, 1, y);
        load(&mut cpu, 2, digit);
        cpu.execute(0xF229).unwrap();
        let before = cpu.display().clone();
        let draw = 0xD010 | u16::from(n);
        cpu.execute(draw).unwrap();
        let lit_any = cpu.display() != &before;
        cpu.execute(draw).unwrap();
        prop_assert_eq!(cpu.display(), &before);
        prop_assert_eq!(cpu.registers().flag(), lit_any as u8);
    }

    #[test]
    fn undefined_alu_ops_are_no_ops(x in 0u8..16, y in 0u8..16, op in 8u8..14, vx: u8, vy: u8) {
        let mut cpu = cpu();
        load(&mut cpu, x, vx);
        load(&mut cpu, y, vy);
        let registers = cpu.registers().clone();
        cpu.execute(alu(x, y, op)).unwrap();
        prop_assert_eq!(cpu.registers(), &registers);
    }

    #[test]
    fn load_copies_program(program in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut cpu = cpu();
        cpu.load_program(&program).unwrap();
        prop_assert_eq!(cpu.registers().pc(), 0x200);
        for (offset, byte) in program.iter().enumerate() {
            prop_assert_eq!(cpu.ram().read(0x200 + offset).unwrap(), *byte);
        }
    }
}
