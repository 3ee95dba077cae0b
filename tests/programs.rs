use c8vm::chip8::keyboard::conventional_keymap;
use c8vm::chip8::{Config, Fault, Status, TimerMode, CPU};

fn machine(program: &[u8]) -> CPU {
    let mut cpu = CPU::with_config(Config::default().with_seed(42));
    cpu.load_program(program).unwrap();
    cpu
}

fn run(cpu: &mut CPU, steps: usize) {
    for _ in 0..steps {
        cpu.step().unwrap();
    }
}

#[test]
fn call_then_return_resumes_after_call() {
    #[rustfmt::skip]
    let program = [
        0x22, 0x06, // 200: CALL 206
        0x61, 0x01, // 202: LD V1, 01
        0x12, 0x04, // 204: JP 204
        0x00, 0xEE, // 206: RET
    ];
    let mut cpu = machine(&program);
    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc(), 0x206);
    assert_eq!(cpu.stack().pointer(), 1);
    cpu.step().unwrap();
    assert_eq!(cpu.registers().pc(), 0x202);
    assert!(cpu.stack().is_empty());
    cpu.step().unwrap();
    assert_eq!(cpu.registers().v(1), 1);
}

#[test]
fn counting_loop() {
    #[rustfmt::skip]
    let program = [
        0x60, 0x00, // 200: LD V0, 00
        0x70, 0x01, // 202: ADD V0, 01
        0x30, 0x0A, // 204: SE V0, 0A
        0x12, 0x02, // 206: JP 202
        0x12, 0x08, // 208: JP 208
    ];
    let mut cpu = machine(&program);
    run(&mut cpu, 1 + 10 * 3);
    assert_eq!(cpu.registers().v(0), 10);
    assert_eq!(cpu.registers().pc(), 0x208);
}

#[test]
fn draws_score_digits() {
    #[rustfmt::skip]
    let program = [
        0x63, 0x7B, // 200: LD V3, 123
        0xA3, 0x00, // 202: LD I, 300
        0xF3, 0x33, // 204: LD B, V3
        0xF2, 0x65, // 206: LD V2, [I]
        0x64, 0x00, // 208: LD V4, 0
        0x65, 0x00, // 20A: LD V5, 0
        0xF0, 0x29, // 20C: LD F, V0
        0xD4, 0x55, // 20E: DRW V4, V5, 5
        0x74, 0x05, // 210: ADD V4, 5
        0xF1, 0x29, // 212: LD F, V1
        0xD4, 0x55, // 214: DRW V4, V5, 5
    ];
    let mut cpu = machine(&program);
    run(&mut cpu, 11);
    assert_eq!(cpu.registers().v(0), 1);
    assert_eq!(cpu.registers().v(1), 2);
    assert_eq!(cpu.registers().v(2), 3);
    // "1" is 20 60 20 20 70, "2" starts with F0
    assert!(cpu.display().pixel(2, 0));
    assert!(!cpu.display().pixel(1, 0));
    assert!(cpu.display().pixel(1, 1));
    assert!((5..9).all(|x| cpu.display().pixel(x, 0)));
    assert_eq!(cpu.registers().flag(), 0);
}

#[test]
fn key_wait_round_trip() {
    #[rustfmt::skip]
    let program = [
        0xF5, 0x0A, // 200: LD V5, K
        0xE5, 0x9E, // 202: SKP V5
        0x66, 0x01, // 204: LD V6, 01
        0x67, 0x01, // 206: LD V7, 01
    ];
    let mut cpu = machine(&program);
    assert_eq!(cpu.step().unwrap(), Status::AwaitingKey);
    assert_eq!(cpu.step().unwrap(), Status::AwaitingKey);
    assert_eq!(cpu.wait_for_key("jk".chars(), conventional_keymap), None);
    assert_eq!(cpu.wait_for_key("jkf".chars(), conventional_keymap), Some(0xE));
    run(&mut cpu, 2);
    assert_eq!(cpu.registers().v(5), 0xE);
    assert_eq!(cpu.registers().v(6), 0);
    assert_eq!(cpu.registers().v(7), 1);
}

#[test]
fn runaway_recursion_faults() {
    let mut cpu = machine(&[0x22, 0x00]);
    for _ in 0..16 {
        cpu.step().unwrap();
    }
    assert_eq!(
        cpu.step(),
        Err(Fault::StackOverflow { depth: 16 })
    );
    assert_eq!(cpu.registers().pc(), 0x200);
}

#[test]
fn oversized_program_is_rejected_untouched() {
    let mut cpu = CPU::new();
    let program = vec![0x12; 4096 - 0x200];
    assert!(matches!(
        cpu.load_program(&program),
        Err(Fault::ProgramTooLarge { len: 3584, .. })
    ));
    assert_eq!(cpu.registers().pc(), 0);
    assert_eq!(cpu.ram().read(0x200).unwrap(), 0);
}

#[test]
fn sound_timer_signals_expiry() {
    let config = Config::default()
        .with_seed(0)
        .with_timer_mode(TimerMode::PerInstructions(1));
    let mut cpu = CPU::with_config(config);
    // LD V0, 2; LD ST, V0; JP 204
    cpu.load_program(&[0x60, 0x02, 0xF0, 0x18, 0x12, 0x04])
        .unwrap();
    run(&mut cpu, 2);
    assert!(cpu.sound_active());
    run(&mut cpu, 1);
    assert!(!cpu.sound_active());
}
