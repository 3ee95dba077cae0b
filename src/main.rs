use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead};

use c8vm::chip8::keyboard::conventional_keymap;
use c8vm::chip8::{Config, Status, TimerMode, CPU};

const DEFAULT_CYCLES: u64 = 10_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("usage: c8vm <file> [cycles]");
        return Ok(());
    }
    let cycles = match args.get(2) {
        Some(n) => n.parse()?,
        None => DEFAULT_CYCLES,
    };

    let program = fs::read(&args[1])?;
    let config = Config::default().with_timer_mode(TimerMode::PerInstructions(
        Config::DEFAULT_INSTRUCTIONS_PER_TICK,
    ));
    let mut cpu = CPU::with_config(config);
    cpu.load_program(&program)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    for _ in 0..cycles {
        match cpu.step() {
            Ok(Status::Running) => {}
            Ok(Status::AwaitingKey) => {
                println!("press a key (1234 qwer asdf zxcv) and hit enter:");
                let line = match lines.next() {
                    Some(line) => line?,
                    None => break,
                };
                if let Some(key) = cpu.wait_for_key(line.chars(), conventional_keymap) {
                    cpu.release_key(key)?;
                }
            }
            Err(fault) => {
                log::warn!("machine stopped: {}", fault);
                dump(&cpu);
                return Err(fault.into());
            }
        }
    }
    dump(&cpu);
    Ok(())
}

fn dump(cpu: &CPU) {
    let regs = cpu.registers();
    println!(
        "PC={:#05x} I={:#05x} SP={} DT={} ST={}",
        regs.pc(),
        regs.i(),
        cpu.stack().pointer(),
        regs.delay_timer(),
        regs.sound_timer()
    );
    for (idx, v) in regs.v_all().iter().enumerate() {
        print!("V{:X}={:02x} ", idx, v);
    }
    println!();
}
