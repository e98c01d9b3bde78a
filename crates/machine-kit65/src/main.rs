//! Headless kit65 runner.
//!
//! Loads a program ROM (and optionally a decode ROM and a RAM image), runs
//! a fixed number of ticks, reports the CPU state, and can dump RAM for
//! inspection.

use std::fs::File;
use std::process::ExitCode;

use machine_kit65::{Kit65, Kit65Config};
use sim_core::Ticks;
use sim_memory::image;

struct Args {
    rom: Option<String>,
    decode: Option<String>,
    ram_image: Option<String>,
    ram_base: u16,
    ticks: u64,
    dump: Option<String>,
}

fn usage() {
    eprintln!("Usage: kit65 --rom <file> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rom <file>       Program ROM image (up to 16K, mapped at $C000)");
    eprintln!("  --decode <file>    Decode ROM image (64K select table)");
    eprintln!("  --ram <file>       RAM preload image");
    eprintln!("  --ram-base <hex>   RAM preload base address [default: 0200]");
    eprintln!("  --ticks <n>        Ticks to run [default: 200000]");
    eprintln!("  --dump <file>      Write the full RAM contents after the run");
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        rom: None,
        decode: None,
        ram_image: None,
        ram_base: 0x0200,
        ticks: 200_000,
        dump: None,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |name: &str| it.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--rom" => args.rom = Some(value("--rom")?),
            "--decode" => args.decode = Some(value("--decode")?),
            "--ram" => args.ram_image = Some(value("--ram")?),
            "--ram-base" => {
                let raw = value("--ram-base")?;
                args.ram_base = u16::from_str_radix(&raw, 16)
                    .map_err(|_| format!("bad address: {raw}"))?;
            }
            "--ticks" => {
                let raw = value("--ticks")?;
                args.ticks = raw.parse().map_err(|_| format!("bad tick count: {raw}"))?;
            }
            "--dump" => args.dump = Some(value("--dump")?),
            "--help" | "-h" => {
                usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn report(machine: &Kit65) {
    eprintln!("==== CPU state after {} ticks ====", machine.ticks().get());
    for path in ["a", "x", "y", "s", "p", "pc", "instr", "step"] {
        if let Some(value) = machine.query(path) {
            eprintln!("  {path:>6} = {value}");
        }
    }
    let leds: String = machine
        .led_levels()
        .iter()
        .rev()
        .map(|&on| if on { '#' } else { '.' })
        .collect();
    eprintln!("  leds   = {leds}");
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let rom_path = args.rom.ok_or_else(|| "--rom is required".to_string())?;
    let rom = std::fs::read(&rom_path).map_err(|e| format!("{rom_path}: {e}"))?;

    let mut config = Kit65Config::new(rom);
    if let Some(path) = &args.decode {
        config.decode = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    }
    if let Some(path) = &args.ram_image {
        let bytes = std::fs::read(path).map_err(|e| format!("{path}: {e}"))?;
        config.ram_image = Some((args.ram_base, bytes));
    }

    let mut machine = Kit65::new(config)?;
    machine.run(Ticks::new(args.ticks));
    report(&machine);

    if let Some(path) = &args.dump {
        let mut sink = File::create(path).map_err(|e| format!("{path}: {e}"))?;
        let ram = machine.ram();
        image::dump(ram, 0, ram.size(), &mut sink).map_err(|e| format!("{path}: {e}"))?;
        eprintln!("RAM dumped to {path}");
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("kit65: {message}");
            ExitCode::FAILURE
        }
    }
}
