//! Whole-board tests: programs in ROM exercising the decode ROM, the port
//! latches, the LED fan-out and the NMI timer chain.

use machine_kit65::{Kit65, Kit65Config};
use sim_core::{Ticks, Value};

/// Build a 16K ROM image: NOP filler, program fragments at absolute
/// addresses, vectors in the top six bytes.
fn rom_image(fragments: &[(u16, &[u8])], reset: u16, nmi: u16, irq: u16) -> Vec<u8> {
    let mut rom = vec![0xEA; 0x4000];
    for &(addr, bytes) in fragments {
        let base = (addr as usize) - 0xC000;
        rom[base..base + bytes.len()].copy_from_slice(bytes);
    }
    rom[0x3FFA..0x3FFC].copy_from_slice(&nmi.to_le_bytes());
    rom[0x3FFC..0x3FFE].copy_from_slice(&reset.to_le_bytes());
    rom[0x3FFE..0x4000].copy_from_slice(&irq.to_le_bytes());
    rom
}

fn machine(fragments: &[(u16, &[u8])], reset: u16, nmi: u16, irq: u16) -> Kit65 {
    let config = Kit65Config::new(rom_image(fragments, reset, nmi, irq));
    Kit65::new(config).expect("machine assembles")
}

#[test]
fn gpio_program_drives_the_led_lines() {
    // LDA #$A5 / STA $8000 / JMP self
    let mut kit = machine(
        &[(0xC000, &[0xA9, 0xA5, 0x8D, 0x00, 0x80, 0x4C, 0x05, 0xC0])],
        0xC000,
        0xC005,
        0xC005,
    );

    kit.run(Ticks::new(100));

    assert_eq!(kit.query("a"), Some(Value::U8(0xA5)));
    assert_eq!(kit.read_net(kit.nets.gpio_out), 0xA5);
    let expected = [true, false, true, false, false, true, false, true];
    assert_eq!(kit.led_levels(), expected);
}

#[test]
fn port0_input_is_readable_by_the_cpu() {
    // LDA $8001 / STA $0010 / JMP self
    let mut kit = machine(
        &[(0xC000, &[0xAD, 0x01, 0x80, 0x8D, 0x10, 0x00, 0x4C, 0x06, 0xC0])],
        0xC000,
        0xC006,
        0xC006,
    );

    kit.drive_net(kit.nets.port0_in, 0x3C);
    kit.run(Ticks::new(100));

    assert_eq!(kit.ram().peek(0x0010), 0x3C);
}

#[test]
fn port1_latch_holds_the_written_byte() {
    // LDA #$5A / STA $8002 / JMP self
    let mut kit = machine(
        &[(0xC000, &[0xA9, 0x5A, 0x8D, 0x02, 0x80, 0x4C, 0x05, 0xC0])],
        0xC000,
        0xC005,
        0xC005,
    );

    kit.run(Ticks::new(100));

    assert_eq!(kit.read_net(kit.nets.port1_out), 0x5A);
    // The latch keeps driving after the CPU moves on.
    kit.run(Ticks::new(20));
    assert_eq!(kit.read_net(kit.nets.port1_out), 0x5A);
}

#[test]
fn ram_image_preload_is_executable() {
    // RAM program at $0200: LDA #$77 / STA $8000 / JMP self
    let mut config = Kit65Config::new(rom_image(&[], 0x0200, 0x0200, 0x0200));
    config.ram_image = Some((
        0x0200,
        vec![0xA9, 0x77, 0x8D, 0x00, 0x80, 0x4C, 0x05, 0x02],
    ));
    let mut kit = Kit65::new(config).expect("machine assembles");

    kit.run(Ticks::new(100));

    assert_eq!(kit.read_net(kit.nets.gpio_out), 0x77);
}

#[test]
fn shift_register_timer_raises_nmi_after_sixteen_instructions() {
    // Main program enables the timer through port 1 bit 6, then sits in a
    // NOP sled. The handler lights every LED and spins.
    let mut kit = machine(
        &[
            // LDA #$40 / STA $8002, then filler NOPs from the image.
            (0xC000, &[0xA9, 0x40, 0x8D, 0x02, 0x80]),
            // Handler: LDA #$FF / STA $8000 / JMP self
            (0xD000, &[0xA9, 0xFF, 0x8D, 0x00, 0x80, 0x4C, 0x05, 0xD0]),
        ],
        0xC000,
        0xD000,
        0xD000,
    );

    // Before the timer runs out, the GPIO latch still holds zero.
    kit.run(Ticks::new(30));
    assert_eq!(kit.read_net(kit.nets.gpio_out), 0x00);

    kit.run(Ticks::new(600));
    assert_eq!(kit.read_net(kit.nets.gpio_out), 0xFF);
    assert_eq!(kit.led_levels(), [true; 8]);
}

#[test]
fn oversized_rom_image_is_rejected() {
    let config = Kit65Config::new(vec![0; 0x5000]);
    assert!(Kit65::new(config).is_err());
}
