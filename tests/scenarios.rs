use chip8::input::{DummyInput, Input};
use chip8::memory::MemoryMap;
use chip8::{Chip8Interpreter, Fault};

fn words(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn boot(program: &[u16]) -> Chip8Interpreter {
    let mut i = Chip8Interpreter::with_seed(7);
    i.load_program(&words(program)).unwrap();
    i
}

#[test]
fn two_immediate_loads() {
    let mut i = boot(&[0x6005, 0x610a]);
    i.cycle();
    i.cycle();
    assert_eq!(i.registers().get(0), 5);
    assert_eq!(i.registers().get(1), 10);
    assert_eq!(i.program_counter(), 0x204);
    assert!(!i.is_halted());
}

#[test]
fn return_with_empty_stack_halts() {
    let mut i = boot(&[0x00ee]);
    i.cycle();
    assert!(i.is_halted());
    assert_eq!(i.last_fault(), Some(Fault::StackUnderflow { opcode: 0x00ee }));
    assert_eq!(i.program_counter(), 0x200);
}

#[test]
fn nested_calls_unwind() {
    // 0x200 CALL 0x208
    // 0x202 LD V0, 1
    // 0x204 JP 0x204
    // 0x206 (unused)
    // 0x208 CALL 0x20e
    // 0x20a ADD V1, 1
    // 0x20c RET
    // 0x20e ADD V1, 1
    // 0x210 RET
    let mut i = boot(&[
        0x2208, 0x6001, 0x1204, 0x0000, 0x220e, 0x7101, 0x00ee, 0x7101, 0x00ee,
    ]);
    for _ in 0..8 {
        i.cycle();
    }
    assert!(!i.is_halted());
    assert_eq!(i.registers().get(0), 1);
    assert_eq!(i.registers().get(1), 2);
    assert_eq!(i.stack_depth(), 0);
    assert_eq!(i.program_counter(), 0x204);
}

#[test]
fn countdown_loop_with_bcd() {
    // count V0 down from 3 to 0, then write it as BCD at 0x300
    // 0x200 LD V0, 3
    // 0x202 ADD V0, 0xff   (V0 - 1)
    // 0x204 SE V0, 0
    // 0x206 JP 0x202
    // 0x208 LD I, 0x300
    // 0x20a LD V1, 123
    // 0x20c LD B, V1
    // 0x20e JP 0x20e
    let mut i = boot(&[
        0x6003, 0x70ff, 0x3000, 0x1202, 0xa300, 0x617b, 0xf133, 0x120e,
    ]);
    for _ in 0..20 {
        i.cycle();
    }
    assert_eq!(i.registers().get(0), 0);
    assert_eq!(i.memory().get_ro_slice(0x300, 3), &[1, 2, 3]);
    assert_eq!(i.program_counter(), 0x20e);
}

#[test]
fn wait_for_key_from_host_input() {
    let mut i = boot(&[0xf30a, 0x1202]);
    for _ in 0..10 {
        i.cycle();
    }
    assert_eq!(i.program_counter(), 0x200);

    let mut input = DummyInput::new(&[0x7]);
    i.set_keys(input.poll_keys().unwrap());
    i.cycle();
    assert_eq!(i.registers().get(3), 7);
    assert_eq!(i.program_counter(), 0x202);
}

#[test]
fn draw_collision_and_frame_hand_off() {
    // draw glyph "8" at (10, 5), hand the frame off, draw it again
    let mut i = boot(&[0x600a, 0x6105, 0x6208, 0xf229, 0xd015, 0xd015]);
    for _ in 0..5 {
        i.cycle();
    }
    assert_eq!(i.registers().flag(), 0);
    assert!(i.is_dirty());
    let frame = i.consume_frame();
    assert!(frame.pixel(10, 5) && frame.pixel(13, 5));
    assert!(!i.is_dirty());

    i.cycle();
    assert_eq!(i.registers().flag(), 1);
    assert!(i.consume_frame().is_blank());
}

#[test]
fn sound_timer_signals_tone() {
    // 0x200 LD V0, 2; 0x202 LD ST, V0; 0x204 JP 0x204
    let mut i = boot(&[0x6002, 0xf018, 0x1204]);
    i.cycle();
    assert!(!i.sound_timer_active());
    i.cycle();
    assert!(i.sound_timer_active());
    i.cycle();
    assert!(!i.sound_timer_active());
}
