//! # interpreter
//!
//! The CHIP-8 virtual machine as seen by programs:
//!  * 4K of memory, font at 0x000, programs loaded at 0x200
//!  * 16 8-bit registers V0-VF; VF doubles as carry, borrow and collision flag
//!  * I, a 12-bit address register. sprites and register dumps read past it,
//!    so every I-relative address is masked back into memory
//!  * a 12 deep call stack held outside memory
//!  * delay and sound timers, counting down at 60Hz by the wall clock
//!  * a 64x32 monochrome frame buffer
//!
//! Keys, frames and sound go through the `Mediator`, which is the only thing
//! shared with the presentation thread. The interpreter never waits on the
//! presentation side except in Fx0A, where it blocks for a key.
use std::io;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Fault, LoadError};
use crate::frame::FrameBuffer;
use crate::instruction::Instruction;
use crate::mediator::{KeyWait, Mediator};
use crate::memory::{
    Chip8MemoryMap, MemoryMap, CHIP8_ADDRESS_MASK, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES,
    CHIP8_PROGRAM_ADDR, CHIP8_RAM_SIZE_BYTES,
};
use crate::timer::{Timers, CHIP8_TIMER_PERIOD};

pub const REGISTER_COUNT: usize = 16;

/// nesting depth of the COSMAC VIP interpreter
pub const STACK_CAPACITY: usize = 12;

const FLAG: usize = 0xf;

/// Knobs for the run loop
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// pause between instructions, so we don't eat a whole core
    pub cycle_delay: Duration,
    /// how often the delay and sound timers tick
    pub timer_period: Duration,
    /// seed for Cxnn; taken from the OS when absent
    pub seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            cycle_delay: Duration::from_micros(1400),
            timer_period: CHIP8_TIMER_PERIOD,
            seed: None,
        }
    }
}

pub struct Chip8Interpreter<'a> {
    memory: Chip8MemoryMap,
    mediator: &'a Mediator,
    registers: [u8; REGISTER_COUNT],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_CAPACITY],
    stack_pointer: usize,
    timers: Timers,
    frame: FrameBuffer,
    rng: StdRng,
    cycle_delay: Duration,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(mediator: &'a Mediator, options: EngineOptions) -> Chip8Interpreter<'a> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut i = Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            mediator,
            registers: [0; REGISTER_COUNT],
            i: 0,
            program_counter: 0,
            stack: [0; STACK_CAPACITY],
            stack_pointer: 0,
            timers: Timers::new(options.timer_period),
            frame: FrameBuffer::new(),
            rng,
            cycle_delay: options.cycle_delay,
        };
        i.reset_machine();
        i
    }

    /// put the machine back to power-on state and load `image` at 0x200.
    /// an image that doesn't fit is rejected and nothing changes
    pub fn reset(&mut self, image: &[u8]) -> Result<(), LoadError> {
        self.memory.load_image(image)?;
        self.reset_machine();
        self.mediator.publish_frame(&self.frame);
        info!("loaded {} byte program at 0x{:03x}", image.len(), self.program_counter);
        Ok(())
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, LoadError> {
        let len = self.memory.load_program(reader)?;
        self.reset_machine();
        self.mediator.publish_frame(&self.frame);
        info!("loaded {} byte program at 0x{:03x}", len, self.program_counter);
        Ok(len)
    }

    // everything except memory contents
    fn reset_machine(&mut self) {
        self.registers = [0; REGISTER_COUNT];
        self.i = 0;
        self.program_counter = self.memory.program_addr;
        self.stack = [0; STACK_CAPACITY];
        self.stack_pointer = 0;
        self.timers.reset(Instant::now());
        self.frame.clear();
        self.mediator.set_sound_active(false);
    }

    /// Fetch, decode and execute until asked to stop. A fault stops the
    /// mediator as well, so the presentation side winds down with us.
    pub fn run(&mut self) -> Result<(), Fault> {
        info!("running from 0x{:03x}", self.program_counter);
        self.timers.restart(Instant::now());
        while !self.mediator.should_stop() {
            if let Err(fault) = self.step() {
                error!("{}", fault);
                self.mediator.request_stop();
                return Err(fault);
            }
            self.update_timers(Instant::now());
            spin_sleep::sleep(self.cycle_delay);
        }
        info!("stopped at 0x{:03x}", self.program_counter);
        Ok(())
    }

    /// execute exactly one instruction
    pub fn step(&mut self) -> Result<(), Fault> {
        let pc = self.program_counter;
        if pc < CHIP8_PROGRAM_ADDR || pc as usize > CHIP8_RAM_SIZE_BYTES - 2 {
            return Err(Fault::IllegalAddress { pc });
        }
        let opcode = self.memory.get_word(pc);
        let instruction =
            Instruction::decode(opcode).ok_or(Fault::UnsupportedOpcode { pc, opcode })?;
        trace!("{:03x}: {:04x}  {}", pc, opcode, instruction);

        // jumps, calls and returns overwrite this; skips add to it
        self.program_counter = pc + 2;
        self.execute(instruction, pc, opcode)
    }

    /// apply any timer ticks that are due and mirror the sound timer
    pub fn update_timers(&mut self, now: Instant) {
        if self.timers.update(now) > 0 {
            self.mediator.set_sound_active(self.timers.sound_active());
        }
    }

    fn execute(&mut self, instruction: Instruction, pc: u16, opcode: u16) -> Result<(), Fault> {
        match instruction {
            Instruction::Clear => {
                self.frame.clear();
                self.mediator.publish_frame(&self.frame);
            }
            Instruction::Return => {
                if self.stack_pointer == 0 {
                    return Err(Fault::StackUnderflow { pc, opcode });
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer];
            }
            Instruction::Jump { nnn } => self.program_counter = nnn,
            Instruction::Call { nnn } => {
                if self.stack_pointer == STACK_CAPACITY {
                    return Err(Fault::StackOverflow { pc, opcode });
                }
                self.stack[self.stack_pointer] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = nnn;
            }
            Instruction::SkipEqImm { x, nn } => self.skip_if(self.v(x) == nn),
            Instruction::SkipNeImm { x, nn } => self.skip_if(self.v(x) != nn),
            Instruction::SkipEqReg { x, y } => self.skip_if(self.v(x) == self.v(y)),
            Instruction::SkipNeReg { x, y } => self.skip_if(self.v(x) != self.v(y)),
            Instruction::LoadImm { x, nn } => self.set_v(x, nn),
            Instruction::AddImm { x, nn } => self.set_v(x, self.v(x).wrapping_add(nn)),
            Instruction::Move { x, y } => self.set_v(x, self.v(y)),
            Instruction::Or { x, y } => self.set_v(x, self.v(x) | self.v(y)),
            Instruction::And { x, y } => self.set_v(x, self.v(x) & self.v(y)),
            Instruction::Xor { x, y } => self.set_v(x, self.v(x) ^ self.v(y)),
            Instruction::AddReg { x, y } => {
                let (sum, carry) = self.v(x).overflowing_add(self.v(y));
                self.set_flag_then(x, carry, sum);
            }
            Instruction::Sub { x, y } => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.set_flag_then(x, vx > vy, vx.wrapping_sub(vy));
            }
            Instruction::SubReverse { x, y } => {
                let (vx, vy) = (self.v(x), self.v(y));
                self.set_flag_then(x, vy > vx, vy.wrapping_sub(vx));
            }
            Instruction::ShiftRight { x, .. } => {
                let vx = self.v(x);
                self.set_flag_then(x, vx & 0x01 != 0, vx >> 1);
            }
            Instruction::ShiftLeft { x, .. } => {
                let vx = self.v(x);
                self.set_flag_then(x, vx & 0x80 != 0, vx << 1);
            }
            Instruction::LoadIndex { nnn } => self.i = nnn,
            Instruction::JumpOffset { nnn } => self.program_counter = nnn + self.v(0) as u16,
            Instruction::Random { x, nn } => {
                let r: u8 = self.rng.gen();
                self.set_v(x, r & nn);
            }
            Instruction::Draw { x, y, n } => {
                let sprite: Vec<u8> = (0..n as u16)
                    .map(|row| self.memory.get_byte(self.i.wrapping_add(row)))
                    .collect();
                let (vx, vy) = (self.v(x), self.v(y));
                let collision = self.frame.draw_sprite(vx, vy, &sprite);
                self.registers[FLAG] = collision as u8;
                self.mediator.publish_frame(&self.frame);
            }
            Instruction::SkipKeyDown { x } => {
                let key = self.v(x);
                let down = self
                    .mediator
                    .is_key_down(key)
                    .map_err(|_| Fault::InvalidKey { pc, key })?;
                self.skip_if(down);
            }
            Instruction::SkipKeyUp { x } => {
                let key = self.v(x);
                let up = self
                    .mediator
                    .is_key_up(key)
                    .map_err(|_| Fault::InvalidKey { pc, key })?;
                self.skip_if(up);
            }
            Instruction::ReadDelay { x } => self.set_v(x, self.timers.delay),
            // the timers keep counting while we wait
            Instruction::WaitKey { x } => loop {
                match self.mediator.await_key_press_for(self.timers.period()) {
                    KeyWait::Pressed(key) => {
                        self.set_v(x, key);
                        break;
                    }
                    KeyWait::TimedOut => self.update_timers(Instant::now()),
                    KeyWait::Stopped => {
                        debug!("stop requested while waiting for a key");
                        break;
                    }
                }
            },
            Instruction::SetDelay { x } => self.timers.delay = self.v(x),
            Instruction::SetSound { x } => {
                self.timers.sound = self.v(x);
                self.mediator.set_sound_active(self.timers.sound_active());
            }
            Instruction::AddIndex { x } => {
                self.i = self.i.wrapping_add(self.v(x) as u16) & CHIP8_ADDRESS_MASK;
            }
            Instruction::LoadGlyph { x } => {
                self.i = CHIP8_FONT_ADDR + self.v(x) as u16 * CHIP8_FONT_GLYPH_BYTES;
            }
            Instruction::Bcd { x } => {
                let vx = self.v(x);
                self.check_writable(3, pc, opcode)?;
                self.memory.set_byte(self.i, vx / 100);
                self.memory.set_byte(self.i.wrapping_add(1), vx / 10 % 10);
                self.memory.set_byte(self.i.wrapping_add(2), vx % 10);
            }
            Instruction::Store { x } => {
                self.check_writable(x as u16 + 1, pc, opcode)?;
                for r in 0..=x {
                    self.memory
                        .set_byte(self.i.wrapping_add(r as u16), self.v(r));
                }
            }
            Instruction::Load { x } => {
                for r in 0..=x {
                    let value = self.memory.get_byte(self.i.wrapping_add(r as u16));
                    self.set_v(r, value);
                }
            }
        }
        Ok(())
    }

    fn v(&self, r: u8) -> u8 {
        self.registers[r as usize]
    }

    fn set_v(&mut self, r: u8, value: u8) {
        self.registers[r as usize] = value;
    }

    // VF first, so that when x is F the result wins
    fn set_flag_then(&mut self, x: u8, flag: bool, value: u8) {
        self.registers[FLAG] = flag as u8;
        self.set_v(x, value);
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter += 2;
        }
    }

    /// every byte of `I..I+len`, wrapped into memory, must sit in program space
    fn check_writable(&self, len: u16, pc: u16, opcode: u16) -> Result<(), Fault> {
        match (0..len)
            .map(|k| self.i.wrapping_add(k) & CHIP8_ADDRESS_MASK)
            .find(|&addr| addr < self.memory.program_addr)
        {
            Some(addr) => Err(Fault::ReservedWrite { pc, opcode, addr }),
            None => Ok(()),
        }
    }
}

/// Test-only window onto machine state that programs can't see directly
#[cfg(test)]
pub(crate) struct Inspector<'i> {
    pub memory: &'i mut Chip8MemoryMap,
    pub registers: &'i mut [u8; REGISTER_COUNT],
    pub i: &'i mut u16,
    pub program_counter: &'i mut u16,
    pub stack: &'i mut [u16; STACK_CAPACITY],
    pub stack_pointer: &'i mut usize,
    pub timers: &'i mut Timers,
    pub frame: &'i mut FrameBuffer,
}

#[cfg(test)]
impl<'a> Chip8Interpreter<'a> {
    pub(crate) fn inspect(&mut self) -> Inspector<'_> {
        Inspector {
            memory: &mut self.memory,
            registers: &mut self.registers,
            i: &mut self.i,
            program_counter: &mut self.program_counter,
            stack: &mut self.stack,
            stack_pointer: &mut self.stack_pointer,
            timers: &mut self.timers,
            frame: &mut self.frame,
        }
    }
}
