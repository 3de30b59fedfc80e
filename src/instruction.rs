use std::fmt;

/// 12-bit address field
pub fn nnn(opcode: u16) -> u16 {
    opcode & 0x0fff
}

/// 8-bit immediate field
pub fn nn(opcode: u16) -> u8 {
    (opcode & 0x00ff) as u8
}

/// 4-bit immediate field
pub fn n(opcode: u16) -> u8 {
    (opcode & 0x000f) as u8
}

/// first register operand
pub fn x(opcode: u16) -> u8 {
    ((opcode >> 8) & 0x0f) as u8
}

/// second register operand
pub fn y(opcode: u16) -> u8 {
    ((opcode >> 4) & 0x0f) as u8
}

/// A decoded CHIP-8 instruction. `x` and `y` are register numbers, `n`, `nn`
/// and `nnn` are 4, 8 and 12-bit immediates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0: clear the screen
    Clear,
    /// 00EE: return from subroutine
    Return,
    /// 1nnn: jump to `nnn`
    Jump { nnn: u16 },
    /// 2nnn: call subroutine at `nnn`
    Call { nnn: u16 },
    /// 3xnn: skip next instruction if `Vx == nn`
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn: skip next instruction if `Vx != nn`
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy0: skip next instruction if `Vx == Vy`
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn: `Vx = nn`
    LoadImm { x: u8, nn: u8 },
    /// 7xnn: `Vx += nn`, no carry
    AddImm { x: u8, nn: u8 },
    /// 8xy0: `Vx = Vy`
    Move { x: u8, y: u8 },
    /// 8xy1: `Vx |= Vy`
    Or { x: u8, y: u8 },
    /// 8xy2: `Vx &= Vy`
    And { x: u8, y: u8 },
    /// 8xy3: `Vx ^= Vy`
    Xor { x: u8, y: u8 },
    /// 8xy4: `Vx += Vy`, carry into `VF`
    AddReg { x: u8, y: u8 },
    /// 8xy5: `Vx -= Vy`, `VF = 1` when `Vx > Vy`
    Sub { x: u8, y: u8 },
    /// 8xy6: `Vx >>= 1`, bit 0 into `VF`
    ShiftRight { x: u8, y: u8 },
    /// 8xy7: `Vx = Vy - Vx`, `VF = 1` when `Vy > Vx`
    SubReverse { x: u8, y: u8 },
    /// 8xyE: `Vx <<= 1`, bit 7 into `VF`
    ShiftLeft { x: u8, y: u8 },
    /// 9xy0: skip next instruction if `Vx != Vy`
    SkipNeReg { x: u8, y: u8 },
    /// Annn: `I = nnn`
    LoadIndex { nnn: u16 },
    /// Bnnn: jump to `nnn + V0`
    JumpOffset { nnn: u16 },
    /// Cxnn: `Vx = random & nn`
    Random { x: u8, nn: u8 },
    /// Dxyn: draw `n` byte sprite from `I` at (`Vx`, `Vy`), collision into `VF`
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E: skip next instruction if key `Vx` is down
    SkipKeyDown { x: u8 },
    /// ExA1: skip next instruction if key `Vx` is up
    SkipKeyUp { x: u8 },
    /// Fx07: `Vx = delay timer`
    ReadDelay { x: u8 },
    /// Fx0A: wait for a key press, store it in `Vx`
    WaitKey { x: u8 },
    /// Fx15: `delay timer = Vx`
    SetDelay { x: u8 },
    /// Fx18: `sound timer = Vx`
    SetSound { x: u8 },
    /// Fx1E: `I += Vx`
    AddIndex { x: u8 },
    /// Fx29: point `I` at the font glyph for `Vx`
    LoadGlyph { x: u8 },
    /// Fx33: store BCD of `Vx` at `I..I+3`
    Bcd { x: u8 },
    /// Fx55: store `V0..=Vx` at `I`
    Store { x: u8 },
    /// Fx65: load `V0..=Vx` from `I`
    Load { x: u8 },
}

impl Instruction {
    /// decode a big-endian instruction word; `None` for anything this
    /// interpreter does not implement (including legacy 0nnn machine calls)
    pub fn decode(opcode: u16) -> Option<Instruction> {
        let (x, y, n, nn, nnn) = (x(opcode), y(opcode), n(opcode), nn(opcode), nnn(opcode));
        let instruction = match opcode >> 12 {
            0x0 => match opcode {
                0x00e0 => Instruction::Clear,
                0x00ee => Instruction::Return,
                _ => return None,
            },
            0x1 => Instruction::Jump { nnn },
            0x2 => Instruction::Call { nnn },
            0x3 => Instruction::SkipEqImm { x, nn },
            0x4 => Instruction::SkipNeImm { x, nn },
            0x5 if n == 0 => Instruction::SkipEqReg { x, y },
            0x6 => Instruction::LoadImm { x, nn },
            0x7 => Instruction::AddImm { x, nn },
            0x8 => match n {
                0x0 => Instruction::Move { x, y },
                0x1 => Instruction::Or { x, y },
                0x2 => Instruction::And { x, y },
                0x3 => Instruction::Xor { x, y },
                0x4 => Instruction::AddReg { x, y },
                0x5 => Instruction::Sub { x, y },
                0x6 => Instruction::ShiftRight { x, y },
                0x7 => Instruction::SubReverse { x, y },
                0xe => Instruction::ShiftLeft { x, y },
                _ => return None,
            },
            0x9 if n == 0 => Instruction::SkipNeReg { x, y },
            0xa => Instruction::LoadIndex { nnn },
            0xb => Instruction::JumpOffset { nnn },
            0xc => Instruction::Random { x, nn },
            0xd => Instruction::Draw { x, y, n },
            0xe => match nn {
                0x9e => Instruction::SkipKeyDown { x },
                0xa1 => Instruction::SkipKeyUp { x },
                _ => return None,
            },
            0xf => match nn {
                0x07 => Instruction::ReadDelay { x },
                0x0a => Instruction::WaitKey { x },
                0x15 => Instruction::SetDelay { x },
                0x18 => Instruction::SetSound { x },
                0x1e => Instruction::AddIndex { x },
                0x29 => Instruction::LoadGlyph { x },
                0x33 => Instruction::Bcd { x },
                0x55 => Instruction::Store { x },
                0x65 => Instruction::Load { x },
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}

/// disassembly, as it appears in trace logs
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump { nnn } => write!(f, "JP 0x{:03x}", nnn),
            Instruction::Call { nnn } => write!(f, "CALL 0x{:03x}", nnn),
            Instruction::SkipEqImm { x, nn } => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            Instruction::SkipNeImm { x, nn } => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadImm { x, nn } => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            Instruction::AddImm { x, nn } => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            Instruction::Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Instruction::SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Instruction::SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex { nnn } => write!(f, "LD I, 0x{:03x}", nnn),
            Instruction::JumpOffset { nnn } => write!(f, "JP V0, 0x{:03x}", nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            Instruction::ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            Instruction::Bcd { x } => write!(f, "LD B, V{:X}", x),
            Instruction::Store { x } => write!(f, "LD [I], V{:X}", x),
            Instruction::Load { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
