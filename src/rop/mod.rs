// MIT/Apache2 License

//! Ternary raster operations.
//!
//! A raster operation combines three bitplanes, the pattern (`P`), the source (`S`) and the
//! destination (`D`), with an arbitrary boolean function. Its 8-bit code is the truth table of
//! that function: bit `P << 2 | S << 1 | D` of the code is the result for those inputs. Surfaces
//! only know how to combine two operands at a time, so every code is broken down into a short
//! program of two-operand operations over a handful of registers.

mod exec;
mod table;

pub use exec::*;

use std::fmt;

/// One of the sixteen boolean functions of two inputs, used as `dst = f(src, dst)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BoolOp {
    Clear = 0x0,
    And = 0x1,
    AndReverse = 0x2,
    Copy = 0x3,
    AndInverted = 0x4,
    Noop = 0x5,
    Xor = 0x6,
    Or = 0x7,
    Nor = 0x8,
    Equiv = 0x9,
    Invert = 0xa,
    OrReverse = 0xb,
    CopyInverted = 0xc,
    OrInverted = 0xd,
    Nand = 0xe,
    Set = 0xf,
}

impl BoolOp {
    /// Apply the function bitwise.
    #[inline]
    pub fn apply(self, src: u32, dst: u32) -> u32 {
        match self {
            BoolOp::Clear => 0,
            BoolOp::And => src & dst,
            BoolOp::AndReverse => src & !dst,
            BoolOp::Copy => src,
            BoolOp::AndInverted => !src & dst,
            BoolOp::Noop => dst,
            BoolOp::Xor => src ^ dst,
            BoolOp::Or => src | dst,
            BoolOp::Nor => !(src | dst),
            BoolOp::Equiv => !src ^ dst,
            BoolOp::Invert => !dst,
            BoolOp::OrReverse => src | !dst,
            BoolOp::CopyInverted => !src,
            BoolOp::OrInverted => !src | dst,
            BoolOp::Nand => !(src & dst),
            BoolOp::Set => !0,
        }
    }

    /// Does the result depend on the source operand?
    #[inline]
    pub fn uses_src(self) -> bool {
        let code = self as u8;
        (code >> 2) & 0x3 != code & 0x3
    }

    /// Does the result depend on the destination operand?
    #[inline]
    pub fn uses_dst(self) -> bool {
        let code = self as u8;
        (code >> 1) & 0x5 != code & 0x5
    }
}

/// The operands a raster operation program works on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    Source,
    Destination,
    /// Intermediate results. Always written before it is read.
    Temporary,
    Pattern,
}

/// A single step of a program: `dst = func(src, dst)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MicroOp {
    pub src: Register,
    pub dst: Register,
    pub func: BoolOp,
}

impl MicroOp {
    /// Does this step stamp the pattern?
    #[inline]
    pub fn is_fill(&self) -> bool {
        self.src == Register::Pattern
    }
}

/// A ternary raster operation code.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rop3(pub u8);

impl Rop3 {
    pub const BLACKNESS: Rop3 = Rop3(0x00);
    pub const NOTSRCERASE: Rop3 = Rop3(0x11);
    pub const NOTSRCCOPY: Rop3 = Rop3(0x33);
    pub const SRCERASE: Rop3 = Rop3(0x44);
    pub const DSTINVERT: Rop3 = Rop3(0x55);
    pub const PATINVERT: Rop3 = Rop3(0x5a);
    pub const SRCINVERT: Rop3 = Rop3(0x66);
    pub const SRCAND: Rop3 = Rop3(0x88);
    pub const NOOP: Rop3 = Rop3(0xaa);
    pub const MERGEPAINT: Rop3 = Rop3(0xbb);
    pub const MERGECOPY: Rop3 = Rop3(0xc0);
    pub const SRCCOPY: Rop3 = Rop3(0xcc);
    pub const SRCPAINT: Rop3 = Rop3(0xee);
    pub const PATCOPY: Rop3 = Rop3(0xf0);
    pub const PATPAINT: Rop3 = Rop3(0xfb);
    pub const WHITENESS: Rop3 = Rop3(0xff);

    /// Take the operation code out of a 32-bit raster operation, such as `0x00CC0020`.
    #[inline]
    pub const fn from_dword(rop: u32) -> Rop3 {
        Rop3((rop >> 16) as u8)
    }

    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn uses_pattern(self) -> bool {
        (self.0 >> 4) & 0x0f != self.0 & 0x0f
    }

    #[inline]
    pub fn uses_source(self) -> bool {
        (self.0 >> 2) & 0x33 != self.0 & 0x33
    }

    #[inline]
    pub fn uses_destination(self) -> bool {
        (self.0 >> 1) & 0x55 != self.0 & 0x55
    }

    /// The result of the operation for single-bit inputs.
    #[inline]
    pub fn truth(self, pattern: bool, source: bool, destination: bool) -> bool {
        let bit = (pattern as u8) << 2 | (source as u8) << 1 | destination as u8;
        (self.0 >> bit) & 1 != 0
    }

    /// The program that carries the operation out.
    #[inline]
    pub fn program(self) -> RopProgram {
        decompose(self)
    }
}

impl fmt::Debug for Rop3 {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rop3({:#04x})", self.0)
    }
}

impl From<u8> for Rop3 {
    #[inline]
    fn from(code: u8) -> Rop3 {
        Rop3(code)
    }
}

/// The two-operand program for a raster operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RopProgram {
    rop: Rop3,
    ops: &'static [MicroOp],
}

/// Look up the program for `rop`.
#[inline]
pub fn decompose(rop: Rop3) -> RopProgram {
    RopProgram {
        rop,
        ops: table::PROGRAMS[rop.0 as usize],
    }
}

impl RopProgram {
    #[inline]
    pub fn rop(&self) -> Rop3 {
        self.rop
    }

    #[inline]
    pub fn ops(&self) -> &'static [MicroOp] {
        self.ops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The function of a program that is a single `S -> D` step.
    #[inline]
    pub fn single_source_op(&self) -> Option<BoolOp> {
        match self.ops {
            [op] if op.src == Register::Source && op.dst == Register::Destination => Some(op.func),
            _ => None,
        }
    }

    /// Is this a plain copy of the source?
    #[inline]
    pub fn is_copy(&self) -> bool {
        self.single_source_op() == Some(BoolOp::Copy)
    }

    #[inline]
    pub fn uses_temporary(&self) -> bool {
        self.ops
            .iter()
            .any(|op| op.src == Register::Temporary || op.dst == Register::Temporary)
    }

    /// Does the destination register ever feed into another register?
    #[inline]
    pub fn reads_destination_as_operand(&self) -> bool {
        self.ops
            .iter()
            .any(|op| op.src == Register::Destination && op.dst != Register::Destination)
    }

    /// The register holding the result when the program has run.
    ///
    /// That is the destination, unless no step ever writes to it.
    #[inline]
    pub fn result_register(&self) -> Register {
        if self.ops.iter().any(|op| op.dst == Register::Destination) {
            Register::Destination
        } else {
            Register::Source
        }
    }

    /// Run the program on bitplanes held in machine words.
    pub fn evaluate(&self, pattern: u32, source: u32, destination: u32) -> u32 {
        let mut regs = [source, destination, 0, pattern];
        let slot = |r: Register| match r {
            Register::Source => 0,
            Register::Destination => 1,
            Register::Temporary => 2,
            Register::Pattern => 3,
        };

        for op in self.ops {
            let (s, d) = (slot(op.src), slot(op.dst));
            regs[d] = op.func.apply(regs[s], regs[d]);
        }
        regs[slot(self.result_register())]
    }
}
