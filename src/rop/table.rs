// MIT/Apache2 License

//! Decomposition of every ternary raster operation into binary operations.

use super::{BoolOp::*, MicroOp, Register};

const S: Register = Register::Source;
const D: Register = Register::Destination;
const T: Register = Register::Temporary;
const P: Register = Register::Pattern;

#[inline]
const fn op(src: Register, dst: Register, func: super::BoolOp) -> MicroOp {
    MicroOp { src, dst, func }
}

/// The program of each raster operation, indexed by its code.
#[rustfmt::skip]
pub(crate) static PROGRAMS: [&[MicroOp]; 256] = [
    /* 0x00 */ &[op(P, D, Clear)],
    /* 0x01 */ &[op(P, S, Or), op(S, D, Nor)],
    /* 0x02 */ &[op(P, S, Nor), op(S, D, And)],
    /* 0x03 */ &[op(P, S, Nor)],
    /* 0x04 */ &[op(P, D, Nor), op(S, D, And)],
    /* 0x05 */ &[op(P, D, Nor)],
    /* 0x06 */ &[op(S, D, Equiv), op(P, D, Nor)],
    /* 0x07 */ &[op(S, D, And), op(P, D, Nor)],
    /* 0x08 */ &[op(P, D, AndInverted), op(S, D, And)],
    /* 0x09 */ &[op(S, D, Xor), op(P, D, Nor)],
    /* 0x0a */ &[op(P, D, AndInverted)],
    /* 0x0b */ &[op(S, D, AndReverse), op(P, D, Nor)],
    /* 0x0c */ &[op(P, S, AndInverted)],
    /* 0x0d */ &[op(S, D, AndInverted), op(P, D, Nor)],
    /* 0x0e */ &[op(S, D, Nor), op(P, D, Nor)],
    /* 0x0f */ &[op(P, D, CopyInverted)],
    /* 0x10 */ &[op(S, D, Nor), op(P, D, And)],
    /* 0x11 */ &[op(S, D, Nor)],
    /* 0x12 */ &[op(P, D, Equiv), op(S, D, Nor)],
    /* 0x13 */ &[op(P, D, And), op(S, D, Nor)],
    /* 0x14 */ &[op(P, S, Equiv), op(S, D, Nor)],
    /* 0x15 */ &[op(P, S, And), op(S, D, Nor)],
    /* 0x16 */ &[op(S, T, Copy), op(P, S, Nand), op(S, D, And), op(T, D, Xor), op(P, D, Xor)],
    /* 0x17 */ &[op(S, T, Copy), op(S, D, Xor), op(P, S, Xor), op(S, D, And), op(T, D, Equiv)],
    /* 0x18 */ &[op(P, S, Xor), op(P, D, Xor), op(S, D, And)],
    /* 0x19 */ &[op(S, T, Copy), op(P, S, Nand), op(S, D, And), op(T, D, Equiv)],
    /* 0x1a */ &[op(P, S, And), op(S, D, Or), op(P, D, Xor)],
    /* 0x1b */ &[op(S, T, Copy), op(P, S, Xor), op(S, D, And), op(T, D, Equiv)],
    /* 0x1c */ &[op(P, D, And), op(S, D, Or), op(P, D, Xor)],
    /* 0x1d */ &[op(D, T, Copy), op(P, D, Xor), op(S, D, And), op(T, D, Equiv)],
    /* 0x1e */ &[op(S, D, Or), op(P, D, Xor)],
    /* 0x1f */ &[op(S, D, Or), op(P, D, Nand)],
    /* 0x20 */ &[op(P, S, AndReverse), op(S, D, And)],
    /* 0x21 */ &[op(P, D, Xor), op(S, D, Nor)],
    /* 0x22 */ &[op(S, D, AndInverted)],
    /* 0x23 */ &[op(P, D, AndReverse), op(S, D, Nor)],
    /* 0x24 */ &[op(S, D, Xor), op(P, S, Xor), op(S, D, And)],
    /* 0x25 */ &[op(P, S, Nand), op(S, D, And), op(P, D, Equiv)],
    /* 0x26 */ &[op(S, T, Copy), op(P, S, And), op(S, D, Or), op(T, D, Xor)],
    /* 0x27 */ &[op(S, T, Copy), op(P, S, Equiv), op(S, D, Or), op(T, D, Xor)],
    /* 0x28 */ &[op(P, S, Xor), op(S, D, And)],
    /* 0x29 */ &[op(S, T, Copy), op(P, S, And), op(S, D, Or), op(T, D, Xor), op(P, D, Equiv)],
    /* 0x2a */ &[op(P, S, Nand), op(S, D, And)],
    /* 0x2b */ &[op(S, T, Copy), op(P, S, Xor), op(P, D, Xor), op(S, D, And), op(T, D, Equiv)],
    /* 0x2c */ &[op(S, D, Or), op(P, D, And), op(S, D, Xor)],
    /* 0x2d */ &[op(S, D, OrReverse), op(P, D, Xor)],
    /* 0x2e */ &[op(P, D, Xor), op(S, D, Or), op(P, D, Xor)],
    /* 0x2f */ &[op(S, D, OrReverse), op(P, D, Nand)],
    /* 0x30 */ &[op(P, S, AndReverse)],
    /* 0x31 */ &[op(P, D, AndInverted), op(S, D, Nor)],
    /* 0x32 */ &[op(S, D, Or), op(P, D, Or), op(S, D, Xor)],
    /* 0x33 */ &[op(S, D, CopyInverted)],
    /* 0x34 */ &[op(S, D, And), op(P, D, Or), op(S, D, Xor)],
    /* 0x35 */ &[op(S, D, Equiv), op(P, D, Or), op(S, D, Xor)],
    /* 0x36 */ &[op(P, D, Or), op(S, D, Xor)],
    /* 0x37 */ &[op(P, D, Or), op(S, D, Nand)],
    /* 0x38 */ &[op(P, D, Or), op(S, D, And), op(P, D, Xor)],
    /* 0x39 */ &[op(P, D, OrReverse), op(S, D, Xor)],
    /* 0x3a */ &[op(S, D, Xor), op(P, D, Or), op(S, D, Xor)],
    /* 0x3b */ &[op(P, D, OrReverse), op(S, D, Nand)],
    /* 0x3c */ &[op(P, S, Xor)],
    /* 0x3d */ &[op(S, D, Nor), op(P, D, Or), op(S, D, Xor)],
    /* 0x3e */ &[op(S, D, AndInverted), op(P, D, Or), op(S, D, Xor)],
    /* 0x3f */ &[op(P, S, Nand)],
    /* 0x40 */ &[op(S, D, AndReverse), op(P, D, And)],
    /* 0x41 */ &[op(P, S, Xor), op(S, D, Nor)],
    /* 0x42 */ &[op(D, S, Xor), op(P, D, Xor), op(S, D, And)],
    /* 0x43 */ &[op(S, D, Nand), op(P, D, And), op(S, D, Equiv)],
    /* 0x44 */ &[op(S, D, AndReverse)],
    /* 0x45 */ &[op(P, S, AndReverse), op(S, D, Nor)],
    /* 0x46 */ &[op(D, T, Copy), op(P, D, And), op(S, D, Or), op(T, D, Xor)],
    /* 0x47 */ &[op(P, D, Xor), op(S, D, And), op(P, D, Equiv)],
    /* 0x48 */ &[op(P, D, Xor), op(S, D, And)],
    /* 0x49 */ &[op(D, T, Copy), op(P, D, And), op(S, D, Or), op(T, D, Xor), op(P, D, Equiv)],
    /* 0x4a */ &[op(D, S, Or), op(P, S, And), op(S, D, Xor)],
    /* 0x4b */ &[op(S, D, OrInverted), op(P, D, Xor)],
    /* 0x4c */ &[op(P, D, Nand), op(S, D, And)],
    /* 0x4d */ &[op(S, T, Copy), op(S, D, Xor), op(P, S, Xor), op(S, D, Or), op(T, D, Equiv)],
    /* 0x4e */ &[op(P, S, Xor), op(S, D, Or), op(P, D, Xor)],
    /* 0x4f */ &[op(S, D, OrInverted), op(P, D, Nand)],
    /* 0x50 */ &[op(P, D, AndReverse)],
    /* 0x51 */ &[op(P, S, AndInverted), op(S, D, Nor)],
    /* 0x52 */ &[op(D, S, And), op(P, S, Or), op(S, D, Xor)],
    /* 0x53 */ &[op(S, D, Xor), op(P, D, And), op(S, D, Equiv)],
    /* 0x54 */ &[op(P, S, Nor), op(S, D, Nor)],
    /* 0x55 */ &[op(P, D, Invert)],
    /* 0x56 */ &[op(P, S, Or), op(S, D, Xor)],
    /* 0x57 */ &[op(P, S, Or), op(S, D, Nand)],
    /* 0x58 */ &[op(P, S, Or), op(S, D, And), op(P, D, Xor)],
    /* 0x59 */ &[op(P, S, OrReverse), op(S, D, Xor)],
    /* 0x5a */ &[op(P, D, Xor)],
    /* 0x5b */ &[op(D, S, Nor), op(P, S, Or), op(S, D, Xor)],
    /* 0x5c */ &[op(D, S, Xor), op(P, S, Or), op(S, D, Xor)],
    /* 0x5d */ &[op(P, S, OrReverse), op(S, D, Nand)],
    /* 0x5e */ &[op(D, S, AndInverted), op(P, S, Or), op(S, D, Xor)],
    /* 0x5f */ &[op(P, D, Nand)],
    /* 0x60 */ &[op(S, D, Xor), op(P, D, And)],
    /* 0x61 */ &[op(D, T, Copy), op(S, D, And), op(P, D, Or), op(S, D, Xor), op(T, D, Equiv)],
    /* 0x62 */ &[op(D, T, Copy), op(P, D, Or), op(S, D, And), op(T, D, Xor)],
    /* 0x63 */ &[op(P, D, OrInverted), op(S, D, Xor)],
    /* 0x64 */ &[op(S, T, Copy), op(P, S, Or), op(S, D, And), op(T, D, Xor)],
    /* 0x65 */ &[op(P, S, OrInverted), op(S, D, Xor)],
    /* 0x66 */ &[op(S, D, Xor)],
    /* 0x67 */ &[op(S, T, Copy), op(P, S, Nor), op(S, D, Or), op(T, D, Xor)],
    /* 0x68 */ &[op(D, T, Copy), op(S, D, Nor), op(P, D, Or), op(S, D, Xor), op(T, D, Equiv)],
    /* 0x69 */ &[op(S, D, Xor), op(P, D, Equiv)],
    /* 0x6a */ &[op(P, S, And), op(S, D, Xor)],
    /* 0x6b */ &[op(S, T, Copy), op(P, S, Or), op(S, D, And), op(T, D, Xor), op(P, D, Equiv)],
    /* 0x6c */ &[op(P, D, And), op(S, D, Xor)],
    /* 0x6d */ &[op(D, T, Copy), op(P, D, Or), op(S, D, And), op(T, D, Xor), op(P, D, Equiv)],
    /* 0x6e */ &[op(S, T, Copy), op(P, S, OrReverse), op(S, D, And), op(T, D, Xor)],
    /* 0x6f */ &[op(S, D, Equiv), op(P, D, Nand)],
    /* 0x70 */ &[op(S, D, Nand), op(P, D, And)],
    /* 0x71 */ &[op(S, T, Copy), op(D, S, Xor), op(P, D, Xor), op(S, D, And), op(T, D, Equiv)],
    /* 0x72 */ &[op(S, T, Copy), op(P, S, Xor), op(S, D, Or), op(T, D, Xor)],
    /* 0x73 */ &[op(P, D, OrInverted), op(S, D, Nand)],
    /* 0x74 */ &[op(D, T, Copy), op(P, D, Xor), op(S, D, Or), op(T, D, Xor)],
    /* 0x75 */ &[op(P, S, OrInverted), op(S, D, Nand)],
    /* 0x76 */ &[op(S, T, Copy), op(P, S, AndReverse), op(S, D, Or), op(T, D, Xor)],
    /* 0x77 */ &[op(S, D, Nand)],
    /* 0x78 */ &[op(S, D, And), op(P, D, Xor)],
    /* 0x79 */ &[op(D, T, Copy), op(S, D, Or), op(P, D, And), op(S, D, Xor), op(T, D, Equiv)],
    /* 0x7a */ &[op(D, S, OrInverted), op(P, S, And), op(S, D, Xor)],
    /* 0x7b */ &[op(P, D, Equiv), op(S, D, Nand)],
    /* 0x7c */ &[op(S, D, OrInverted), op(P, D, And), op(S, D, Xor)],
    /* 0x7d */ &[op(P, S, Equiv), op(S, D, Nand)],
    /* 0x7e */ &[op(S, D, Xor), op(P, S, Xor), op(S, D, Or)],
    /* 0x7f */ &[op(P, S, And), op(S, D, Nand)],
    /* 0x80 */ &[op(P, S, And), op(S, D, And)],
    /* 0x81 */ &[op(S, D, Xor), op(P, S, Xor), op(S, D, Nor)],
    /* 0x82 */ &[op(P, S, Equiv), op(S, D, And)],
    /* 0x83 */ &[op(S, D, OrInverted), op(P, D, And), op(S, D, Equiv)],
    /* 0x84 */ &[op(P, D, Equiv), op(S, D, And)],
    /* 0x85 */ &[op(P, S, OrInverted), op(S, D, And), op(P, D, Equiv)],
    /* 0x86 */ &[op(D, T, Copy), op(S, D, Or), op(P, D, And), op(S, D, Xor), op(T, D, Xor)],
    /* 0x87 */ &[op(S, D, And), op(P, D, Equiv)],
    /* 0x88 */ &[op(S, D, And)],
    /* 0x89 */ &[op(S, T, Copy), op(P, S, AndReverse), op(S, D, Or), op(T, D, Equiv)],
    /* 0x8a */ &[op(P, S, OrInverted), op(S, D, And)],
    /* 0x8b */ &[op(D, T, Copy), op(P, D, Xor), op(S, D, Or), op(T, D, Equiv)],
    /* 0x8c */ &[op(P, D, OrInverted), op(S, D, And)],
    /* 0x8d */ &[op(S, T, Copy), op(P, S, Xor), op(S, D, Or), op(T, D, Equiv)],
    /* 0x8e */ &[op(S, T, Copy), op(D, S, Xor), op(P, D, Xor), op(S, D, And), op(T, D, Xor)],
    /* 0x8f */ &[op(S, D, Nand), op(P, D, Nand)],
    /* 0x90 */ &[op(S, D, Equiv), op(P, D, And)],
    /* 0x91 */ &[op(S, T, Copy), op(P, S, OrReverse), op(S, D, And), op(T, D, Equiv)],
    /* 0x92 */ &[op(D, T, Copy), op(P, D, Or), op(S, D, And), op(P, D, Xor), op(T, D, Xor)],
    /* 0x93 */ &[op(P, D, And), op(S, D, Equiv)],
    /* 0x94 */ &[op(S, T, Copy), op(P, S, Or), op(S, D, And), op(P, D, Xor), op(T, D, Xor)],
    /* 0x95 */ &[op(P, S, And), op(S, D, Equiv)],
    /* 0x96 */ &[op(P, S, Xor), op(S, D, Xor)],
    /* 0x97 */ &[op(S, T, Copy), op(P, S, Nor), op(S, D, Or), op(P, D, Xor), op(T, D, Xor)],
    /* 0x98 */ &[op(S, T, Copy), op(P, S, Nor), op(S, D, Or), op(T, D, Equiv)],
    /* 0x99 */ &[op(S, D, Equiv)],
    /* 0x9a */ &[op(P, S, AndReverse), op(S, D, Xor)],
    /* 0x9b */ &[op(S, T, Copy), op(P, S, Or), op(S, D, And), op(T, D, Equiv)],
    /* 0x9c */ &[op(P, D, AndReverse), op(S, D, Xor)],
    /* 0x9d */ &[op(D, T, Copy), op(P, D, Or), op(S, D, And), op(T, D, Equiv)],
    /* 0x9e */ &[op(D, T, Copy), op(S, D, And), op(P, D, Or), op(S, D, Xor), op(T, D, Xor)],
    /* 0x9f */ &[op(S, D, Xor), op(P, D, Nand)],
    /* 0xa0 */ &[op(P, D, And)],
    /* 0xa1 */ &[op(P, S, AndInverted), op(S, D, Or), op(P, D, Equiv)],
    /* 0xa2 */ &[op(P, S, OrReverse), op(S, D, And)],
    /* 0xa3 */ &[op(D, S, Xor), op(P, S, Or), op(S, D, Equiv)],
    /* 0xa4 */ &[op(P, S, Nor), op(S, D, Or), op(P, D, Equiv)],
    /* 0xa5 */ &[op(P, D, Equiv)],
    /* 0xa6 */ &[op(P, S, AndInverted), op(S, D, Xor)],
    /* 0xa7 */ &[op(P, S, Or), op(S, D, And), op(P, D, Equiv)],
    /* 0xa8 */ &[op(P, S, Or), op(S, D, And)],
    /* 0xa9 */ &[op(P, S, Or), op(S, D, Equiv)],
    /* 0xaa */ &[op(P, D, Noop)],
    /* 0xab */ &[op(P, S, Nor), op(S, D, Or)],
    /* 0xac */ &[op(S, D, Xor), op(P, D, And), op(S, D, Xor)],
    /* 0xad */ &[op(D, S, And), op(P, S, Or), op(S, D, Equiv)],
    /* 0xae */ &[op(P, S, AndInverted), op(S, D, Or)],
    /* 0xaf */ &[op(P, D, OrInverted)],
    /* 0xb0 */ &[op(S, D, OrInverted), op(P, D, And)],
    /* 0xb1 */ &[op(P, S, Xor), op(S, D, Or), op(P, D, Equiv)],
    /* 0xb2 */ &[op(S, T, Copy), op(S, D, Xor), op(P, S, Xor), op(S, D, Or), op(T, D, Xor)],
    /* 0xb3 */ &[op(P, D, Nand), op(S, D, Nand)],
    /* 0xb4 */ &[op(S, D, AndReverse), op(P, D, Xor)],
    /* 0xb5 */ &[op(D, S, Or), op(P, S, And), op(S, D, Equiv)],
    /* 0xb6 */ &[op(D, T, Copy), op(P, D, And), op(S, D, Or), op(P, D, Xor), op(T, D, Xor)],
    /* 0xb7 */ &[op(P, D, Xor), op(S, D, Nand)],
    /* 0xb8 */ &[op(P, D, Xor), op(S, D, And), op(P, D, Xor)],
    /* 0xb9 */ &[op(D, T, Copy), op(P, D, And), op(S, D, Or), op(T, D, Equiv)],
    /* 0xba */ &[op(P, S, AndReverse), op(S, D, Or)],
    /* 0xbb */ &[op(S, D, OrInverted)],
    /* 0xbc */ &[op(S, D, Nand), op(P, D, And), op(S, D, Xor)],
    /* 0xbd */ &[op(D, S, Xor), op(P, D, Xor), op(S, D, Nand)],
    /* 0xbe */ &[op(P, S, Xor), op(S, D, Or)],
    /* 0xbf */ &[op(P, S, Nand), op(S, D, Or)],
    /* 0xc0 */ &[op(P, S, And)],
    /* 0xc1 */ &[op(S, D, AndInverted), op(P, D, Or), op(S, D, Equiv)],
    /* 0xc2 */ &[op(S, D, Nor), op(P, D, Or), op(S, D, Equiv)],
    /* 0xc3 */ &[op(P, S, Equiv)],
    /* 0xc4 */ &[op(P, D, OrReverse), op(S, D, And)],
    /* 0xc5 */ &[op(S, D, Xor), op(P, D, Or), op(S, D, Equiv)],
    /* 0xc6 */ &[op(P, D, AndInverted), op(S, D, Xor)],
    /* 0xc7 */ &[op(P, D, Or), op(S, D, And), op(P, D, Equiv)],
    /* 0xc8 */ &[op(P, D, Or), op(S, D, And)],
    /* 0xc9 */ &[op(P, D, Or), op(S, D, Equiv)],
    /* 0xca */ &[op(D, S, Xor), op(P, S, And), op(S, D, Xor)],
    /* 0xcb */ &[op(S, D, And), op(P, D, Or), op(S, D, Equiv)],
    /* 0xcc */ &[op(S, D, Copy)],
    /* 0xcd */ &[op(P, D, Nor), op(S, D, Or)],
    /* 0xce */ &[op(P, D, AndInverted), op(S, D, Or)],
    /* 0xcf */ &[op(P, S, OrInverted)],
    /* 0xd0 */ &[op(S, D, OrReverse), op(P, D, And)],
    /* 0xd1 */ &[op(P, D, Xor), op(S, D, Or), op(P, D, Equiv)],
    /* 0xd2 */ &[op(S, D, AndInverted), op(P, D, Xor)],
    /* 0xd3 */ &[op(S, D, Or), op(P, D, And), op(S, D, Equiv)],
    /* 0xd4 */ &[op(S, T, Copy), op(P, S, Xor), op(P, D, Xor), op(S, D, And), op(T, D, Xor)],
    /* 0xd5 */ &[op(P, S, Nand), op(S, D, Nand)],
    /* 0xd6 */ &[op(S, T, Copy), op(P, S, And), op(S, D, Or), op(P, D, Xor), op(T, D, Xor)],
    /* 0xd7 */ &[op(P, S, Xor), op(S, D, Nand)],
    /* 0xd8 */ &[op(P, S, Xor), op(S, D, And), op(P, D, Xor)],
    /* 0xd9 */ &[op(S, T, Copy), op(P, S, And), op(S, D, Or), op(T, D, Equiv)],
    /* 0xda */ &[op(D, S, Nand), op(P, S, And), op(S, D, Xor)],
    /* 0xdb */ &[op(S, D, Xor), op(P, S, Xor), op(S, D, Nand)],
    /* 0xdc */ &[op(P, D, AndReverse), op(S, D, Or)],
    /* 0xdd */ &[op(S, D, OrReverse)],
    /* 0xde */ &[op(P, D, Xor), op(S, D, Or)],
    /* 0xdf */ &[op(P, D, Nand), op(S, D, Or)],
    /* 0xe0 */ &[op(S, D, Or), op(P, D, And)],
    /* 0xe1 */ &[op(S, D, Or), op(P, D, Equiv)],
    /* 0xe2 */ &[op(D, T, Copy), op(P, D, Xor), op(S, D, And), op(T, D, Xor)],
    /* 0xe3 */ &[op(P, D, And), op(S, D, Or), op(P, D, Equiv)],
    /* 0xe4 */ &[op(S, T, Copy), op(P, S, Xor), op(S, D, And), op(T, D, Xor)],
    /* 0xe5 */ &[op(P, S, And), op(S, D, Or), op(P, D, Equiv)],
    /* 0xe6 */ &[op(S, T, Copy), op(P, S, Nand), op(S, D, And), op(T, D, Xor)],
    /* 0xe7 */ &[op(P, S, Xor), op(P, D, Xor), op(S, D, Nand)],
    /* 0xe8 */ &[op(S, T, Copy), op(S, D, Xor), op(P, S, Xor), op(S, D, And), op(T, D, Xor)],
    /* 0xe9 */ &[op(D, T, Copy), op(S, D, Nand), op(P, D, And), op(S, D, Xor), op(T, D, Equiv)],
    /* 0xea */ &[op(P, S, And), op(S, D, Or)],
    /* 0xeb */ &[op(P, S, Equiv), op(S, D, Or)],
    /* 0xec */ &[op(P, D, And), op(S, D, Or)],
    /* 0xed */ &[op(P, D, Equiv), op(S, D, Or)],
    /* 0xee */ &[op(S, D, Or)],
    /* 0xef */ &[op(P, D, OrInverted), op(S, D, Or)],
    /* 0xf0 */ &[op(P, D, Copy)],
    /* 0xf1 */ &[op(S, D, Nor), op(P, D, Or)],
    /* 0xf2 */ &[op(S, D, AndInverted), op(P, D, Or)],
    /* 0xf3 */ &[op(P, S, OrReverse)],
    /* 0xf4 */ &[op(S, D, AndReverse), op(P, D, Or)],
    /* 0xf5 */ &[op(P, D, OrReverse)],
    /* 0xf6 */ &[op(S, D, Xor), op(P, D, Or)],
    /* 0xf7 */ &[op(S, D, Nand), op(P, D, Or)],
    /* 0xf8 */ &[op(S, D, And), op(P, D, Or)],
    /* 0xf9 */ &[op(S, D, Equiv), op(P, D, Or)],
    /* 0xfa */ &[op(P, D, Or)],
    /* 0xfb */ &[op(P, S, OrReverse), op(S, D, Or)],
    /* 0xfc */ &[op(P, S, Or)],
    /* 0xfd */ &[op(S, D, OrReverse), op(P, D, Or)],
    /* 0xfe */ &[op(S, D, Or), op(P, D, Or)],
    /* 0xff */ &[op(P, D, Set)],
];
