// MIT/Apache2 License

use super::{decompose, BoolOp, Register, Rop3};
use crate::Result;

/// Storage for the registers of a raster operation, and the operations on them.
///
/// The executor drives a backend through one blit at a time. The source and pattern registers
/// are provided by the backend before the blit starts; the destination and temporary registers
/// are scratch storage the executor asks for and gives back.
pub trait RopBackend {
    /// Set up storage for `register`.
    fn allocate_scratch(&mut self, register: Register) -> Result;

    /// Release the storage of `register`.
    fn release_scratch(&mut self, register: Register);

    /// Load the destination register from the real destination.
    fn fetch_destination(&mut self) -> Result;

    /// `dst = op(src, dst)`, for every pixel of the registers.
    fn combine(&mut self, src: Register, dst: Register, op: BoolOp) -> Result;

    /// `dst = op(pattern, dst)`, stamping the pattern over the register.
    fn fill(&mut self, dst: Register, op: BoolOp) -> Result;

    /// Copy one register into another.
    #[inline]
    fn copy_region(&mut self, src: Register, dst: Register) -> Result {
        self.combine(src, dst, BoolOp::Copy)
    }

    /// Apply an operation that depends on nothing but the destination straight to the real
    /// destination.
    fn fill_solid(&mut self, op: BoolOp) -> Result;

    /// Write the contents of `register` to the real destination.
    fn commit(&mut self, register: Register) -> Result;
}

impl<B: RopBackend + ?Sized> RopBackend for &mut B {
    #[inline]
    fn allocate_scratch(&mut self, register: Register) -> Result {
        (**self).allocate_scratch(register)
    }
    #[inline]
    fn release_scratch(&mut self, register: Register) {
        (**self).release_scratch(register)
    }
    #[inline]
    fn fetch_destination(&mut self) -> Result {
        (**self).fetch_destination()
    }
    #[inline]
    fn combine(&mut self, src: Register, dst: Register, op: BoolOp) -> Result {
        (**self).combine(src, dst, op)
    }
    #[inline]
    fn fill(&mut self, dst: Register, op: BoolOp) -> Result {
        (**self).fill(dst, op)
    }
    #[inline]
    fn copy_region(&mut self, src: Register, dst: Register) -> Result {
        (**self).copy_region(src, dst)
    }
    #[inline]
    fn fill_solid(&mut self, op: BoolOp) -> Result {
        (**self).fill_solid(op)
    }
    #[inline]
    fn commit(&mut self, register: Register) -> Result {
        (**self).commit(register)
    }
}

/// Runs raster operation programs against a backend.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RopExecutor {
    null_brush: bool,
}

impl RopExecutor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a null brush, steps that stamp the pattern are left out.
    #[inline]
    pub fn with_null_brush(mut self, null_brush: bool) -> Self {
        self.null_brush = null_brush;
        self
    }

    /// Carry out `rop` on the backend.
    ///
    /// Scratch registers are released on every path out of here, including errors.
    pub fn execute<B: RopBackend + ?Sized>(&self, backend: &mut B, rop: Rop3) -> Result {
        let program = decompose(rop);

        if !rop.uses_source() && !rop.uses_pattern() {
            log::debug!("{:?} only depends on the destination", rop);
            return match program.ops() {
                [op] => backend.fill_solid(op.func),
                _ => Ok(()),
            };
        }

        if program.is_copy() {
            log::debug!("{:?} is a plain copy", rop);
            return backend.commit(Register::Source);
        }

        log::trace!("Running {:?} as {:?}", rop, program.ops());

        let mut scratch = Scratch {
            backend,
            destination: false,
            temporary: false,
        };

        scratch.allocate(Register::Destination)?;
        if rop.uses_destination() {
            scratch.backend.fetch_destination()?;
        }

        for op in program.ops() {
            if op.dst == Register::Temporary {
                scratch.allocate(Register::Temporary)?;
            }

            if op.is_fill() {
                if !self.null_brush {
                    scratch.backend.fill(op.dst, op.func)?;
                }
                continue;
            }

            if op.func == BoolOp::Copy {
                scratch.backend.copy_region(op.src, op.dst)?;
            } else {
                scratch.backend.combine(op.src, op.dst, op.func)?;
            }
        }

        scratch.backend.commit(program.result_register())
    }
}

/// Gives scratch registers back when dropped.
struct Scratch<'b, B: RopBackend + ?Sized> {
    backend: &'b mut B,
    destination: bool,
    temporary: bool,
}

impl<'b, B: RopBackend + ?Sized> Scratch<'b, B> {
    #[inline]
    fn allocate(&mut self, register: Register) -> Result {
        let allocated = match register {
            Register::Destination => &mut self.destination,
            Register::Temporary => &mut self.temporary,
            _ => return Ok(()),
        };
        if !*allocated {
            self.backend.allocate_scratch(register)?;
            *allocated = true;
        }
        Ok(())
    }
}

impl<'b, B: RopBackend + ?Sized> Drop for Scratch<'b, B> {
    #[inline]
    fn drop(&mut self) {
        if self.temporary {
            self.backend.release_scratch(Register::Temporary);
        }
        if self.destination {
            self.backend.release_scratch(Register::Destination);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// One-bit registers.
    #[derive(Default)]
    struct Bits {
        src: u32,
        dst: Option<u32>,
        tmp: Option<u32>,
        pat: u32,
        real: u32,
        allocated: Vec<Register>,
        released: Vec<Register>,
        fail_temporary: bool,
    }

    impl Bits {
        fn get(&self, r: Register) -> u32 {
            match r {
                Register::Source => self.src,
                Register::Destination => self.dst.unwrap_or(0),
                Register::Temporary => self.tmp.unwrap_or(0),
                Register::Pattern => self.pat,
            }
        }

        fn set(&mut self, r: Register, value: u32) {
            match r {
                Register::Source => self.src = value,
                Register::Destination => self.dst = Some(value),
                Register::Temporary => self.tmp = Some(value),
                Register::Pattern => self.pat = value,
            }
        }
    }

    impl RopBackend for Bits {
        fn allocate_scratch(&mut self, register: Register) -> Result {
            if register == Register::Temporary && self.fail_temporary {
                return Err(Error::OutOfMemory);
            }
            self.allocated.push(register);
            Ok(())
        }

        fn release_scratch(&mut self, register: Register) {
            self.released.push(register);
        }

        fn fetch_destination(&mut self) -> Result {
            self.dst = Some(self.real);
            Ok(())
        }

        fn combine(&mut self, src: Register, dst: Register, op: BoolOp) -> Result {
            let value = op.apply(self.get(src), self.get(dst));
            self.set(dst, value);
            Ok(())
        }

        fn fill(&mut self, dst: Register, op: BoolOp) -> Result {
            self.combine(Register::Pattern, dst, op)
        }

        fn fill_solid(&mut self, op: BoolOp) -> Result {
            self.real = op.apply(0, self.real);
            Ok(())
        }

        fn commit(&mut self, register: Register) -> Result {
            self.real = self.get(register);
            Ok(())
        }
    }

    #[test]
    fn test_executor_matches_truth_tables() {
        for code in 0..=255u8 {
            let mut backend = Bits {
                pat: 0xf0,
                src: 0xcc,
                real: 0xaa,
                ..Default::default()
            };
            RopExecutor::new().execute(&mut backend, Rop3(code)).unwrap();
            assert_eq!(backend.real & 0xff, code as u32, "{:?}", Rop3(code));

            let mut released = backend.released.clone();
            let mut allocated = backend.allocated.clone();
            released.sort();
            allocated.sort();
            assert_eq!(allocated, released, "{:?} leaked scratch", Rop3(code));
        }
    }

    #[test]
    fn test_copy_needs_no_scratch() {
        let mut backend = Bits {
            src: 0x1234,
            ..Default::default()
        };
        RopExecutor::new().execute(&mut backend, Rop3::SRCCOPY).unwrap();
        assert_eq!(backend.real, 0x1234);
        assert!(backend.allocated.is_empty());
    }

    #[test]
    fn test_solid_ops_skip_scratch() {
        let mut backend = Bits {
            real: 0x0f,
            ..Default::default()
        };
        RopExecutor::new().execute(&mut backend, Rop3::DSTINVERT).unwrap();
        assert_eq!(backend.real, !0x0f);
        assert!(backend.allocated.is_empty());
    }

    #[test]
    fn test_scratch_released_on_error() {
        // uses the temporary register
        let rop = (0..=255u8)
            .map(Rop3)
            .find(|r| decompose(*r).uses_temporary())
            .unwrap();
        let mut backend = Bits {
            fail_temporary: true,
            ..Default::default()
        };
        assert_eq!(
            RopExecutor::new().execute(&mut backend, rop),
            Err(Error::OutOfMemory)
        );
        assert_eq!(backend.released, vec![Register::Destination]);
    }

    #[test]
    fn test_null_brush_skips_pattern() {
        let mut backend = Bits {
            pat: !0,
            src: 0,
            real: 0,
            ..Default::default()
        };
        // D | P takes the general path
        let rop = Rop3(0xfa);
        RopExecutor::new()
            .with_null_brush(true)
            .execute(&mut backend, rop)
            .unwrap();
        assert_eq!(backend.real, 0);
    }
}
