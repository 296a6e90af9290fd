// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Opt-in recording of executed instructions
//!
//! See [`Computer::start_trace`] for an example.
use std::fmt::{self, Debug, Display};

use super::{Computer, OpCode, ParamMode, io::Io};

#[derive(Clone, Copy, PartialEq, Eq)]
struct PackedModes(u8);
impl PackedModes {
    const fn pack(modes: [ParamMode; 3]) -> Self {
        Self(modes[0] as u8 | ((modes[1] as u8) << 2) | ((modes[2] as u8) << 4))
    }
    const fn unpack(self) -> [ParamMode; 3] {
        const fn unpack_bit_pair(bit_pair: u8) -> ParamMode {
            match bit_pair {
                0b00 => ParamMode::Positional,
                0b01 => ParamMode::Immediate,
                0b10 => ParamMode::Relative,
                _ => unreachable!(),
            }
        }
        [
            unpack_bit_pair(self.0 & 0b11),
            unpack_bit_pair((self.0 & 0b1100) >> 2),
            unpack_bit_pair((self.0 & 0b110000) >> 4),
        ]
    }
}

/// Each operand is `(raw parameter, resolved value)`. For a write destination, the resolved
/// value is what got stored.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TracedOp {
    Add((i64, i64), (i64, i64), (i64, i64)),
    Mul((i64, i64), (i64, i64), (i64, i64)),
    In((i64, i64)),
    Out((i64, i64)),
    Jnz((i64, i64), (i64, i64)),
    Jz((i64, i64), (i64, i64)),
    Lt((i64, i64), (i64, i64), (i64, i64)),
    Eq((i64, i64), (i64, i64), (i64, i64)),
    Arb((i64, i64)),
    Halt,
}

#[derive(Clone, PartialEq, Eq)]
/// Information about one executed instruction, which can be queried with its various methods, or
/// converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    op: TracedOp,
    op_int: i64,
    instr_ptr: i64,
    rel_base: i64,
    packed_modes: PackedModes,
}

impl TracedInstr {
    /// The relative base at the time the instruction was executed
    #[must_use]
    pub fn rel_base(&self) -> i64 {
        self.rel_base
    }

    /// The instruction pointer at the time the instruction was executed
    #[must_use]
    pub fn instr_ptr(&self) -> i64 {
        self.instr_ptr
    }

    /// The raw instruction word
    #[must_use]
    pub fn op_int(&self) -> i64 {
        self.op_int
    }

    #[allow(missing_docs, reason = "trivial")]
    #[must_use]
    pub fn op_code(&self) -> OpCode {
        match self.op {
            TracedOp::Add(..) => OpCode::Add,
            TracedOp::Mul(..) => OpCode::Mul,
            TracedOp::In(..) => OpCode::In,
            TracedOp::Out(..) => OpCode::Out,
            TracedOp::Jnz(..) => OpCode::Jnz,
            TracedOp::Jz(..) => OpCode::Jz,
            TracedOp::Lt(..) => OpCode::Lt,
            TracedOp::Eq(..) => OpCode::Eq,
            TracedOp::Arb(..) => OpCode::Arb,
            TracedOp::Halt => OpCode::Halt,
        }
    }

    /// If the instruction stored a value in memory, return that value
    #[must_use]
    pub fn stored_val(&self) -> Option<i64> {
        match self.op {
            TracedOp::Add(_, _, (_, v))
            | TracedOp::Mul(_, _, (_, v))
            | TracedOp::Lt(_, _, (_, v))
            | TracedOp::Eq(_, _, (_, v))
            | TracedOp::In((_, v)) => Some(v),
            _ => None,
        }
    }

    /// If the instruction was `OUT`, return the value it output
    #[must_use]
    pub fn output_val(&self) -> Option<i64> {
        match self.op {
            TracedOp::Out((_, v)) => Some(v),
            _ => None,
        }
    }

    /// The parameter modes of the instruction
    #[must_use]
    pub fn param_modes(&self) -> [ParamMode; 3] {
        self.packed_modes.unpack()
    }

    pub(super) fn build(
        (op_int, opcode, modes): (i64, OpCode, [ParamMode; 3]),
        instr_ptr: i64,
        rel_base: i64,
        resolved_params: &[(i64, i64)],
    ) -> Self {
        macro_rules! op {
            {$id: ident(_, _, _)} => {{
                debug_assert_eq!(resolved_params.len(), 3);
                TracedOp::$id(resolved_params[0], resolved_params[1], resolved_params[2])
            }};
            {$id: ident(_, _)} => {{
                debug_assert_eq!(resolved_params.len(), 2);
                TracedOp::$id(resolved_params[0], resolved_params[1])
            }};
            {$id: ident(_)} => {{
                debug_assert_eq!(resolved_params.len(), 1);
                TracedOp::$id(resolved_params[0])
            }};
            {$id: ident} => {{
                debug_assert_eq!(resolved_params.len(), 0);
                TracedOp::$id
            }}
        }

        let op = match opcode {
            OpCode::Add => op! { Add(_, _, _) },
            OpCode::Mul => op! { Mul(_, _, _) },
            OpCode::In => op! { In(_) },
            OpCode::Out => op! { Out(_) },
            OpCode::Jnz => op! { Jnz(_, _) },
            OpCode::Jz => op! { Jz(_, _) },
            OpCode::Lt => op! { Lt(_, _, _) },
            OpCode::Eq => op! { Eq(_, _, _) },
            OpCode::Arb => op! { Arb(_) },
            OpCode::Halt => op! { Halt },
        };
        Self {
            op,
            op_int,
            instr_ptr,
            rel_base,
            packed_modes: PackedModes::pack(modes),
        }
    }
}

impl<I: Io, O: Io> Computer<I, O> {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns it in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    /// use intcode_vm::prelude::*;
    /// let mut computer = Computer::new([1101, 90, 9, 4, 0]);
    /// computer.start_trace();
    /// assert_eq!(computer.run(), Ok(State::Halted));
    /// let trace = computer.end_trace().unwrap();
    /// assert_eq!(trace.0.len(), 2);
    /// assert_eq!(trace.0[0].stored_val(), Some(99));
    /// assert_eq!(trace.0[1].op_code(), intcode_vm::OpCode::Halt);
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions. If no trace was active, returns [`None`]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// A log of instructions that a [Computer] has executed since a call to
/// [Computer::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn push(
        &mut self,
        instr: (i64, OpCode, [ParamMode; 3]),
        instr_ptr: i64,
        rel_base: i64,
        resolved_params: &[(i64, i64)],
    ) {
        self.0.push(TracedInstr::build(
            instr,
            instr_ptr,
            rel_base,
            resolved_params,
        ));
    }

    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Debug for TracedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! arg {
            ($arg: ident) => {
                format_args!("{} => {}", $arg.0, $arg.1)
            };
        }
        macro_rules! variant {
            ($name: literal, ($($arg: ident),*)) => {
                f.debug_tuple($name)
                $(.field(&arg!($arg) ))*
                .finish()
            }
        }
        match self {
            Self::Add(a0, a1, a2) => variant!("Add", (a0, a1, a2)),
            Self::Mul(a0, a1, a2) => variant!("Mul", (a0, a1, a2)),
            Self::In(a0) => variant!("In", (a0)),
            Self::Out(a0) => variant!("Out", (a0)),
            Self::Jnz(a0, a1) => variant!("Jnz", (a0, a1)),
            Self::Jz(a0, a1) => variant!("Jz", (a0, a1)),
            Self::Lt(a0, a1, a2) => variant!("Lt", (a0, a1, a2)),
            Self::Eq(a0, a1, a2) => variant!("Eq", (a0, a1, a2)),
            Self::Arb(a0) => variant!("Arb", (a0)),
            Self::Halt => write!(f, "Halt"),
        }
    }
}

impl Debug for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedInstr")
            .field("op", &self.op)
            .field("op_int", &self.op_int)
            .field("instr_ptr", &self.instr_ptr)
            .field("rel_base", &self.rel_base)
            .field("modes", &self.packed_modes.unpack())
            .finish()
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: op int {: <5} | ",
            self.instr_ptr, self.op_int
        )?;
        let modes = self.packed_modes.unpack();
        let opcode = self.op_code();

        match self.op {
            TracedOp::Add((pa, va), (pb, vb), (dest, stored))
            | TracedOp::Mul((pa, va), (pb, vb), (dest, stored))
            | TracedOp::Lt((pa, va), (pb, vb), (dest, stored))
            | TracedOp::Eq((pa, va), (pb, vb), (dest, stored)) => {
                write!(
                    f,
                    "[{opcode} {}{pa} (resolves to {va}), {}{pb} (resolves to {vb}), {}{dest} (stored {stored})]",
                    modes[0], modes[1], modes[2],
                )
            }
            TracedOp::Jnz((p_cond, v_cond), (p_dest, v_dest)) => write!(
                f,
                "[{opcode} {}{p_cond} (resolves to {v_cond}), {}{p_dest} ({} to {v_dest})]",
                modes[0],
                modes[1],
                if v_cond != 0 { "jumped" } else { "didn't jump" }
            ),
            TracedOp::Jz((p_cond, v_cond), (p_dest, v_dest)) => write!(
                f,
                "[{opcode} {}{p_cond} (resolves to {v_cond}), {}{p_dest} ({} to {v_dest})]",
                modes[0],
                modes[1],
                if v_cond == 0 { "jumped" } else { "didn't jump" }
            ),
            TracedOp::In((p, v)) => write!(f, "[{opcode} {}{p} (stored {v})]", modes[0]),
            TracedOp::Out((p, v)) => write!(f, "[{opcode} {}{p} (resolves to {v})]", modes[0]),
            TracedOp::Arb((p, v)) => write!(
                f,
                "[{opcode} {}{p} (resolved to {v}) (went from {} to {})]",
                modes[0],
                self.rel_base,
                self.rel_base.wrapping_add(v),
            ),
            TracedOp::Halt => write!(f, "[{opcode}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn param_mode_packing() {
        const MODES: [ParamMode; 3] = [
            ParamMode::Positional,
            ParamMode::Immediate,
            ParamMode::Relative,
        ];

        for a in MODES {
            for b in MODES {
                for c in MODES {
                    assert_eq!(PackedModes::pack([a, b, c]).unpack(), [a, b, c]);
                }
            }
        }
    }

    #[test]
    fn display() {
        let (opcode, modes) = decode(1001, 4).unwrap();
        let add = TracedInstr::build((1001, opcode, modes), 4, 0, &[(100, 7), (1, 1), (100, 8)]);
        assert_eq!(
            add.to_string(),
            "ran instruction at 0004: op int 1001  | \
             [ADD 100 (resolves to 7), #1 (resolves to 1), 100 (stored 8)]"
        );
        let (opcode, modes) = decode(209, 0).unwrap();
        let arb = TracedInstr::build((209, opcode, modes), 0, 5, &[(-2, 3)]);
        assert_eq!(
            arb.to_string(),
            "ran instruction at 0000: op int 209   | [ARB @-2 (resolved to 3) (went from 5 to 8)]"
        );
        assert_eq!(arb.stored_val(), None);
        assert_eq!(add.stored_val(), Some(8));
    }
}
