// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;

impl<I: Io, O: Io> Computer<I, O> {
    /// Fetch, decode and execute the instruction at the instruction pointer.
    ///
    /// Instructions are decoded again on every fetch, so code that overwrites itself runs as
    /// written at the time it's reached.
    pub(crate) fn exec_instruction(&mut self) -> Result<State> {
        debug_assert!(self.index >= 0, "uncaught negative instruction index");

        let word = self.code.read(self.index)?;
        let (opcode, modes) = decode(word, self.index)?;
        log::trace!(
            "ip: {:>8} | rbo: {:>5} | {word:05} [{opcode}]",
            self.index,
            self.rel_offset
        );

        match opcode {
            OpCode::Add => self.op3(opcode, modes, i64::wrapping_add),
            OpCode::Mul => self.op3(opcode, modes, i64::wrapping_mul),
            OpCode::In => {
                let dest = self.resolve_dest(modes[0], 1)?;
                let Some(input) = self.input.try_take_input() else {
                    return Ok(State::AwaitingInput);
                };
                self.trace(opcode, modes, [(self.param(1), input)]);
                self.code.write(dest, input)?;
                self.index += 2;
                Ok(State::Running)
            }
            OpCode::Out => {
                let out_val = self.resolve_param(modes[0], 1)?;
                self.trace(opcode, modes, [(self.param(1), out_val)]);
                self.output.output(out_val);
                self.index += 2;
                Ok(State::Running)
            }
            OpCode::Jnz => self.jump(opcode, modes, |i| i != 0),
            OpCode::Jz => self.jump(opcode, modes, |i| i == 0),
            OpCode::Lt => self.op3(opcode, modes, |a, b| i64::from(a < b)),
            OpCode::Eq => self.op3(opcode, modes, |a, b| i64::from(a == b)),
            OpCode::Arb => {
                let offset = self.resolve_param(modes[0], 1)?;
                self.trace(opcode, modes, [(self.param(1), offset)]);
                self.rel_offset = self.rel_offset.wrapping_add(offset);
                self.index += 2;
                Ok(State::Running)
            }
            OpCode::Halt => {
                self.trace(opcode, modes, []);
                Ok(State::Halted)
            }
        }
    }

    /// The raw value of the `offset`th parameter of the current instruction
    fn param(&self, offset: i64) -> i64 {
        self.code[self.index + offset]
    }

    /// Resolve the `offset`th parameter of the current instruction into a value, using the method
    /// appropriate for `mode`.
    pub(crate) fn resolve_param(&self, mode: ParamMode, offset: i64) -> Result<i64> {
        let raw = self.param(offset);
        match mode {
            ParamMode::Positional => self.code.read(raw),
            ParamMode::Immediate => Ok(raw),
            ParamMode::Relative => self.code.read(raw.wrapping_add(self.rel_offset)),
        }
    }

    /// Resolve the `offset`th parameter of the current instruction into the address to write to.
    /// Immediate mode destinations and negative addresses are errors.
    pub(crate) fn resolve_dest(&self, mode: ParamMode, offset: i64) -> Result<i64> {
        match (mode, self.param(offset)) {
            (ParamMode::Immediate, n) => Err(Error::InvalidWriteTarget(n)),
            (ParamMode::Positional, n) if n < 0 => Err(Error::InvalidAddress(n)),
            (ParamMode::Positional, n) => Ok(n),
            (ParamMode::Relative, n) => match n.wrapping_add(self.rel_offset) {
                address @ ..0 => Err(Error::InvalidAddress(address)),
                address => Ok(address),
            },
        }
    }

    /// common logic of all 4 instructions that take 3 parameters
    pub(crate) fn op3(
        &mut self,
        opcode: OpCode,
        modes: [ParamMode; 3],
        operation: impl Fn(i64, i64) -> i64,
    ) -> Result<State> {
        let a = self.resolve_param(modes[0], 1)?;
        let b = self.resolve_param(modes[1], 2)?;
        let dest = self.resolve_dest(modes[2], 3)?;
        let val = operation(a, b);
        self.trace(
            opcode,
            modes,
            [
                (self.param(1), a),
                (self.param(2), b),
                (self.param(3), val),
            ],
        );
        self.code.write(dest, val)?;
        self.index += 4;
        Ok(State::Running)
    }

    pub(crate) fn jump(
        &mut self,
        opcode: OpCode,
        modes: [ParamMode; 3],
        func: impl Fn(i64) -> bool,
    ) -> Result<State> {
        let expr = self.resolve_param(modes[0], 1)?;
        let dest = self.resolve_param(modes[1], 2)?;
        let taken = func(expr);
        if taken && dest < 0 {
            return Err(Error::InvalidAddress(dest));
        }
        self.trace(opcode, modes, [(self.param(1), expr), (self.param(2), dest)]);
        if taken {
            self.index = dest;
        } else {
            self.index += 3;
        }
        Ok(State::Running)
    }

    /// Record the current instruction, if a trace is running
    fn trace<const N: usize>(
        &mut self,
        opcode: OpCode,
        modes: [ParamMode; 3],
        resolved_params: [(i64, i64); N],
    ) {
        if let Some(trace) = self.trace.as_mut() {
            let op_int = self.code[self.index];
            trace.push(
                (op_int, opcode, modes),
                self.index,
                self.rel_offset,
                &resolved_params,
            );
        }
    }
}
