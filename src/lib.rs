// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! An Intcode virtual machine with pluggable I/O
//!
//! [`Computer`] is a fully-functional Intcode computer, with all of the [Opcodes] and
//! [Parameter Modes] defined in the completed Intcode computer for [Day 9]. It uses [`i64`] as the
//! type of Intcode integers, and grows its memory on demand.
//!
//! Input is read from, and output is written to, a pair of [I/O providers](io). The default
//! provider is a FIFO queue, and running out of queued input suspends the computer with
//! [`State::AwaitingInput`] so the driving code can supply more. The [network provider] never
//! suspends, which lets a scheduler run many networked computers round-robin.
//!
//! # Example
//!
//! ```rust
//! use intcode_vm::prelude::*;
//! let mut computer = Computer::new([3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8]);
//!
//! // nothing to read yet
//! assert_eq!(computer.run(), Ok(State::AwaitingInput));
//! computer.add_input(8);
//! assert_eq!(computer.run(), Ok(State::Halted));
//! assert_eq!(computer.drain_output(), vec![1]);
//!
//! // reset to run it again from scratch
//! computer.reset();
//! computer.add_input(7);
//! assert_eq!(computer.run(), Ok(State::Halted));
//! assert_eq!(computer.drain_output(), vec![0]);
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes
//! [Parameter Modes]: https://esolangs.org/wiki/Intcode#Parameter_Modes
//! [Day 9]: https://adventofcode.com/2019/day/9
//! [network provider]: io::NetworkIo

/// A module implementing internal logic that doesn't fit cleanly into the module hierarchy
mod internals;

mod decode;
pub mod io;
mod mem;
mod program;
pub mod trace;

use std::fmt::{self, Debug};
use std::num::ParseIntError;
use std::ops::Index;

use log::{debug, warn};

pub use decode::{OpCode, ParamMode, decode};
pub use mem::Memory;
pub use program::Program;

use io::{Io, QueueIo};

/// A small module that re-exports items needed when working with a [`Computer`]
pub mod prelude {
    pub use crate::io::{Io, QueueIo};
    pub use crate::{Computer, Program, State};
}

/// The execution state of a [`Computer`]
///
/// [Running](State::Running) is only ever returned by [`Computer::step`] and
/// [`Computer::run_bounded`], when more instructions can be executed right away.
///
/// [AwaitingInput](State::AwaitingInput) means that the next instruction is `IN`, but the input
/// provider had nothing to give. The instruction pointer is left on the `IN` instruction, so it is
/// retried once more input is provided.
///
/// [Halted](State::Halted) means that a `HLT` instruction has been executed. Once it's been
/// returned, no more instructions will be executed until the computer is reset.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    /// Execution can continue
    Running,
    /// Execution is waiting on input
    AwaitingInput,
    /// Execution has halted
    Halted,
}

/// An error that stopped a [`Computer`]
///
/// Except for [`Error::Parse`] and [`Error::UnsupportedOperation`], these are fatal: the
/// computer that returned one is left poisoned until it's [reset](Computer::reset).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A negative memory address was accessed, or a jump targeted a negative address
    #[error("could not access negative address {0}")]
    InvalidAddress(i64),
    /// An instruction word with an unrecognized opcode was encountered
    #[error("encountered unrecognized opcode in {instruction} at address {address}")]
    InvalidOpcode {
        /// The full instruction word
        instruction: i64,
        /// The address the instruction word was fetched from
        address: i64,
    },
    /// A parameter mode digit other than 0, 1, or 2 was encountered
    #[error("encountered unknown parameter mode {0}")]
    InvalidMode(i64),
    /// An instruction tried to write to an immediate-mode destination
    #[error("code attempted to write to immediate {0}")]
    InvalidWriteTarget(i64),
    /// An I/O provider was asked to do something it does not support
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// Program text contained something other than comma-separated integers
    #[error("could not parse {token:?} as an intcode integer: {source}")]
    Parse {
        /// The offending text
        token: String,
        /// Why it could not be parsed
        source: ParseIntError,
    },
    /// A computer was used after previously erroring out
    #[error("tried to reuse a computer after a fatal error")]
    Poisoned,
}

/// Shorthand for results with this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An Intcode computer
///
/// The computer owns its memory, registers, and an input and an output provider. Cloning it
/// copies the memory and registers. The providers are cloned with their own [`Clone`] impls,
/// which copy them unless they are [`Shared`](io::Shared).
#[derive(Clone)]
pub struct Computer<I: Io = QueueIo, O: Io = QueueIo> {
    index: i64,
    rel_offset: i64,
    code: Memory,
    program: Program,
    input: I,
    output: O,
    poisoned: bool,
    halted: bool,
    trace: Option<trace::Trace>,
}

// ignore providers and tracing
impl<I: Io, O: Io> PartialEq for Computer<I, O> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.rel_offset == other.rel_offset && self.code == other.code
    }
}

impl<I: Io + Debug, O: Io + Debug> Debug for Computer<I, O> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Computer")
            .field("code", &self.code)
            .field("rbo", &self.rel_offset)
            .field("ip", &self.index)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("poisoned", &self.poisoned)
            .field("halted", &self.halted)
            .field("tracing", &self.trace.is_some())
            .finish()
    }
}

impl<I: Io, O: Io> Index<i64> for Computer<I, O> {
    type Output = i64;

    /// Panics if `address` is negative
    fn index(&self, address: i64) -> &Self::Output {
        self.code.index(address)
    }
}

impl Computer {
    /// Create a new computer with empty [`QueueIo`] input and output.
    ///
    /// Collects `code` into the starting memory state.
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self::with_io(code, QueueIo::new(), QueueIo::new())
    }
}

impl From<Program> for Computer {
    fn from(program: Program) -> Self {
        Self::with_program(program, QueueIo::new(), QueueIo::new())
    }
}

impl<I: Io, O: Io> Computer<I, O> {
    /// Create a new computer which reads from `input` and writes to `output`.
    ///
    /// Collects `code` into the starting memory state.
    pub fn with_io(code: impl IntoIterator<Item = i64>, input: I, output: O) -> Self {
        Self::with_program(code.into_iter().collect(), input, output)
    }

    /// Like [`with_io`](Self::with_io), but with an already-built [`Program`]
    pub fn with_program(program: Program, input: I, output: O) -> Self {
        Self {
            index: 0,
            rel_offset: 0,
            code: Memory::new(&program),
            program,
            input,
            output,
            poisoned: false,
            halted: false,
            trace: None,
        }
    }

    /// Parse `text` as a comma-separated program and load it, replacing the current program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if `text` is not a valid program, leaving `self` unchanged.
    pub fn load(&mut self, text: &str) -> Result<()> {
        self.load_program(text.parse()?);
        Ok(())
    }

    /// Replace the current program with `program`, and [reset](Self::reset).
    pub fn load_program(&mut self, program: Program) {
        debug!("loading program of {} ints", program.len());
        self.program = program;
        self.reset();
    }

    /// Restore memory to the loaded program, zero the registers, and clear both providers.
    ///
    /// This also clears poisoning, and any active trace is kept running.
    pub fn reset(&mut self) {
        debug!("resetting computer");
        self.code.load(&self.program);
        self.index = 0;
        self.rel_offset = 0;
        self.poisoned = false;
        self.halted = false;
        self.input.clear();
        self.output.clear();
    }

    /// Run a single instruction, returning the resulting [`State`]
    ///
    /// # Example
    ///
    /// ```
    /// use intcode_vm::prelude::*;
    /// let mut computer = Computer::new([1101, 90, 9, 8, 3, 7, 4, -1]);
    ///
    /// // the first instruction is `ADD #90, #9, 8`
    /// assert_eq!(computer.step(), Ok(State::Running));
    /// // the second instruction is `IN 7`, but no input was provided.
    /// assert_eq!(computer.step(), Ok(State::AwaitingInput));
    /// assert_eq!(computer.ip(), 4);
    ///
    /// // now try again, but with input available
    /// computer.add_input(8);
    /// assert_eq!(computer.step(), Ok(State::Running));
    ///
    /// // the third instruction was originally OUT -1, but the address was overwritten by the
    /// // previous instruction, so it will now read from address 8, where the 1st instruction
    /// // stored 99.
    /// assert_eq!(computer.step(), Ok(State::Running));
    /// assert_eq!(computer.take_output(), Some(99));
    ///
    /// // finally, the 99 at address 8 is executed as `HLT`
    /// assert_eq!(computer.step(), Ok(State::Halted));
    /// ```
    ///
    /// # Errors
    ///
    /// If the computer has previously errored out, returns [`Error::Poisoned`] before attempting
    /// to do anything.
    ///
    /// Otherwise, if any of the following conditions occur, it marks itself as poisoned and
    /// returns the listed [`Error`] variant:
    ///
    /// | Condition                                           | Error type             |
    /// |-----------------------------------------------------|------------------------|
    /// | Opcode is unrecognized                              | [`InvalidOpcode`]      |
    /// | Mode digit is unrecognized                          | [`InvalidMode`]        |
    /// | Instruction accesses a negative address             | [`InvalidAddress`]     |
    /// | Jump instruction would jump to a negative address   | [`InvalidAddress`]     |
    /// | ADD, MUL, IN, TLT, or TEQ writes in immediate mode  | [`InvalidWriteTarget`] |
    ///
    /// [`InvalidOpcode`]: Error::InvalidOpcode
    /// [`InvalidMode`]: Error::InvalidMode
    /// [`InvalidAddress`]: Error::InvalidAddress
    /// [`InvalidWriteTarget`]: Error::InvalidWriteTarget
    pub fn step(&mut self) -> Result<State> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        if self.halted {
            return Ok(State::Halted);
        }
        let result = self.exec_instruction();
        match result {
            Ok(State::AwaitingInput) => debug!("awaiting input at {}", self.index),
            Ok(State::Halted) => {
                debug!("halted at {}", self.index);
                self.halted = true;
            }
            Ok(State::Running) => (),
            Err(ref e) => {
                warn!("computer poisoned at {}: {e}", self.index);
                self.poisoned = true;
            }
        }
        result
    }

    /// Execute until either the program halts, or it tries to read input that isn't there.
    ///
    /// Never returns [`State::Running`].
    ///
    /// # Errors
    ///
    /// If an internal call to [`self.step`][Computer::step] fails, returns the resulting
    /// [`Error`] unchanged.
    #[doc(alias = "run_to_end")]
    pub fn run(&mut self) -> Result<State> {
        loop {
            match self.step()? {
                State::Running => (),
                stopped => break Ok(stopped),
            }
        }
    }

    /// Like [`run`](Self::run), but gives up and returns [`State::Running`] after executing
    /// `max_steps` instructions without stopping.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run)
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<State> {
        for _ in 0..max_steps {
            match self.step()? {
                State::Running => (),
                stopped => return Ok(stopped),
            }
        }
        Ok(State::Running)
    }

    /// Provide one input value
    pub fn add_input(&mut self, value: i64) {
        self.input.add_input(value);
    }

    /// Provide every value in `values` as input
    ///
    /// # Errors
    ///
    /// Passes along [`Error::UnsupportedOperation`] from providers which don't support it.
    pub fn fill_input(&mut self, values: impl IntoIterator<Item = i64>) -> Result<()> {
        self.input.fill_input(values)
    }

    /// Take the oldest output value
    pub fn take_output(&mut self) -> Option<i64> {
        self.output.take_output()
    }

    /// Take all output values, oldest first
    pub fn drain_output(&mut self) -> Vec<i64> {
        self.output.drain_output()
    }

    /// Run with `inputs` added to the input provider, returning the output and final [`State`].
    ///
    /// # Errors
    ///
    /// Same as [`fill_input`](Self::fill_input) and [`run`](Self::run)
    pub fn run_through_inputs(
        &mut self,
        inputs: impl IntoIterator<Item = i64>,
    ) -> Result<(Vec<i64>, State)> {
        self.fill_input(inputs)?;
        let state = self.run()?;
        Ok((self.drain_output(), state))
    }

    #[allow(missing_docs, reason = "trivial")]
    pub fn input(&self) -> &I {
        &self.input
    }

    #[allow(missing_docs, reason = "trivial")]
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    #[allow(missing_docs, reason = "trivial")]
    pub fn output(&self) -> &O {
        &self.output
    }

    #[allow(missing_docs, reason = "trivial")]
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Swap in a new input provider, returning the old one
    pub fn replace_input(&mut self, input: I) -> I {
        std::mem::replace(&mut self.input, input)
    }

    /// Swap in a new output provider, returning the old one
    pub fn replace_output(&mut self, output: O) -> O {
        std::mem::replace(&mut self.output, output)
    }

    /// Manually set a memory location to a provided value
    ///
    /// # Errors
    ///
    /// if `address` is negative, returns [`Error::InvalidAddress`]
    #[doc(alias("poke", "write"))]
    pub fn mem_set(&mut self, address: i64, value: i64) -> Result<()> {
        self.code.write(address, value)
    }

    /// Get the memory at `address`.
    ///
    /// # Errors
    ///
    /// if `address` is negative, returns [`Error::InvalidAddress`]
    #[doc(alias("peek", "read"))]
    pub fn mem_get(&self, address: i64) -> Result<i64> {
        self.code.read(address)
    }

    /// View the whole memory
    pub fn memory(&self) -> &Memory {
        &self.code
    }

    /// The program that [`reset`](Self::reset) restores
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The instruction pointer
    pub fn ip(&self) -> i64 {
        self.index
    }

    /// The relative base register
    pub fn relative_base(&self) -> i64 {
        self.rel_offset
    }

    /// Whether a `HLT` instruction has been executed since the last reset
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether a fatal error has occurred since the last reset
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }
}
