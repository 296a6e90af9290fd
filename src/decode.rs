// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Instruction decoding: [`OpCode`]s and [`ParamMode`]s

use std::fmt::{self, Display};

use crate::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// An Intcode opcode, taken from the lowest two decimal digits of an instruction word
#[allow(missing_docs, reason = "trivial")]
pub enum OpCode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    Lt = 7,
    Eq = 8,
    Arb = 9,
    Halt = 99,
}

impl OpCode {
    /// Number of parameters that follow the opcode in memory
    #[must_use]
    pub const fn param_count(self) -> i64 {
        match self {
            Self::Add | Self::Mul | Self::Lt | Self::Eq => 3,
            Self::Jnz | Self::Jz => 2,
            Self::In | Self::Out | Self::Arb => 1,
            Self::Halt => 0,
        }
    }
}

impl TryFrom<i64> for OpCode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            1 => Ok(Self::Add),
            2 => Ok(Self::Mul),
            3 => Ok(Self::In),
            4 => Ok(Self::Out),
            5 => Ok(Self::Jnz),
            6 => Ok(Self::Jz),
            7 => Ok(Self::Lt),
            8 => Ok(Self::Eq),
            9 => Ok(Self::Arb),
            99 => Ok(Self::Halt),
            _ => Err(i),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Mul => write!(f, "MUL"),
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
            Self::Jnz => write!(f, "JNZ"),
            Self::Jz => write!(f, "JZ"),
            Self::Lt => write!(f, "TLT"),
            Self::Eq => write!(f, "TEQ"),
            Self::Arb => write!(f, "ARB"),
            Self::Halt => write!(f, "HLT"),
        }
    }
}

/// Parameter mode for an Intcode instruction parameter
///
/// Each parameter of an instruction has a mode: [positional], [immediate], or [relative].
///
/// [positional]: ParamMode::Positional
/// [immediate]: ParamMode::Immediate
/// [relative]: ParamMode::Relative
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum ParamMode {
    /// The parameter is the address of its value.
    #[default]
    Positional = 0,
    /// The parameter is its own value. Never valid as a write destination.
    #[doc(alias = "#")]
    Immediate = 1,
    /// The parameter plus the relative base is the address of its value.
    #[doc(alias = "@")]
    Relative = 2,
}

impl ParamMode {
    /// Pull the modes of all three parameters out of an instruction word.
    ///
    /// Digits above the ten thousands place are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMode`] if any of the three mode digits is not 0, 1, or 2.
    pub fn extract(word: i64) -> Result<[Self; 3], Error> {
        Ok([
            Self::try_from((word / 100) % 10)?,   // hundreds place
            Self::try_from((word / 1000) % 10)?,  // thousands place
            Self::try_from((word / 10000) % 10)?, // ten thousands place
        ])
    }
}

impl TryFrom<i64> for ParamMode {
    type Error = Error;
    fn try_from(digit: i64) -> Result<Self, Self::Error> {
        match digit {
            0 => Ok(Self::Positional),
            1 => Ok(Self::Immediate),
            2 => Ok(Self::Relative),
            _ => Err(Error::InvalidMode(digit)),
        }
    }
}

impl Display for ParamMode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamMode::Positional => Ok(()),
            ParamMode::Immediate => write!(fmt, "#"),
            ParamMode::Relative => write!(fmt, "@"),
        }
    }
}

// Given a 5 digit number, digits ABCDE are used as follows:
// DE is the two-digit opcode
// C is the 1st parameter's mode
// B is the 2nd parameter's mode
// A is the 3rd parameter's mode
//
// So 1202 is MUL with the 1st parameter relative, the 2nd immediate and the 3rd positional.
/// Split an instruction word fetched from `address` into its opcode and parameter modes.
///
/// # Errors
///
/// [`Error::InvalidOpcode`] if the low two digits are not a known opcode, otherwise
/// [`Error::InvalidMode`] if a mode digit is unknown.
pub fn decode(word: i64, address: i64) -> Result<(OpCode, [ParamMode; 3]), Error> {
    let opcode = OpCode::try_from(word % 100).map_err(|_| Error::InvalidOpcode {
        instruction: word,
        address,
    })?;
    Ok((opcode, ParamMode::extract(word)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_default_to_positional() {
        assert_eq!(decode(2, 0), Ok((OpCode::Mul, [ParamMode::Positional; 3])));
        assert_eq!(
            decode(1002, 0),
            Ok((
                OpCode::Mul,
                [
                    ParamMode::Positional,
                    ParamMode::Immediate,
                    ParamMode::Positional
                ]
            ))
        );
        assert_eq!(
            decode(21101, 0),
            Ok((
                OpCode::Add,
                [
                    ParamMode::Immediate,
                    ParamMode::Immediate,
                    ParamMode::Relative
                ]
            ))
        );
    }

    #[test]
    fn unknown_opcodes() {
        for word in [0, 10, 98, 100, -1, -99] {
            assert_eq!(
                decode(word, 7),
                Err(Error::InvalidOpcode {
                    instruction: word,
                    address: 7
                })
            );
        }
    }

    #[test]
    fn unknown_mode() {
        assert_eq!(decode(301, 0), Err(Error::InvalidMode(3)));
        assert_eq!(decode(9001, 0), Err(Error::InvalidMode(9)));
    }

    #[test]
    fn ignored_high_digits() {
        assert_eq!(
            decode(21299, 0),
            Ok((
                OpCode::Halt,
                [
                    ParamMode::Relative,
                    ParamMode::Immediate,
                    ParamMode::Relative
                ]
            ))
        );
        assert_eq!(
            decode(100_099, 0),
            Ok((OpCode::Halt, [ParamMode::Positional; 3]))
        );
    }
}
