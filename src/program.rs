// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use itertools::Itertools;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use crate::Error;

/// An Intcode program: the initial contents of a [`Computer`](crate::Computer)'s memory
///
/// The program is kept by the computer so it can be [reset](crate::Computer::reset), and it is
/// cheap to clone.
///
/// The text form is a single line of comma-separated integers:
///
/// ```
/// use intcode_vm::Program;
/// let program: Program = "1002,4,3,4,33\n".parse().unwrap();
/// assert_eq!(&program[..], &[1002, 4, 3, 4, 33]);
/// assert_eq!(program.to_string(), "1002,4,3,4,33");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program(Arc<[i64]>);

impl Program {
    /// Build a program from 64-bit words serialized with `decode`, such as
    /// [`i64::from_le_bytes`]. Returns the number of leftover bytes if `bytes` is not a whole
    /// number of words.
    ///
    /// # Errors
    ///
    /// If the length of `bytes` is not a multiple of 8, returns the remainder.
    pub fn from_words(bytes: &[u8], decode: impl Fn([u8; 8]) -> i64) -> Result<Self, usize> {
        let (chunks, remainder) = bytes.as_chunks::<8>();
        if remainder.is_empty() {
            Ok(chunks.iter().copied().map(decode).collect())
        } else {
            Err(remainder.len())
        }
    }
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }
        text.split(',')
            .map(str::trim)
            .map(|token| {
                token.parse::<i64>().map_err(|source| Error::Parse {
                    token: token.to_owned(),
                    source,
                })
            })
            .collect()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format(","))
    }
}

impl Deref for Program {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl FromIterator<i64> for Program {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<i64>> for Program {
    fn from(code: Vec<i64>) -> Self {
        Self(code.into())
    }
}
