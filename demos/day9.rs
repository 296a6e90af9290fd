// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 9 built using the `intcode_vm` library.

use intcode_vm::prelude::*;

fn boost(mut computer: Computer, mode: i64) -> i64 {
    let (output, state) = computer.run_through_inputs([mode]).unwrap();
    assert_eq!(state, State::Halted, "intcode did not halt");
    assert_eq!(output.len(), 1, "{output:?}");
    output[0]
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let computer = Computer::from(input.parse::<Program>().unwrap());
    println!("part 1: {}", boost(computer.clone(), 1));
    println!("part 2: {}", boost(computer, 2));
}
