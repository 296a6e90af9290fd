// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 2 built using the `intcode_vm` library.

use intcode_vm::prelude::*;

fn run_with(computer: &mut Computer, noun: i64, verb: i64) -> i64 {
    computer.reset();
    computer.mem_set(1, noun).unwrap();
    computer.mem_set(2, verb).unwrap();
    let (output, state) = computer.run_through_inputs([]).unwrap();
    assert_eq!(state, State::Halted, "intcode did not run to completion");
    assert!(output.is_empty(), "intcode had unexpected output");
    computer.mem_get(0).unwrap()
}

fn part1(computer: &mut Computer) -> i64 {
    run_with(computer, 12, 2)
}

fn part2(computer: &mut Computer) -> i64 {
    for noun in 0..=99 {
        for verb in 0..=99 {
            #[allow(clippy::unreadable_literal, reason = "from Advent of Code")]
            if run_with(computer, noun, verb) == 19690720 {
                return 100 * noun + verb;
            }
        }
    }
    panic!("no answer found for part 2");
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let mut computer = Computer::from(input.parse::<Program>().unwrap());
    println!("part 1: {}", part1(&mut computer));
    println!("part 2: {}", part2(&mut computer));
}
