// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 5 built using the `intcode_vm` library.

use intcode_vm::prelude::*;

/// Run the diagnostic program for the system with ID `system_id`
fn diagnose(mut computer: Computer, system_id: i64) -> i64 {
    let (mut outputs, State::Halted) = computer.run_through_inputs([system_id]).unwrap() else {
        panic!("diagnostic program did not halt");
    };
    let diagnostic = outputs.pop().unwrap();
    assert!(outputs.into_iter().all(|i| i == 0), "diagnostic failed");

    diagnostic
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let computer = Computer::from(input.parse::<Program>().unwrap());
    println!("part 1: {}", diagnose(computer.clone(), 1));
    println!("part 2: {}", diagnose(computer, 5));
}
