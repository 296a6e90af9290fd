// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 7 built using the `intcode_vm` library.
//!
//! Each amplifier reads from the [`Shared`] queue that the previous one writes to, so the whole
//! chain runs without copying values between computers.

use intcode_vm::io::Shared;
use intcode_vm::prelude::*;
use itertools::Itertools;

fn thruster_signal(program: &Program, phases: &[i64]) -> i64 {
    let links: Vec<_> = phases
        .iter()
        .map(|&phase| Shared::new(QueueIo::from([phase])))
        .collect();
    links[0].borrow_mut().add_input(0);
    let mut amps: Vec<_> = (0..links.len())
        .map(|i| {
            Computer::with_program(
                program.clone(),
                links[i].clone(),
                links[(i + 1) % links.len()].clone(),
            )
        })
        .collect();
    while !amps.iter().all(Computer::is_halted) {
        for amp in &mut amps {
            amp.run().unwrap();
        }
    }
    links[0]
        .borrow_mut()
        .take_output()
        .expect("last amplifier had no output")
}

fn best_signal(program: &Program, phases: std::ops::Range<i64>) -> i64 {
    phases
        .permutations(5)
        .map(|order| thruster_signal(program, &order))
        .max()
        .unwrap()
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let program: Program = input.parse().unwrap();
    println!("part 1: {}", best_signal(&program, 0..5));
    println!("part 2: {}", best_signal(&program, 5..10));
}
