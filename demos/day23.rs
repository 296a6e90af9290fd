// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 23 built using the `intcode_vm` library.

use intcode_vm::io::{NetworkIo, Packet};
use intcode_vm::prelude::*;

const NODES: i64 = 50;
const NAT: i64 = 255;
/// How many instructions each computer runs before the next one gets a turn
const SLICE: usize = 256;

type Nic = Computer<NetworkIo, NetworkIo>;

/// Run every computer for one time slice, then deliver the packets they sent.
///
/// Returns every packet sent to the NAT, and whether any packet was delivered.
fn tick(nics: &mut [Nic]) -> (Vec<Packet>, bool) {
    let mut to_nat = Vec::new();
    let mut busy = false;
    for i in 0..nics.len() {
        nics[i].run_bounded(SLICE).unwrap();
        while let Some((dest, packet)) = nics[i].output_mut().take_packet() {
            busy = true;
            match dest {
                NAT => to_nat.push(packet),
                0..NODES => nics[dest as usize].input_mut().send(packet),
                _ => panic!("packet sent to unknown address {dest}"),
            }
        }
    }
    (to_nat, busy)
}

fn boot(program: &Program) -> Vec<Nic> {
    (0..NODES)
        .map(|address| {
            let mut nic =
                Computer::with_program(program.clone(), NetworkIo::new(), NetworkIo::new());
            nic.add_input(address);
            nic
        })
        .collect()
}

fn part1(program: &Program) -> i64 {
    let mut nics = boot(program);
    loop {
        if let Some(packet) = tick(&mut nics).0.first() {
            break packet.y;
        }
    }
}

fn part2(program: &Program) -> i64 {
    let mut nics = boot(program);
    let mut held: Option<Packet> = None;
    let mut last_y = None;
    loop {
        let (to_nat, busy) = tick(&mut nics);
        if let Some(&packet) = to_nat.last() {
            held = Some(packet);
        }
        let idle = !busy && nics.iter().all(|nic| nic.input().queued_packets() == 0);
        if let (true, Some(packet)) = (idle, held) {
            if last_y == Some(packet.y) {
                break packet.y;
            }
            last_y = Some(packet.y);
            nics[0].input_mut().send(packet);
        }
    }
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let program: Program = input.parse().unwrap();
    println!("part 1: {}", part1(&program));
    println!("part 2: {}", part2(&program));
}
