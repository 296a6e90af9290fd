// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 11 built using the `intcode_vm` library.
//!
//! The robot is driven one instruction at a time: whenever it asks for input it's given the color
//! of the panel under it, and once it has output a color and a turn, it paints and moves.

use intcode_vm::prelude::*;
use itertools::Itertools;

use std::collections::{HashMap, HashSet};

type Point = (i32, i32);

/// The hull, and the robot painting it
struct Hull {
    white: HashSet<Point>,
    painted: HashSet<Point>,
    position: Point,
    /// unit vector, with y increasing downwards
    facing: Point,
}

impl Hull {
    fn new(start_white: bool) -> Self {
        let mut white = HashSet::new();
        if start_white {
            white.insert((0, 0));
        }
        Self {
            white,
            painted: HashSet::new(),
            position: (0, 0),
            facing: (0, -1),
        }
    }

    fn camera(&self) -> i64 {
        i64::from(self.white.contains(&self.position))
    }

    fn paint_and_move(&mut self, color: i64, turn: i64) {
        match color {
            0 => self.white.remove(&self.position),
            1 => self.white.insert(self.position),
            _ => panic!("invalid paint color: {color}"),
        };
        self.painted.insert(self.position);

        let (dx, dy) = self.facing;
        self.facing = match turn {
            0 => (dy, -dx),
            1 => (-dy, dx),
            _ => panic!("invalid turn: {turn}"),
        };
        self.position = (self.position.0 + self.facing.0, self.position.1 + self.facing.1);
    }
}

fn paint(mut robot: Computer, start_white: bool) -> Hull {
    let mut hull = Hull::new(start_white);
    let mut pending: Option<i64> = None;
    loop {
        match robot.step().unwrap() {
            State::Halted => break hull,
            State::AwaitingInput => robot.add_input(hull.camera()),
            State::Running => {
                let Some(value) = robot.take_output() else {
                    continue;
                };
                match pending.take() {
                    Some(color) => hull.paint_and_move(color, value),
                    None => pending = Some(value),
                }
            }
        }
    }
}

fn render(white: &HashSet<Point>) -> String {
    let (Some((x0, x1)), Some((y0, y1))) = (
        white.iter().map(|p| p.0).minmax().into_option(),
        white.iter().map(|p| p.1).minmax().into_option(),
    ) else {
        return String::new();
    };
    let rows: HashMap<i32, Vec<i32>> = white.iter().map(|&(x, y)| (y, x)).into_group_map();
    (y0..=y1)
        .map(|y| {
            (x0..=x1)
                .map(|x| match rows.get(&y) {
                    Some(xs) if xs.contains(&x) => '#',
                    _ => ' ',
                })
                .collect::<String>()
        })
        .join("\n")
}

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    env_logger::init();
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let robot = Computer::from(input.parse::<Program>().unwrap());
    println!("part 1: {}", paint(robot.clone(), false).painted.len());
    println!("part 2:\n{}", render(&paint(robot, true).white));
}
