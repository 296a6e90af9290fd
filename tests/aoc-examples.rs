//! Test that examples from Advent of Code problem descriptions behave as described.
// SPDX-FileCopyrightText: 2024 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use either::Either;
use intcode_vm::prelude::*;
use intcode_vm::trace::{Trace, TracedInstr};
use intcode_vm::{OpCode, ParamMode};
use itertools::Itertools;

// first, some groundwork for common elements of different tests

/// Construct a new computer with the given starting code
macro_rules! computer {
    [$($i:expr),*] => {{
        Computer::new([$($i),*])
    }}
}

/// Run a computer to end, returning its output.
/// Borrows the computer in case its trace is useful
fn run_to_end(
    computer: &mut Computer,
    inputs: impl IntoIterator<Item = i64>,
) -> Result<Vec<i64>, Either<intcode_vm::Error, Awaiting>> {
    let (output, state) = computer
        .run_through_inputs(inputs)
        .map_err(Either::Left)?;
    if state == State::Halted {
        Ok(output)
    } else {
        Err(Either::Right(Awaiting { output }))
    }
}

/// A struct with the information about expected traced instruction
struct ExpectedOp {
    op_int: i64,
    instr_ptr: i64,
    stored_val: Option<i64>,
}

impl ExpectedOp {
    const fn new(op_int: i64, instr_ptr: i64, stored_val: Option<i64>) -> Self {
        Self {
            op_int,
            instr_ptr,
            stored_val,
        }
    }

    fn validate(self, traced: TracedInstr) {
        assert_eq!(self.op_int, traced.op_int());
        assert_eq!(self.instr_ptr, traced.instr_ptr());
        assert_eq!(self.stored_val, traced.stored_val());
    }
}

fn validate_trace(expected: impl IntoIterator<Item = ExpectedOp>, Trace(trace): Trace) {
    expected
        .into_iter()
        .zip_eq(trace)
        .for_each(|(op, instr)| op.validate(instr));
}

mod day2_examples {
    mod part1 {
        use crate::*;

        /// the extended example used to help illustrate the basics
        #[test]
        fn extended_example() {
            let mut computer = computer![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
            computer.start_trace();
            let output = run_to_end(&mut computer, []).unwrap();
            assert!(output.is_empty());
            const EXPECTED: [ExpectedOp; 3] = [
                ExpectedOp::new(1, 0, Some(70)),
                ExpectedOp::new(2, 4, Some(3500)),
                ExpectedOp::new(99, 8, None),
            ];
            validate_trace(EXPECTED, computer.end_trace().unwrap());
            assert_eq!(computer[0], 3500);
        }

        /// the extra, smaller examples that are listed after the extended example
        #[test]
        fn small_examples() {
            macro_rules! example {
                ($($code: literal),+ becomes $($output: literal),+) => {{
                    let mut computer = computer![$($code),*];
                    run_to_end(&mut computer, []).unwrap();
                    for (i, val) in [$($output),+].into_iter().enumerate() {
                        assert_eq!(computer[i as i64], val);
                    }
                }}
            }
            example!(1,0,0,0,99 becomes 2,0,0,0,99);
            example!(2,3,0,3,99 becomes 2,3,0,6,99);
            example!(2,4,4,5,99,0 becomes 2,4,4,5,99,9801);
            example!(1,1,1,4,99,5,6,0,99 becomes 30,1,1,4,2,5,6,0,99);
        }
    }
}

mod day5_examples {
    mod part1 {
        use crate::*;

        #[test]
        fn echo_input() {
            let template = computer![3, 0, 4, 0, 99];
            for i in -128..128 {
                assert_eq!(run_to_end(&mut template.clone(), [i]).unwrap(), vec![i]);
            }
        }

        #[test]
        fn immediate_mode_example() {
            let mut computer = computer![1002, 4, 3, 4, 33];
            computer.start_trace();
            let output = run_to_end(&mut computer, []).unwrap();
            assert!(output.is_empty());
            const EXPECTED: [ExpectedOp; 2] = [
                ExpectedOp::new(1002, 0, Some(99)),
                ExpectedOp::new(99, 4, None),
            ];
            let trace = computer.end_trace().unwrap();
            assert_eq!(
                trace.0[0].param_modes(),
                [
                    ParamMode::Positional,
                    ParamMode::Immediate,
                    ParamMode::Positional
                ]
            );
            validate_trace(EXPECTED, trace);
        }

        #[test]
        fn negative_immediate() {
            let mut computer = computer![1101, 100, -1, 4, 0];
            assert!(run_to_end(&mut computer, []).unwrap().is_empty());
            assert_eq!(computer[4], 99);
        }
    }

    mod part2 {
        use crate::*;

        #[test]
        fn comparison_examples() {
            let templates = [
                computer![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8],
                computer![3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8],
                computer![3, 3, 1108, -1, 8, 3, 4, 3, 99],
                computer![3, 3, 1107, -1, 8, 3, 4, 3, 99],
            ];

            let expected_builder = |mode, cmp_op, input| {
                let val = i64::from(if cmp_op == OpCode::Lt {
                    input < 8
                } else {
                    input == 8
                });
                let expected = [
                    ExpectedOp::new(OpCode::In as i64, 0, Some(input)),
                    ExpectedOp::new(cmp_op as i64 + (mode as i64 * 1100), 2, Some(val)),
                    ExpectedOp::new(OpCode::Out as i64, 6, None),
                    ExpectedOp::new(OpCode::Halt as i64, 8, None),
                ];
                (expected, val)
            };

            let expected = |i: i64| {
                [
                    expected_builder(ParamMode::Positional, OpCode::Eq, i),
                    expected_builder(ParamMode::Positional, OpCode::Lt, i),
                    expected_builder(ParamMode::Immediate, OpCode::Eq, i),
                    expected_builder(ParamMode::Immediate, OpCode::Lt, i),
                ]
            };

            for input in [7, 8, 9] {
                let mut computers = templates.clone();
                let expected_traces = expected(input);
                for (computer, (trace, out)) in computers.iter_mut().zip(expected_traces) {
                    computer.start_trace();
                    let output = run_to_end(computer, [input]).unwrap();
                    assert_eq!(output, vec![out]);
                    validate_trace(trace, computer.end_trace().unwrap());
                }
            }
        }

        #[test]
        fn part2_jump_examples() {
            let templates = [
                computer![3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9],
                computer![3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1],
            ];

            for i in [0, 1] {
                let mut computers = templates.clone();
                for computer in &mut computers {
                    computer.add_input(i);
                    assert_eq!(computer.step(), Ok(State::Running));
                    computer.start_trace();
                    assert_eq!(computer.step(), Ok(State::Running));
                    assert!(computer.output().is_empty());
                }
                let modes: [[ParamMode; 3]; 2] = core::array::from_fn(|i| {
                    let Trace(trace) = computers[i].end_trace().unwrap();
                    assert_eq!(trace.len(), 1);
                    trace[0].param_modes()
                });
                for mut computer in computers {
                    assert_eq!(run_to_end(&mut computer, []).unwrap(), vec![i]);
                }
                assert_eq!(
                    modes,
                    [
                        [ParamMode::Positional; 3],
                        [
                            ParamMode::Immediate,
                            ParamMode::Immediate,
                            ParamMode::Positional
                        ]
                    ]
                );
            }
        }

        /// > uses an input instruction to ask for a single number. The program will then output
        /// > 999 if the input value is below 8, output 1000 if the input value is equal to 8, or
        /// > output 1001 if the input value is greater than 8.
        #[test]
        fn larger_example() {
            let template = computer![
                3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36,
                98, 0, 0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101,
                1000, 1, 20, 4, 20, 1105, 1, 46, 98, 99
            ];
            for (input, expected) in [(-3, 999), (7, 999), (8, 1000), (9, 1001), (100, 1001)] {
                assert_eq!(
                    run_to_end(&mut template.clone(), [input]).unwrap(),
                    vec![expected]
                );
            }
        }
    }
}

mod day7_examples {
    use crate::*;
    use intcode_vm::io::Shared;

    fn thruster_signal(code: &[i64], phases: &[i64]) -> i64 {
        let links: Vec<_> = phases
            .iter()
            .map(|&phase| Shared::new(QueueIo::from([phase])))
            .collect();
        links[0].borrow_mut().add_input(0);
        let mut amps: Vec<_> = (0..phases.len())
            .map(|i| {
                Computer::with_io(
                    code.iter().copied(),
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
        links[0].borrow_mut().take_output().unwrap()
    }

    #[test]
    fn serial_amplifiers() {
        let code = [
            3, 15, 3, 16, 1002, 16, 10, 16, 1, 16, 15, 15, 4, 15, 99, 0, 0,
        ];
        assert_eq!(thruster_signal(&code, &[4, 3, 2, 1, 0]), 43210);
    }

    #[test]
    fn feedback_loop() {
        let code = [
            3, 26, 1001, 26, -4, 26, 3, 27, 1002, 27, 2, 27, 1, 27, 26, 27, 4, 27, 1001, 28, -1,
            28, 1005, 28, 6, 99, 0, 0, 5,
        ];
        assert_eq!(thruster_signal(&code, &[9, 8, 7, 6, 5]), 139_629_729);
        let best = (5_i64..10)
            .permutations(5)
            .map(|phases| thruster_signal(&code, &phases))
            .max();
        assert_eq!(best, Some(139_629_729));
    }
}

mod day9_examples {
    mod part1 {
        use crate::*;
        /// > takes no input and produces a copy of itself as output.
        #[test]
        fn quine() {
            let quine_code = [
                109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
            ];
            let mut computer = Computer::new(quine_code);
            let output = run_to_end(&mut computer, []).unwrap();
            assert_eq!(output.as_slice(), quine_code.as_slice());
        }

        /// > should output a 16-digit number
        #[test]
        fn output_sixteen_digit() {
            let mut computer = computer![1102, 34915192, 34915192, 7, 4, 7, 99, 0];
            let output = run_to_end(&mut computer, []).unwrap();
            assert_eq!(output.len(), 1, "{output:?}");
            assert_eq!(output[0].to_string().len(), 16, "{output:?}");
        }

        /// > should output the large number in the middle
        #[test]
        fn large_number() {
            let mut computer = computer![104, 1125899906842624, 99];
            let output = run_to_end(&mut computer, []).unwrap();
            assert_eq!(output, vec![1125899906842624]);
        }
    }
}

#[test]
fn awaiting_reports_partial_output() {
    // OUT #1, IN 0, HLT
    let mut computer = computer![104, 1, 3, 0, 99];
    let Err(Either::Right(Awaiting { output })) = run_to_end(&mut computer, []) else {
        panic!("expected to be awaiting input");
    };
    assert_eq!(output, vec![1]);
    assert_eq!(computer.ip(), 2);
    assert_eq!(run_to_end(&mut computer, [5]).unwrap(), Vec::<i64>::new());
    assert_eq!(computer[0], 5);
}

#[derive(Debug)]
struct Awaiting {
    output: Vec<i64>,
}
