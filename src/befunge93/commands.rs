//! Befunge-93 instruction set
//!
//! [`Command::decode`] maps a cell to its instruction; [`Command::execute`] runs it
//! against the IP at a given index of the live sequence. String mode is handled by
//! the caller before decoding.

use super::{RNG, STACK, STRING_MODE};
use crate::engine::errors::{FungeError, FungeResult};
use crate::engine::state::{EngineState, HaltingDecision};
use crate::io::{INPUT, OUTPUT};
use crate::space::{Coord, Direction, Space};
use rand::Rng;

/// One decoded Befunge-93 instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `0`-`9`
    Push(i32),
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Not,
    Greater,
    /// `>` `<` `v` `^`
    Go(Direction),
    Random,
    /// `_`: west on zero, east otherwise
    HorizontalIf,
    /// `|`: north on zero, south otherwise
    VerticalIf,
    StringMode,
    Duplicate,
    Swap,
    Discard,
    OutputNumber,
    OutputChar,
    Bridge,
    Get,
    Put,
    InputNumber,
    InputChar,
    Halt,
    Nop,
}

impl Command {
    pub fn decode(cell: u8) -> Command {
        match cell {
            b'0'..=b'9' => Command::Push(i32::from(cell - b'0')),
            b'+' => Command::Add,
            b'-' => Command::Subtract,
            b'*' => Command::Multiply,
            b'/' => Command::Divide,
            b'%' => Command::Modulo,
            b'!' => Command::Not,
            b'`' => Command::Greater,
            b'>' => Command::Go(Direction::EAST),
            b'<' => Command::Go(Direction::WEST),
            b'v' => Command::Go(Direction::SOUTH),
            b'^' => Command::Go(Direction::NORTH),
            b'?' => Command::Random,
            b'_' => Command::HorizontalIf,
            b'|' => Command::VerticalIf,
            b'"' => Command::StringMode,
            b':' => Command::Duplicate,
            b'\\' => Command::Swap,
            b'$' => Command::Discard,
            b'.' => Command::OutputNumber,
            b',' => Command::OutputChar,
            b'#' => Command::Bridge,
            b'g' => Command::Get,
            b'p' => Command::Put,
            b'&' => Command::InputNumber,
            b'~' => Command::InputChar,
            b'@' => Command::Halt,
            _ => Command::Nop,
        }
    }

    /// Run against the IP at `index` in `state.ips`
    pub fn execute(
        &self,
        state: &mut EngineState<u8>,
        index: usize,
    ) -> FungeResult<HaltingDecision<u8>> {
        let ip = &mut state.ips[index];

        match self {
            Command::Push(value) => ip.state.get_mut(&STACK)?.push(*value),
            Command::Add => binary(ip.state.get_mut(&STACK)?, |a, b| Ok(a.wrapping_add(b)))?,
            Command::Subtract => {
                binary(ip.state.get_mut(&STACK)?, |a, b| Ok(a.wrapping_sub(b)))?
            }
            Command::Multiply => {
                binary(ip.state.get_mut(&STACK)?, |a, b| Ok(a.wrapping_mul(b)))?
            }
            Command::Divide => binary(ip.state.get_mut(&STACK)?, |a, b| {
                if b == 0 {
                    return Err(FungeError::DivisionByZero { operation: "/" });
                }
                Ok(a.wrapping_div(b))
            })?,
            Command::Modulo => binary(ip.state.get_mut(&STACK)?, |a, b| {
                if b == 0 {
                    return Err(FungeError::DivisionByZero { operation: "%" });
                }
                Ok(a.wrapping_rem(b))
            })?,
            Command::Not => {
                let stack = ip.state.get_mut(&STACK)?;
                let value = pop(stack)?;
                stack.push(i32::from(value == 0));
            }
            Command::Greater => binary(ip.state.get_mut(&STACK)?, |a, b| Ok(i32::from(a > b)))?,
            Command::Go(direction) => ip.direction = direction.clone(),
            Command::Random => {
                let choice = ip.state.get_mut(&RNG)?.gen_range(0..4);
                ip.direction = match choice {
                    0 => Direction::EAST,
                    1 => Direction::SOUTH,
                    2 => Direction::WEST,
                    _ => Direction::NORTH,
                };
            }
            Command::HorizontalIf => {
                let value = pop(ip.state.get_mut(&STACK)?)?;
                ip.direction = if value == 0 {
                    Direction::WEST
                } else {
                    Direction::EAST
                };
            }
            Command::VerticalIf => {
                let value = pop(ip.state.get_mut(&STACK)?)?;
                ip.direction = if value == 0 {
                    Direction::NORTH
                } else {
                    Direction::SOUTH
                };
            }
            Command::StringMode => {
                let mode = ip.state.get_mut(&STRING_MODE)?;
                *mode = !*mode;
            }
            Command::Duplicate => {
                let stack = ip.state.get_mut(&STACK)?;
                let top = peek(stack)?;
                stack.push(top);
            }
            Command::Swap => {
                let stack = ip.state.get_mut(&STACK)?;
                let (second, top) = pop_two(stack)?;
                stack.push(top);
                stack.push(second);
            }
            Command::Discard => {
                pop(ip.state.get_mut(&STACK)?)?;
            }
            Command::OutputNumber => {
                let value = pop(ip.state.get_mut(&STACK)?)?;
                state.shared.get_mut(&OUTPUT)?.write_number(value)?;
            }
            Command::OutputChar => {
                let value = pop(ip.state.get_mut(&STACK)?)?;
                state.shared.get_mut(&OUTPUT)?.write_unit(value as u8)?;
            }
            Command::Bridge => {
                ip.position = state.space.move_coord(&ip.position, &ip.direction)?;
            }
            Command::Get => {
                let stack = ip.state.get_mut(&STACK)?;
                let (x, y) = pop_two(stack)?;
                let cell = state.space.read(&Coord::from([i64::from(x), i64::from(y)]))?;
                stack.push(i32::from(cell));
            }
            Command::Put => {
                let stack = ip.state.get_mut(&STACK)?;
                let (x, y) = pop_two(stack)?;
                let value = pop(stack)?;
                state
                    .space
                    .write(&Coord::from([i64::from(x), i64::from(y)]), value as u8)?;
            }
            Command::InputNumber => {
                flush_output(&mut state.shared)?;
                let value = state.shared.get_mut(&INPUT)?.read_integer()?;
                ip.state.get_mut(&STACK)?.push(value);
            }
            Command::InputChar => {
                flush_output(&mut state.shared)?;
                let unit = state.shared.get_mut(&INPUT)?.read_unit()?;
                ip.state.get_mut(&STACK)?.push(i32::from(unit));
            }
            Command::Halt => return Ok(HaltingDecision::Halt(Some(0))),
            Command::Nop => {}
        }

        Ok(HaltingDecision::Continue)
    }
}

/// Prompts written before a read must reach the user first.
fn flush_output(shared: &mut crate::ip::SharedState) -> FungeResult<()> {
    if let Ok(output) = shared.get_mut(&OUTPUT) {
        output.flush()?;
    }
    Ok(())
}

pub fn pop(stack: &mut Vec<i32>) -> FungeResult<i32> {
    stack.pop().ok_or(FungeError::StackUnderflow {
        needed: 1,
        available: 0,
    })
}

pub fn peek(stack: &[i32]) -> FungeResult<i32> {
    stack.last().copied().ok_or(FungeError::StackUnderflow {
        needed: 1,
        available: 0,
    })
}

/// Pop the top two values as `(second_from_top, top)`
pub fn pop_two(stack: &mut Vec<i32>) -> FungeResult<(i32, i32)> {
    if stack.len() < 2 {
        return Err(FungeError::StackUnderflow {
            needed: 2,
            available: stack.len(),
        });
    }
    let top = pop(stack)?;
    let second = pop(stack)?;
    Ok((second, top))
}

fn binary(
    stack: &mut Vec<i32>,
    op: impl FnOnce(i32, i32) -> FungeResult<i32>,
) -> FungeResult<()> {
    let (left, right) = pop_two(stack)?;
    stack.push(op(left, right)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(Command::decode(b'7'), Command::Push(7));
        assert_eq!(Command::decode(b'-'), Command::Subtract);
        assert_eq!(Command::decode(b'v'), Command::Go(Direction::SOUTH));
        assert_eq!(Command::decode(b'"'), Command::StringMode);
        assert_eq!(Command::decode(b' '), Command::Nop);
        assert_eq!(Command::decode(b'x'), Command::Nop);
    }

    #[test]
    fn test_pop_two_order() {
        let mut stack = vec![1, 2, 3];
        assert_eq!(pop_two(&mut stack).unwrap(), (2, 3));
        assert_eq!(stack, vec![1]);
    }

    #[test]
    fn test_underflow_reports_counts() {
        let mut stack = vec![5];
        assert!(matches!(
            pop_two(&mut stack),
            Err(FungeError::StackUnderflow {
                needed: 2,
                available: 1
            })
        ));
        assert_eq!(stack, vec![5]);
        assert!(peek(&[]).is_err());
    }

    #[test]
    fn test_binary_consumes_operands_on_fault() {
        let mut stack = vec![7, 0];
        let result = binary(&mut stack, |a, b| {
            if b == 0 {
                return Err(FungeError::DivisionByZero { operation: "/" });
            }
            Ok(a / b)
        });
        assert!(matches!(result, Err(FungeError::DivisionByZero { .. })));
        assert!(stack.is_empty());
    }
}
