// Integration tests for the Befunge-93 plugin

use fungetty::befunge93::{load_program, Befunge93, STACK};
use fungetty::engine::{Engine, EngineState, Event, FungeError, Phase, RunOutcome};
use fungetty::io::{FungeOutput, ReaderInput, INPUT, OUTPUT};
use fungetty::ip::SharedState;
use fungetty::snapshot::{MockTerminal, TerminalOutput};
use fungetty::space::{Coord, Direction, FungeSpace, Overlay, Precision, Space, SparseSpace};
use fungetty::FungeResult;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

struct Run {
    result: FungeResult<RunOutcome<u8>>,
    output: String,
    engine: Engine<u8>,
}

fn engine_over(
    space: FungeSpace<u8>,
    input: &str,
    seed: u64,
) -> (Engine<u8>, Arc<Mutex<MockTerminal>>) {
    let terminal = Arc::new(Mutex::new(MockTerminal::new()));
    let output: Box<dyn FungeOutput> = Box::new(TerminalOutput::new(Arc::clone(&terminal)));
    let input: Box<dyn fungetty::io::FungeInput> =
        Box::new(ReaderInput::new(Cursor::new(input.as_bytes().to_vec())));

    let mut shared = SharedState::new();
    shared.insert(&OUTPUT, output);
    shared.insert(&INPUT, input);

    let engine = Engine::start(space, Arc::new(Befunge93::with_seed(seed)), shared)
        .expect("Engine creation failed");
    (engine, terminal)
}

fn engine_with(source: &str, input: &str, seed: u64) -> (Engine<u8>, Arc<Mutex<MockTerminal>>) {
    let grid = load_program(source).expect("Loading failed");
    engine_over(grid.into(), input, seed)
}

fn run_with_input(source: &str, input: &str) -> Run {
    let (mut engine, terminal) = engine_with(source, input, 1);
    let result = engine.run_for(10_000);
    let output = terminal.lock().unwrap().contents();
    Run {
        result,
        output,
        engine,
    }
}

fn run(source: &str) -> Run {
    run_with_input(source, "")
}

fn assert_halts_with_output(source: &str, expected: &str) {
    let run = run(source);
    assert!(
        matches!(run.result, Ok(RunOutcome::Halted(Some(0)))),
        "{:?} did not halt cleanly: {:?}",
        source,
        run.result
    );
    assert_eq!(run.output, expected, "output of {:?}", source);
}

#[test]
fn test_multiply_and_print() {
    let run = run("25*.@");
    assert!(matches!(run.result, Ok(RunOutcome::Halted(Some(0)))));
    assert_eq!(run.output, "10 ");
    assert_eq!(run.engine.tick_count(), 5);
}

#[test]
fn test_lone_halt() {
    let run = run("@");
    assert!(matches!(run.result, Ok(RunOutcome::Halted(Some(0)))));
    assert_eq!(run.output, "");
    assert_eq!(run.engine.tick_count(), 1);
}

#[test]
fn test_string_mode_pushes_codes() {
    let stack = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&stack);

    let (mut engine, _) = engine_with("\"Hi\"@", "", 1);
    engine.subscribe(move |event: &Event, state: &mut EngineState<u8>| -> FungeResult<()> {
        if event.phase == Phase::Halt {
            *seen.lock().unwrap() = state.ips[0].state.get(&STACK)?.clone();
        }
        Ok(())
    });
    assert_eq!(engine.run().unwrap(), Some(0));
    assert_eq!(*stack.lock().unwrap(), vec![72, 105]);
}

#[test]
fn test_hello_world() {
    assert_halts_with_output("\"!olleH\",,,,,,@", "Hello!");
}

#[test]
fn test_stack_manipulation() {
    assert_halts_with_output("3:..@", "3 3 ");
    assert_halts_with_output("12\\..@", "1 2 ");
    assert_halts_with_output("12$.@", "1 ");
}

#[test]
fn test_arithmetic() {
    assert_halts_with_output("34+.@", "7 ");
    assert_halts_with_output("34-.@", "-1 ");
    assert_halts_with_output("82/.@", "4 ");
    assert_halts_with_output("73%.@", "1 ");
    // Division truncates toward zero
    assert_halts_with_output("07-2/.@", "-3 ");
    assert_halts_with_output("52`.@", "1 ");
    assert_halts_with_output("25`.@", "0 ");
    assert_halts_with_output("0!.5!.@", "1 0 ");
}

#[test]
fn test_division_by_zero_faults() {
    let divide = run("10/.@");
    assert!(matches!(
        divide.result,
        Err(FungeError::DivisionByZero { operation: "/" })
    ));
    let modulo = run("10%.@");
    assert!(matches!(
        modulo.result,
        Err(FungeError::DivisionByZero { operation: "%" })
    ));
}

#[test]
fn test_underflow_faults() {
    let run = run(".@");
    assert!(matches!(
        run.result,
        Err(FungeError::StackUnderflow {
            needed: 1,
            available: 0
        })
    ));
}

#[test]
fn test_branch_directions() {
    let cases = [
        ("0_@", Direction::WEST),
        ("1_@", Direction::EAST),
        ("0|@", Direction::NORTH),
        ("1|@", Direction::SOUTH),
    ];
    for (source, expected) in cases {
        let (mut engine, _) = engine_with(source, "", 1);
        // Two ticks: push, then branch; the move afterwards keeps the heading.
        assert_eq!(engine.run_for(2).unwrap(), RunOutcome::TickLimit);
        assert_eq!(engine.state().ips[0].direction, expected, "{}", source);
    }
}

#[test]
fn test_branch_program() {
    assert_halts_with_output("1_3.@", "3 ");
    // West from column 1 wraps around to the far edge
    assert_halts_with_output("0_@.2", "2 ");
}

#[test]
fn test_wraparound() {
    assert_halts_with_output("<@.1", "1 ");
    assert_halts_with_output("^\n\n\n\n\n@", "");
}

#[test]
fn test_bridge_skips_cell() {
    assert_halts_with_output("1#2.@", "1 ");
}

fn grid_cells(engine: &Engine<u8>) -> Vec<(Coord, u8)> {
    let space = &engine.state().space;
    (0..25)
        .flat_map(|y| (0..80).map(move |x| Coord::from([x, y])))
        .map(|coord| {
            let cell = space.read(&coord).unwrap();
            (coord, cell)
        })
        .collect()
}

#[test]
fn test_put_then_get() {
    let (mut engine, terminal) = engine_with("\"*\"34p34g.@", "", 1);
    let before = grid_cells(&engine);

    assert_eq!(engine.run_for(10_000).unwrap(), RunOutcome::Halted(Some(0)));
    assert_eq!(terminal.lock().unwrap().contents(), "42 ");

    let target = Coord::from([3, 4]);
    for ((coord, old), (_, new)) in before.iter().zip(grid_cells(&engine)) {
        if *coord == target {
            assert_eq!(new, 42);
        } else {
            assert_eq!(*old, new, "cell {:?} changed", coord);
        }
    }
}

#[test]
fn test_self_modifying_program() {
    // `p` plants a halt in front of the print
    assert_halts_with_output("\"@\"60p 1.@", "");
}

#[test]
fn test_get_outside_grid_faults() {
    let run = run("09-0g@");
    assert!(matches!(run.result, Err(FungeError::IndexOutOfRange { .. })));
}

#[test]
fn test_input_number_and_char() {
    let run = run_with_input("&&+.@", "3 4");
    assert_eq!(run.output, "7 ");

    let run = run_with_input("~~,,@", "AB");
    assert_eq!(run.output, "BA");
}

#[test]
fn test_input_faults() {
    let run = run_with_input("&.@", "abc");
    assert!(matches!(run.result, Err(FungeError::InputFormat { .. })));

    let run = run_with_input("~.@", "");
    assert!(matches!(run.result, Err(FungeError::UnexpectedEof)));
}

#[test]
fn test_seeded_random_is_reproducible() {
    let outcome = |seed| {
        let (mut engine, terminal) = engine_with("?1.@", "", seed);
        let result = engine.run_for(100_000).unwrap();
        let output = terminal.lock().unwrap().contents();
        (result, engine.tick_count(), output)
    };
    assert_eq!(outcome(11), outcome(11));
}

#[test]
fn test_rejects_unsupported_space() {
    let sparse = SparseSpace::new(2, Precision::I32, b' ').unwrap();
    let result = Engine::start(
        sparse.into(),
        Arc::new(Befunge93::new()),
        SharedState::new(),
    );
    assert!(matches!(
        result,
        Err(FungeError::UnsupportedSpace { .. })
    ));
}

#[test]
fn test_overlay_keeps_backing_grid_clean() {
    let grid = load_program("\"@\"60p 1.@").unwrap();
    let base = Overlay::new(grid.into());
    let backing = base.backing();
    let scoped = base.with_cell(Coord::from([6, 0]), b' ');

    let (mut engine, terminal) = engine_over(scoped.into(), "", 1);
    assert_eq!(engine.run().unwrap(), Some(0));
    assert_eq!(terminal.lock().unwrap().contents(), "");

    let cell = Coord::from([6, 0]);
    assert_eq!(engine.state().space.read(&cell).unwrap(), b'@');
    assert_eq!(backing.lock().unwrap().read(&cell).unwrap(), b' ');
}
