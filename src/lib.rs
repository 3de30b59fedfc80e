//! A CHIP-8 interpreter that runs in the terminal.
//!
//! ## Design
//!
//! * the interpreter runs on its own thread, as fast as it likes, with a
//!   short sleep between instructions
//! * delay and sound timers follow the wall clock (60Hz-ish), however many
//!   instructions ran in between
//! * presentation (screen, keyboard, beeper) runs on another thread at its own
//!   frame rate, behind traits so alternatives can be plugged in
//! * the two threads only meet in the `Mediator`: one lock around the shared
//!   frame, keys, sound flag and stop flag, plus a condition variable for the
//!   one place the interpreter may block (Fx0A, wait for a key)
//! * every fault is fatal: it stops the mediator, which winds down the
//!   presentation side as well
//!
//! Model
//!
//! main
//!  |-- config (command line)
//!  |-- mediator
//!  |-- interpreter(mediator, options)
//!  |    |-- memory map: font, program at 0x200
//!  |    |-- instruction decoding
//!  |    `-- timers, frame buffer
//!  |-- frontend(display, input, sound) -- on the main thread
//!  `-- interpreter.run()                -- on a scoped thread
//!       |-- while !mediator.should_stop() {
//!       |     step(); update_timers(now); sleep(cycle_delay);
//!       |   }
//!       `-- on fault: mediator.request_stop(); return the fault
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod frontend;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod mediator;
pub mod memory;
pub mod sound;
pub mod timer;
