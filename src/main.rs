use std::error::Error;
use std::fs::File;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use log::info;

use chip8vm::config::Config;
use chip8vm::display::MonoTermDisplay;
use chip8vm::error::LoadError;
use chip8vm::frontend::Frontend;
use chip8vm::input::TermInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::mediator::Mediator;
use chip8vm::sound::{Mute, SimpleBeep, Sound};

/// ran until asked to stop
const EXIT_STOPPED: u8 = 0;
/// the interpreter faulted, or the terminal gave up on us
const EXIT_FAULT: u8 = 1;
/// the program image couldn't be loaded
const EXIT_IMAGE_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.log_level.into())
        .parse_default_env()
        .init();

    // initialise
    let mediator = Mediator::new();
    let mut interpreter = Chip8Interpreter::new(&mediator, config.engine_options());

    // load a program
    let loaded = File::open(&config.rom)
        .map_err(LoadError::from)
        .and_then(|mut f| interpreter.load_program(&mut f));
    if let Err(e) = loaded {
        eprintln!("{}: {}", config.rom.display(), e);
        return ExitCode::from(EXIT_IMAGE_REJECTED);
    }

    let (presented, ran) = thread::scope(|s| {
        let engine = s.spawn(move || interpreter.run());
        let presented = present(&config, &mediator);
        mediator.request_stop();
        let ran = engine.join();
        (presented, ran)
    });

    // the terminal is back to normal by now, so it's safe to print
    let mut status = EXIT_STOPPED;
    if let Err(e) = presented {
        eprintln!("display error: {}", e);
        status = EXIT_FAULT;
    }
    match ran {
        Ok(Ok(())) => info!("stopped"),
        Ok(Err(fault)) => {
            eprintln!("fault: {}", fault);
            status = EXIT_FAULT;
        }
        Err(_) => {
            eprintln!("interpreter thread panicked");
            status = EXIT_FAULT;
        }
    }
    ExitCode::from(status)
}

/// set up the terminal and run the presentation loop; the devices are dropped,
/// and the terminal restored, before this returns
fn present(config: &Config, mediator: &Mediator) -> Result<(), Box<dyn Error>> {
    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new(config.key_hold())?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };
    Frontend::new(
        &mut display,
        &mut input,
        sound.as_mut(),
        config.frame_period(),
    )
    .run(mediator)
}
