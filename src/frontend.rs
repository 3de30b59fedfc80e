use std::error::Error;
use std::time::{Duration, Instant};

use log::info;

use crate::display::Display;
use crate::input::Input;
use crate::mediator::{Mediator, KEY_COUNT};
use crate::sound::Sound;

/// The presentation side: keyboard in, frames and sound out. Runs on its own
/// thread at its own pace and only ever talks to the interpreter through the
/// `Mediator`.
pub struct Frontend<'a> {
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    frame_period: Duration,
}

impl<'a> Frontend<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        frame_period: Duration,
    ) -> Frontend<'a> {
        Frontend {
            display,
            input,
            sound,
            frame_period,
        }
    }

    /// Present until the mediator says stop. Quitting from the keyboard, or
    /// any device error, requests the stop itself so the interpreter winds
    /// down too.
    pub fn run(&mut self, mediator: &Mediator) -> Result<(), Box<dyn Error>> {
        let result = self.present(mediator);
        mediator.request_stop();
        // always leave the speaker quiet
        let silenced = self.sound.follow(false);
        result.and(silenced)
    }

    fn present(&mut self, mediator: &Mediator) -> Result<(), Box<dyn Error>> {
        let mut keys = [false; KEY_COUNT];
        loop {
            let frame_start = Instant::now();

            let event = self.input.poll()?;
            if event.keys != keys {
                keys = event.keys;
                mediator.set_keys(keys);
            }
            if event.quit {
                info!("quit from the keyboard");
                mediator.request_stop();
            }

            if mediator.is_frame_dirty() {
                self.display.draw(&mediator.consume_frame())?;
            }
            self.sound.follow(mediator.is_sound_active())?;

            if mediator.should_stop() {
                return Ok(());
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_period {
                spin_sleep::sleep(self.frame_period - elapsed);
            }
        }
    }
}
