use std::thread;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, Resolution};
use crate::config::{Settings, STARTING_APPLES};
use crate::error::GameError;
use crate::geometry::{GRID_HEIGHT, GRID_WIDTH};
use crate::input::{Command, InputSource};
use crate::render::{FrameSink, Palette, Screen, WELCOME};
use crate::snake::{MoveResult, Snek};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Running,
    Dying,
    Terminated,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub apples_eaten: u32,
    pub length: usize,
    pub ticks: u64,
    pub died: bool,
}

/// One session: owns the snake and the board, pulls keys from `I`, pushes frames to `S`.
pub struct Game<I: InputSource, S: FrameSink> {
    settings: Settings,
    snek: Snek,
    board: Board,
    screen: Screen,
    input: I,
    sink: S,
    rng: StdRng,
    phase: Phase,
    ticks: u64,
    length_at_death: Option<usize>,
}

impl<I: InputSource, S: FrameSink> Game<I, S> {
    pub fn new(settings: Settings, input: I, sink: S) -> Self {
        let board = Board::new(GRID_WIDTH, GRID_HEIGHT).with_apples(&STARTING_APPLES);
        let snek = Snek::new(GRID_WIDTH, GRID_HEIGHT);

        Self::with_parts(settings, snek, board, input, sink, StdRng::from_entropy())
    }

    pub fn with_parts(
        settings: Settings,
        snek: Snek,
        board: Board,
        input: I,
        sink: S,
        rng: StdRng,
    ) -> Self {
        let screen = Screen::new(Palette::new(settings.color), board.width());
        let board = board.with_debug_overlay(settings.debug);

        Game {
            settings,
            snek,
            board,
            screen,
            input,
            sink,
            rng,
            phase: Phase::Intro,
            ticks: 0,
            length_at_death: None,
        }
    }

    /// Runs the session until it terminates.
    pub fn run(&mut self) -> Result<Summary, GameError> {
        info!("session started on a {}x{} board", self.board.width(), self.board.height());

        while self.phase != Phase::Terminated {
            self.step()?;
        }

        let summary = self.summary();
        info!("session over: {:?}", summary);
        Ok(summary)
    }

    /// Advances the state machine by one state's worth of work.
    pub fn step(&mut self) -> Result<Phase, GameError> {
        let next = match self.phase {
            Phase::Intro => self.intro()?,
            Phase::Running => self.tick()?,
            Phase::Dying => self.die()?,
            Phase::Terminated => Phase::Terminated,
        };

        if next != self.phase {
            debug!("{:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
        Ok(next)
    }

    fn intro(&mut self) -> Result<Phase, GameError> {
        self.sink.write_frame(&self.screen.outline())?;

        if self.input.read_key()?.command() == Some(Command::Quit) {
            info!("quit from the intro screen");
            return Ok(Phase::Terminated);
        }

        self.screen.set_status(WELCOME);
        self.render()?;
        Ok(Phase::Running)
    }

    /// One simulation step: input, move, resolve, draw, sleep.
    pub fn tick(&mut self) -> Result<Phase, GameError> {
        while self.input.has_pending_input()? {
            match self.input.read_key()?.command() {
                Some(Command::Turn(direction)) => self.snek.set_direction(direction),
                Some(Command::Quit) => {
                    info!("quit after {} ticks", self.ticks);
                    return Ok(Phase::Terminated);
                }
                None => {}
            }
        }

        self.ticks += 1;

        if self.snek.update() == MoveResult::HitWall {
            info!(
                "snek hit the wall at {} heading {:?}",
                self.snek.head_position(),
                self.snek.direction()
            );
            return Ok(Phase::Dying);
        }

        if self.board.resolve(&mut self.snek, &mut self.rng)? == Resolution::BitSelf {
            info!("snek bit itself at {}", self.snek.head_position());
            return Ok(Phase::Dying);
        }

        let status = self.stats()?;
        self.screen.set_status(status);
        self.render()?;
        thread::sleep(self.settings.step_time);

        Ok(Phase::Running)
    }

    fn die(&mut self) -> Result<Phase, GameError> {
        self.length_at_death = Some(self.snek.len());
        self.screen.set_status(self.screen.palette().death_message());

        // First frame shows the snake as it died, the last one an empty board.
        let mut animation = self.snek.death_animation(self.settings.death_anim_time);
        self.render()?;
        while let Some(pause) = animation.step(&mut self.snek) {
            thread::sleep(pause);
            self.render()?;
        }

        Ok(Phase::Terminated)
    }

    fn stats(&self) -> Result<String, GameError> {
        let head = self.snek.head_position();
        Ok(format!(
            "Snek head: {} Q{} | Apples Nom'd: {} | Snek length: {}",
            head,
            self.board.quadrant_of(head)?,
            self.snek.apples_eaten(),
            self.snek.len()
        ))
    }

    fn render(&mut self) -> Result<(), GameError> {
        self.board.render_into(&self.snek);
        let lines = self.screen.frame(&self.board);
        self.sink.write_frame(&lines)?;
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            apples_eaten: self.snek.apples_eaten(),
            length: self.length_at_death.unwrap_or_else(|| self.snek.len()),
            ticks: self.ticks,
            died: self.length_at_death.is_some(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snek(&self) -> &Snek {
        &self.snek
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
