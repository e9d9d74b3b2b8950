use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GameError;
use crate::geometry::Pos;
use crate::snake::Snek;

/// Segments added per apple.
pub const GROWTH_PER_APPLE: usize = 2;

/// Inclusive rectangle, `top_left` to `bottom_right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quadrant {
    pub top_left: Pos,
    pub bottom_right: Pos,
}

impl Quadrant {
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.top_left.x
            && pos.x <= self.bottom_right.x
            && pos.y >= self.top_left.y
            && pos.y <= self.bottom_right.y
    }

    fn random_cell(&self, rng: &mut impl Rng) -> Pos {
        Pos {
            x: rng.gen_range(self.top_left.x..=self.bottom_right.x),
            y: rng.gen_range(self.top_left.y..=self.bottom_right.y),
        }
    }
}

/// What ends up drawn in one grid cell. Symbols are picked by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Apple,
    SnekHead,
    SnekBody,
    Marker(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Alive,
    BitSelf,
}

#[derive(Debug)]
pub struct Board {
    width: u16,
    height: u16,
    quadrants: [Quadrant; 4],
    apples: Vec<Pos>,
    grid: Vec<Vec<Cell>>,
    debug_overlay: bool,
}

impl Board {
    /// Panics on boards narrower or shorter than two cells, which cannot hold four quadrants.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(
            width >= 2 && height >= 2,
            "board must be at least 2x2, got {}x{}",
            width,
            height
        );
        let half_width = width / 2;
        let half_height = height / 2;

        // Halves split at `half`, so every cell lands in exactly one quadrant.
        let quadrants = [
            // 0: top left
            Quadrant {
                top_left: Pos::new(0, 0),
                bottom_right: Pos::new(half_width - 1, half_height - 1),
            },
            // 1: top right
            Quadrant {
                top_left: Pos::new(half_width, 0),
                bottom_right: Pos::new(width - 1, half_height - 1),
            },
            // 2: bottom right
            Quadrant {
                top_left: Pos::new(half_width, half_height),
                bottom_right: Pos::new(width - 1, height - 1),
            },
            // 3: bottom left
            Quadrant {
                top_left: Pos::new(0, half_height),
                bottom_right: Pos::new(half_width - 1, height - 1),
            },
        ];

        let mut board = Board {
            width,
            height,
            quadrants,
            apples: Vec::new(),
            grid: Vec::new(),
            debug_overlay: false,
        };
        board.reset();
        board
    }

    pub fn with_apples(mut self, apples: &[Pos]) -> Self {
        self.apples.extend_from_slice(apples);
        self
    }

    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Blanks the grid. Apples are left alone.
    pub fn reset(&mut self) {
        self.grid = vec![vec![Cell::Empty; self.width as usize]; self.height as usize];
    }

    /// Eats any apple under the head and checks for self-collision.
    pub fn resolve(&mut self, snek: &mut Snek, rng: &mut impl Rng) -> Result<Resolution, GameError> {
        let head = snek.head_position();

        while let Some(index) = self.apples.iter().position(|&apple| apple == head) {
            self.apples.remove(index);
            snek.grow(GROWTH_PER_APPLE);
            debug!("apple eaten at {}, {} eaten so far", head, snek.apples_eaten());

            if self.apples.is_empty() {
                let apple = self.spawn_apple(head, rng)?;
                debug!("spawned apple at {}", apple);
            }
        }

        let overlaps = snek.segments().iter().filter(|&&seg| seg == head).count();
        if overlaps > 1 {
            return Ok(Resolution::BitSelf);
        }

        Ok(Resolution::Alive)
    }

    /// Drops an apple somewhere in one of the three quadrants not holding `exclude`.
    /// Overlap with the snake or other apples is not checked.
    pub fn spawn_apple(&mut self, exclude: Pos, rng: &mut impl Rng) -> Result<Pos, GameError> {
        let excluded = self.quadrant_of(exclude)?;
        let candidates: Vec<usize> = (0..self.quadrants.len()).filter(|&i| i != excluded).collect();
        let chosen = *candidates
            .choose(rng)
            .ok_or(GameError::NoQuadrant(exclude))?;

        let apple = self.quadrants[chosen].random_cell(rng);
        self.apples.push(apple);
        Ok(apple)
    }

    pub fn quadrant_of(&self, pos: Pos) -> Result<usize, GameError> {
        self.quadrants
            .iter()
            .position(|quad| quad.contains(pos))
            .ok_or(GameError::NoQuadrant(pos))
    }

    /// Rebuilds the grid from the apples and the snake.
    pub fn render_into(&mut self, snek: &Snek) {
        self.reset();

        for apple in &self.apples {
            self.grid[apple.y as usize][apple.x as usize] = Cell::Apple;
        }

        let mut segments = snek.segments().iter();
        if let Some(head) = segments.next() {
            self.grid[head.y as usize][head.x as usize] = Cell::SnekHead;
        }
        for seg in segments {
            self.grid[seg.y as usize][seg.x as usize] = Cell::SnekBody;
        }

        if self.debug_overlay {
            for quad in &self.quadrants {
                let (a, b) = (quad.top_left, quad.bottom_right);
                self.grid[a.y as usize][a.x as usize] = Cell::Marker('0');
                self.grid[b.y as usize][b.x as usize] = Cell::Marker('1');
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(Vec::as_slice)
    }

    pub fn apples(&self) -> &[Pos] {
        &self.apples
    }

    pub fn quadrants(&self) -> &[Quadrant; 4] {
        &self.quadrants
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}
