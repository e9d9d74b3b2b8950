use std::collections::VecDeque;
use std::time::Duration;

use log::debug;

use crate::geometry::{Direction, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    HitWall,
}

/// The player: head at the front of `segments`, tail at the back.
#[derive(Debug, Clone)]
pub struct Snek {
    segments: VecDeque<Pos>,
    direction: Direction,
    last_direction: Direction,
    apples_eaten: u32,
    board_width: u16,
    board_height: u16,
}

impl Snek {
    /// Three segments in a horizontal line from the board centre, heading left.
    pub fn new(board_width: u16, board_height: u16) -> Self {
        let mid_x = board_width / 2;
        let mid_y = board_height / 2;
        let segments = (0..3).map(|i| Pos::new(mid_x + i, mid_y)).collect();

        Self::from_segments(segments, Direction::Left, board_width, board_height)
    }

    pub fn from_segments(
        segments: Vec<Pos>,
        direction: Direction,
        board_width: u16,
        board_height: u16,
    ) -> Self {
        Snek {
            segments: segments.into(),
            direction,
            last_direction: direction,
            apples_eaten: 0,
            board_width,
            board_height,
        }
    }

    /// Only the last call before the next tick counts; reversals are checked at tick time.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn validate_direction(&mut self) {
        if self.direction == self.last_direction.opposite() {
            self.direction = self.last_direction;
        }
        self.last_direction = self.direction;
    }

    /// Shifts the body one cell forward. Leaves the snake untouched on a wall hit.
    pub fn move_step(&mut self) -> MoveResult {
        let Some(&head) = self.segments.front() else {
            return MoveResult::HitWall;
        };

        match head.step(self.direction, self.board_width, self.board_height) {
            Some(new_head) => {
                self.segments.pop_back();
                self.segments.push_front(new_head);
                MoveResult::Moved
            }
            None => MoveResult::HitWall,
        }
    }

    /// Stacks `amount` segments on the tail; they unfold over the next moves.
    pub fn grow(&mut self, amount: usize) {
        self.apples_eaten += 1;
        if let Some(&tail) = self.segments.back() {
            self.segments.extend(std::iter::repeat(tail).take(amount));
        }
    }

    pub fn update(&mut self) -> MoveResult {
        self.validate_direction();
        self.move_step()
    }

    /// Plays out once: each step drops the tail, `total` is shared evenly between steps.
    pub fn death_animation(&self, total: Duration) -> DeathAnimation {
        let steps = self.segments.len();
        let pause = if steps == 0 {
            Duration::ZERO
        } else {
            total / steps as u32
        };
        debug!("death animation: {} steps of {:?}", steps, pause);

        DeathAnimation {
            remaining: steps,
            pause,
        }
    }

    pub fn head_position(&self) -> Pos {
        self.segments.front().copied().unwrap_or_default()
    }

    pub fn segments(&self) -> &VecDeque<Pos> {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn apples_eaten(&self) -> u32 {
        self.apples_eaten
    }
}

/// Stateful shrink-out sequence. Consumed by the game loop, which renders
/// between steps and sleeps for the returned pause.
#[derive(Debug)]
pub struct DeathAnimation {
    remaining: usize,
    pause: Duration,
}

impl DeathAnimation {
    /// Removes one tail segment, or returns `None` once the sequence is spent.
    pub fn step(&mut self, snek: &mut Snek) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        snek.segments.pop_back()?;
        Some(self.pause)
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snek_at(segments: &[(u16, u16)], direction: Direction) -> Snek {
        Snek::from_segments(
            segments.iter().copied().map(Pos::from).collect(),
            direction,
            30,
            20,
        )
    }

    fn body(snek: &Snek) -> Vec<(u16, u16)> {
        snek.segments().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_new_snek() {
        let snek = Snek::new(30, 20);

        assert_eq!(body(&snek), vec![(15, 10), (16, 10), (17, 10)]);
        assert_eq!(snek.direction(), Direction::Left);
        assert_eq!(snek.head_position(), Pos::new(15, 10));
        assert_eq!(snek.apples_eaten(), 0);
    }

    #[test]
    fn test_reversal_is_ignored() {
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let mut snek = snek_at(&[(10, 10), (11, 10), (12, 10)], dir);
            snek.set_direction(dir.opposite());
            snek.update();

            assert_eq!(snek.direction(), dir, "reversing {:?} should be ignored", dir);
            assert_eq!(snek.last_direction(), dir);
        }

        // Moving right then asking for left keeps moving right
        let mut snek = snek_at(&[(12, 10), (11, 10), (10, 10)], Direction::Right);
        snek.update();
        snek.set_direction(Direction::Left);
        assert_eq!(snek.update(), MoveResult::Moved);
        assert_eq!(snek.head_position(), Pos::new(14, 10));
    }

    #[test]
    fn test_last_direction_request_wins() {
        let mut snek = snek_at(&[(10, 10), (11, 10), (12, 10)], Direction::Left);
        snek.set_direction(Direction::Up);
        snek.set_direction(Direction::Down);
        snek.update();

        assert_eq!(snek.head_position(), Pos::new(10, 11));
        assert_eq!(snek.last_direction(), Direction::Down);
    }

    #[test]
    fn test_turn_then_reverse_next_tick() {
        let mut snek = snek_at(&[(10, 10), (11, 10), (12, 10)], Direction::Left);
        snek.set_direction(Direction::Up);
        snek.update();
        // Right is only a reversal of the original heading, not of Up
        snek.set_direction(Direction::Right);
        snek.update();

        assert_eq!(snek.head_position(), Pos::new(11, 9));
    }

    #[test]
    fn test_movement() {
        let mut snek = Snek::new(30, 20);
        assert_eq!(snek.update(), MoveResult::Moved);

        assert_eq!(body(&snek), vec![(14, 10), (15, 10), (16, 10)]);
        assert_eq!(snek.len(), 3, "Length remained the same");
    }

    #[test]
    fn test_wall_hit_leaves_body_alone() {
        let mut snek = snek_at(&[(0, 4), (1, 4), (2, 4)], Direction::Left);
        assert_eq!(snek.move_step(), MoveResult::HitWall);
        assert_eq!(body(&snek), vec![(0, 4), (1, 4), (2, 4)]);

        let mut snek = snek_at(&[(29, 19), (28, 19), (27, 19)], Direction::Down);
        assert_eq!(snek.update(), MoveResult::HitWall);
        assert_eq!(snek.len(), 3);
    }

    #[test]
    fn test_grow_unfolds_over_moves() {
        let mut snek = snek_at(&[(10, 10), (11, 10), (12, 10)], Direction::Left);
        snek.grow(2);

        assert_eq!(snek.apples_eaten(), 1);
        assert_eq!(body(&snek), vec![(10, 10), (11, 10), (12, 10), (12, 10), (12, 10)]);
        let distinct: std::collections::HashSet<_> = snek.segments().iter().collect();
        assert_eq!(distinct.len(), 3, "shape does not change right away");

        snek.update();
        snek.update();
        assert_eq!(body(&snek), vec![(8, 10), (9, 10), (10, 10), (11, 10), (12, 10)]);
    }

    #[test]
    fn test_head_of_empty_snek() {
        let snek = snek_at(&[], Direction::Up);
        assert_eq!(snek.head_position(), Pos::new(0, 0));
    }

    #[test]
    fn test_death_animation_removes_tail_each_step() {
        let mut snek = snek_at(&[(10, 10), (11, 10), (12, 10), (13, 10)], Direction::Left);
        let total = Duration::from_millis(1000);
        let mut anim = snek.death_animation(total);

        let mut steps = 0;
        let mut paused = Duration::ZERO;
        let mut tail = body(&snek);
        while let Some(pause) = anim.step(&mut snek) {
            tail.pop();
            assert_eq!(body(&snek), tail);
            steps += 1;
            paused += pause;
        }

        assert_eq!(steps, 4);
        assert!(snek.is_empty());
        assert_eq!(paused, total);
        assert_eq!(anim.step(&mut snek), None, "animation is single use");
    }

    #[test]
    fn test_death_animation_time_is_independent_of_length() {
        let total = Duration::from_millis(1000);
        for len in [1u16, 3, 7, 30] {
            let segments: Vec<_> = (0..len).map(|x| (x, 0)).collect();
            let mut snek = snek_at(&segments, Direction::Left);
            let mut anim = snek.death_animation(total);

            let mut paused = Duration::ZERO;
            while let Some(pause) = anim.step(&mut snek) {
                paused += pause;
            }
            let drift = total.as_micros().abs_diff(paused.as_micros());
            assert!(drift < 1000, "len {}: paused {:?}", len, paused);
        }
    }

    #[test]
    fn test_death_animation_of_empty_snek() {
        let mut snek = snek_at(&[], Direction::Left);
        let mut anim = snek.death_animation(Duration::from_secs(1));
        assert_eq!(anim.remaining(), 0);
        assert_eq!(anim.step(&mut snek), None);
    }
}
