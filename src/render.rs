use std::io;

use ratatui::backend::Backend;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use crate::board::{Board, Cell};

/// Width the prompt and status lines are centred in.
pub const STATUS_WIDTH: usize = 58;

pub const BANNER: &str = r"   _____ _    _ _____  ______ _____   _____ _   _ ______ _  __
  / ____| |  | |  __ \|  ____|  __ \ / ____| \ | |  ____| |/ /
 | (___ | |  | | |__) | |__  | |__) | (___ |  \| | |__  | ' /
  \___ \| |  | |  ___/|  __| |  _  / \___ \| . ` |  __| |  <
  ____) | |__| | |    | |____| | \ \ ____) | |\  | |____| . \
 |_____/ \____/|_|    |______|_|  \_\_____/|_| \_|______|_|\_\
";

pub const PROMPT: &str = "Press Any Key to Begin!";
pub const WELCOME: &str = "Eat the apples, snek!";

/// Symbols and colours, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Palette { color }
    }

    fn styled(&self, text: &'static str, color: Color) -> Span<'static> {
        if self.color {
            Span::styled(text, Style::default().fg(color))
        } else {
            Span::raw(text)
        }
    }

    pub fn cell(&self, cell: Cell) -> Span<'static> {
        match cell {
            Cell::Empty => Span::raw(" "),
            Cell::Apple => self.styled("@", Color::LightRed),
            Cell::SnekHead => self.styled("O", Color::LightYellow),
            Cell::SnekBody => self.styled("o", Color::LightGreen),
            Cell::Marker(c) => Span::raw(c.to_string()),
        }
    }

    pub fn death_message(&self) -> Line<'static> {
        Line::from(vec![
            Span::raw("Oh no! Snek is "),
            self.styled("dead", Color::LightRed),
            Span::raw(" (x_x)"),
        ])
    }
}

/// Pads `line` on both sides to `width` columns, extra space going right.
pub fn center(line: Line<'static>, width: usize) -> Line<'static> {
    let len = line.width();
    if len >= width {
        return line;
    }
    let left = (width - len) / 2;
    let right = width - len - left;

    let mut spans = Vec::with_capacity(line.spans.len() + 2);
    spans.push(Span::raw(" ".repeat(left)));
    spans.extend(line.spans);
    spans.push(Span::raw(" ".repeat(right)));
    Line::from(spans)
}

/// The ordered line buffer: banner, top border, grid rows, bottom border, status.
#[derive(Debug)]
pub struct Screen {
    palette: Palette,
    banner: Vec<Line<'static>>,
    border_top: Line<'static>,
    border_bottom: Line<'static>,
    status: Line<'static>,
}

impl Screen {
    pub fn new(palette: Palette, board_width: u16) -> Self {
        let inner = (board_width as usize * 2).saturating_sub(1);

        Screen {
            palette,
            banner: BANNER.lines().map(|l| Line::raw(l.to_string())).collect(),
            border_top: Line::raw(format!(" {}", "_".repeat(inner))),
            border_bottom: Line::raw(format!(" {}", "¯".repeat(inner))),
            status: center(Line::raw(PROMPT), STATUS_WIDTH),
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_status(&mut self, status: impl Into<Line<'static>>) {
        self.status = center(status.into(), STATUS_WIDTH);
    }

    /// Intro layout: the board outline with no rows.
    pub fn outline(&self) -> Vec<Line<'static>> {
        self.compose(Vec::new())
    }

    pub fn frame(&self, board: &Board) -> Vec<Line<'static>> {
        let rows = board.rows().map(|row| self.row_line(row)).collect();
        self.compose(rows)
    }

    fn row_line(&self, row: &[Cell]) -> Line<'static> {
        let mut spans = Vec::with_capacity(row.len() * 2 + 1);
        spans.push(Span::raw("|"));
        for (i, &cell) in row.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(self.palette.cell(cell));
        }
        spans.push(Span::raw("|"));
        Line::from(spans)
    }

    fn compose(&self, rows: Vec<Line<'static>>) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.banner.len() + rows.len() + 3);
        lines.extend(self.banner.iter().cloned());
        lines.push(self.border_top.clone());
        lines.extend(rows);
        lines.push(self.border_bottom.clone());
        lines.push(self.status.clone());
        lines
    }
}

/// Where finished frames go.
pub trait FrameSink {
    /// Replaces whatever was shown before.
    fn write_frame(&mut self, lines: &[Line<'static>]) -> io::Result<()>;
}

/// Draws each frame over the whole terminal area through ratatui.
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalSink<B> {
    pub fn new(mut terminal: Terminal<B>) -> io::Result<Self> {
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(TerminalSink { terminal })
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> FrameSink for TerminalSink<B> {
    fn write_frame(&mut self, lines: &[Line<'static>]) -> io::Result<()> {
        let text = Text::from(lines.to_vec());
        self.terminal
            .draw(|frame| frame.render_widget(Paragraph::new(text), frame.area()))?;
        Ok(())
    }
}

/// Keeps every frame as plain text.
#[derive(Debug, Default)]
pub struct MemorySink {
    frames: Vec<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[String]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, lines: &[Line<'static>]) -> io::Result<()> {
        self.frames.push(lines.iter().map(plain_text).collect());
        Ok(())
    }
}

pub fn plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Direction, Pos};
    use crate::snake::Snek;
    use ratatui::backend::TestBackend;

    fn small_board() -> Board {
        let mut board = Board::new(4, 2).with_apples(&[Pos::new(3, 0)]);
        let snek = Snek::from_segments(vec![Pos::new(1, 1), Pos::new(2, 1)], Direction::Left, 4, 2);
        board.render_into(&snek);
        board
    }

    #[test]
    fn test_center() {
        let line = center(Line::raw("abc"), 8);
        assert_eq!(plain_text(&line), "  abc   ");

        let long = center(Line::raw("abcdefgh"), 4);
        assert_eq!(plain_text(&long), "abcdefgh");
    }

    #[test]
    fn test_frame_layout() {
        let board = small_board();
        let mut screen = Screen::new(Palette::new(false), 4);
        screen.set_status("hi");
        let lines: Vec<String> = screen.frame(&board).iter().map(plain_text).collect();

        let banner_len = BANNER.lines().count();
        assert_eq!(lines.len(), banner_len + 5);
        assert_eq!(lines[banner_len], " _______");
        assert_eq!(lines[banner_len + 1], "|      @|");
        assert_eq!(lines[banner_len + 2], "|  O o  |");
        assert_eq!(lines[banner_len + 3], " ¯¯¯¯¯¯¯");
        assert_eq!(lines[banner_len + 4].trim(), "hi");
        assert_eq!(lines[banner_len + 4].chars().count(), STATUS_WIDTH);
    }

    #[test]
    fn test_outline_starts_with_prompt() {
        let screen = Screen::new(Palette::new(true), 30);
        let lines: Vec<String> = screen.outline().iter().map(plain_text).collect();

        assert_eq!(lines.len(), BANNER.lines().count() + 3);
        assert_eq!(lines.last().unwrap().trim(), PROMPT);
        assert_eq!(lines[lines.len() - 3].chars().count(), 60);
    }

    #[test]
    fn test_palette_colors() {
        let plain = Palette::new(false);
        assert_eq!(plain.cell(Cell::Apple).style, Style::default());

        let colored = Palette::new(true);
        assert_eq!(colored.cell(Cell::Apple).style.fg, Some(Color::LightRed));
        assert_eq!(colored.cell(Cell::SnekHead).content, "O");
        assert_eq!(colored.cell(Cell::SnekBody).style.fg, Some(Color::LightGreen));

        for palette in [plain, colored] {
            assert_eq!(plain_text(&palette.death_message()), "Oh no! Snek is dead (x_x)");
        }
    }

    #[test]
    fn test_terminal_sink_draws_frame() {
        let board = small_board();
        let screen = Screen::new(Palette::new(true), 4);
        let terminal = Terminal::new(TestBackend::new(70, 14)).unwrap();
        let mut sink = TerminalSink::new(terminal).unwrap();

        sink.write_frame(&screen.frame(&board)).unwrap();

        let buffer = sink.terminal().backend().buffer();
        let row = BANNER.lines().count() as u16 + 2;
        assert_eq!(buffer[(3, row)].symbol(), "O");
        assert_eq!(buffer[(3, row)].fg, Color::LightYellow);
        assert_eq!(buffer[(0, row)].symbol(), "|");
    }
}
