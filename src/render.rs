// draws one frame of the game as text: the board on the left, the dice
// control and status on the right, the portal legend and messages below
use colored::{Color, Colorize};

use crate::board::{grid_to_tile, portal_at, portals, GridPos, PortalKind, Tile, BOARD_SIZE};
use crate::engine::Phase;

const CELL_WIDTH: u16 = 6;
const CELL_HEIGHT: u16 = 2;
const BOARD_TOP: u16 = 2; // the title takes the first row
const BOARD_WIDTH: u16 = CELL_WIDTH * BOARD_SIZE as u16;
const PANEL_GAP: u16 = 4;
const PANEL_LEFT: u16 = BOARD_WIDTH + PANEL_GAP + 1;
const DICE_TOP: u16 = BOARD_TOP + 6;
const DICE_WIDTH: u16 = 8;
const DICE_HEIGHT: u16 = 5;

const LIGHT: Color = Color::White;
const LIGHT_BLUE: Color = Color::TrueColor { r: 173, g: 216, b: 230 };
const ORANGE: Color = Color::TrueColor { r: 255, g: 165, b: 0 };

/// An area of the terminal in 1-based cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.col + self.width && row >= self.row && row < self.row + self.height
    }
}

/// Where the roll control sits on screen.
pub fn dice_button() -> Rect {
    Rect {
        col: PANEL_LEFT,
        row: DICE_TOP,
        width: DICE_WIDTH,
        height: DICE_HEIGHT,
    }
}

/// What a frame shows.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// tile the token is drawn on
    pub token: Tile,
    pub phase: Phase,
    pub die: Option<u8>,
    pub messages: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Renderer { color }
    }

    pub fn render(&self, frame: &Frame) -> String {
        let mut lines: Vec<String> = vec![self.bold("Snake and Ladder")];
        lines.extend(self.board_lines(frame.token));

        // the side panel, keyed by terminal row
        let panel = self.panel_lines(frame);
        for (row, text) in panel {
            let index = (row - 1) as usize;
            if index < lines.len() {
                lines[index].push_str(&" ".repeat(PANEL_GAP as usize));
                lines[index].push_str(&text);
            }
        }

        lines.push(String::new());
        lines.extend(self.legend_lines());
        lines.push(String::new());
        lines.extend(frame.messages.iter().map(|m| m.to_string()));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn board_lines(&self, token: Tile) -> Vec<String> {
        let mut lines = Vec::with_capacity((BOARD_SIZE as u16 * CELL_HEIGHT) as usize);
        for screen_row in 0..BOARD_SIZE {
            let row = BOARD_SIZE - 1 - screen_row;
            let mut numbers = String::new();
            let mut marks = String::new();
            for col in 0..BOARD_SIZE {
                let pos = GridPos::new(row, col);
                let Some(tile) = grid_to_tile(pos) else {
                    continue;
                };
                let background = if (pos.screen_row() + col) % 2 == 0 { LIGHT } else { LIGHT_BLUE };
                numbers.push_str(&self.paint(&format!(" {:<5}", tile), Color::Black, background));
                marks.push_str(&self.cell_marks(tile, tile == token, background));
            }
            lines.push(numbers);
            lines.push(marks);
        }
        lines
    }

    // second line of a tile: " ● ▲14", token then portal start
    fn cell_marks(&self, tile: Tile, has_token: bool, background: Color) -> String {
        let mut out = self.paint(" ", Color::Black, background);
        if has_token {
            out.push_str(&self.paint_bold("●", Color::Blue, background));
        } else {
            out.push_str(&self.paint(" ", Color::Black, background));
        }
        out.push_str(&self.paint(" ", Color::Black, background));
        let marker = match portal_at(tile) {
            Some(portal) => {
                let (arrow, color) = match portal.kind() {
                    PortalKind::Ladder => ('▲', Color::Green),
                    PortalKind::Snake => ('▼', Color::Red),
                };
                self.paint_bold(&format!("{:<3}", format!("{}{}", arrow, portal.to)), color, background)
            }
            None => self.paint("   ", Color::Black, background),
        };
        out.push_str(&marker);
        out
    }

    fn panel_lines(&self, frame: &Frame) -> Vec<(u16, String)> {
        let button = dice_button();
        let label = match frame.die {
            Some(die) => die.to_string(),
            None => "Roll".to_string(),
        };
        let inner = (DICE_WIDTH - 2) as usize;
        let border = "─".repeat(inner);
        let blank = " ".repeat(inner);
        let dice = [
            format!("╭{}╮", border),
            format!("│{}│", blank),
            format!("│{:^width$}│", label, width = inner),
            format!("│{}│", blank),
            format!("╰{}╯", border),
        ];

        let mut panel: Vec<(u16, String)> = dice
            .iter()
            .enumerate()
            .map(|(i, line)| (button.row + i as u16, self.fg_bold(line, ORANGE)))
            .collect();

        let status_row = button.row + button.height + 1;
        let status = match frame.phase {
            Phase::Idle => "Click to Roll".to_string(),
            Phase::Rolling => "Rolling...".to_string(),
            Phase::Finished => format!("You Win! Final Score: {}", frame.token),
        };
        let status = if frame.phase == Phase::Finished {
            self.fg_bold(&status, Color::Yellow)
        } else {
            status
        };
        panel.push((status_row, status));
        panel.push((status_row + 1, format!("Tile: {}", frame.token)));
        panel.push((status_row + 3, "r / click: roll   q: quit".to_string()));
        panel
    }

    fn legend_lines(&self) -> Vec<String> {
        let list = |kind: PortalKind| {
            portals()
                .filter(|portal| portal.kind() == kind)
                .map(|portal| format!("{}→{}", portal.from, portal.to))
                .collect::<Vec<_>>()
                .join(" ")
        };
        vec![
            format!("{} {}", self.fg_bold("Ladders:", Color::Green), list(PortalKind::Ladder)),
            format!("{}  {}", self.fg_bold("Snakes:", Color::Red), list(PortalKind::Snake)),
        ]
    }

    fn paint(&self, text: &str, fg: Color, bg: Color) -> String {
        if !self.color {
            return text.to_string();
        }
        text.color(fg).on_color(bg).to_string()
    }

    fn paint_bold(&self, text: &str, fg: Color, bg: Color) -> String {
        if !self.color {
            return text.to_string();
        }
        text.color(fg).on_color(bg).bold().to_string()
    }

    fn fg_bold(&self, text: &str, fg: Color) -> String {
        if !self.color {
            return text.to_string();
        }
        text.color(fg).bold().to_string()
    }

    fn bold(&self, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        text.bold().to_string()
    }
}
