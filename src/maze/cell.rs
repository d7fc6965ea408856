use crossterm::style::{Color, StyledContent, Stylize};

use std::fmt;

/// Terrain of a single maze cell.
/// `Wall` is impassable, the others can be walked with increasing cost.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    #[default]
    Wall,
    Grass,
    Mud,
    Water,
}

impl Terrain {
    /// Cost reported for a wall. No search may ever step onto one.
    pub const WALL_COST: u32 = u32::MAX;
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    /// Cost of stepping onto a cell of this terrain.
    pub fn cost(self) -> u32 {
        match self {
            Terrain::Grass => 1,
            Terrain::Mud => 5,
            Terrain::Water => 10,
            Terrain::Wall => Terrain::WALL_COST,
        }
    }

    pub fn is_passable(self) -> bool {
        self != Terrain::Wall
    }

    /// Single character used by the plain text form of a maze.
    pub fn to_char(self) -> char {
        match self {
            Terrain::Wall => '#',
            Terrain::Grass => '.',
            Terrain::Mud => '~',
            Terrain::Water => 'w',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Terrain::Wall),
            '.' => Some(Terrain::Grass),
            '~' => Some(Terrain::Mud),
            'w' => Some(Terrain::Water),
            _ => None,
        }
    }

    /// Background color used by the terminal renderer.
    pub fn color(self) -> Color {
        match self {
            Terrain::Wall => Color::DarkGrey,
            Terrain::Grass => Color::DarkGreen,
            Terrain::Mud => Color::DarkYellow,
            Terrain::Water => Color::DarkBlue,
        }
    }

    /// Two-column styled symbol of the cell.
    pub fn glyph(self) -> StyledContent<&'static str> {
        match self {
            Terrain::Wall => "██".with(Color::Grey),
            Terrain::Grass => "  ".on(self.color()),
            Terrain::Mud => "░░".with(Color::Yellow).on(self.color()),
            Terrain::Water => "≈≈".with(Color::Cyan).on(self.color()),
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = self.glyph();

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Terrain::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}
