use std::sync::{Arc, LazyLock};

use super::{direction::Direction, tile::TilePosition};

/// Static contents of a maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Tile {
    Path,
    Wall,
    /// Ghost house door. Never walkable: ghosts are placed on the exit tile when released.
    Door,
}

/// Inclusive rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    pub min: TilePosition,
    pub max: TilePosition,
}

impl TileBounds {
    #[must_use]
    pub const fn contains(&self, pos: TilePosition) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MazeParseError {
    #[display("maze layout is empty")]
    Empty,
    #[display("row {row} has {actual} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("unknown tile {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[display("layout has no {_0} marker")]
    MissingLandmark(#[error(not(source))] &'static str),
    #[display("layout has more than one {_0} marker")]
    DuplicateLandmark(#[error(not(source))] &'static str),
    #[display("maze has no walkable tiles")]
    NoWalkableTiles,
}

/// Classic 28x31 layout, one string per row.
///
/// Legend: `#` wall, `-` ghost house door, `.` dot, `o` power dot, space path,
/// `P` agent start, `E` ghost house exit, `F` fruit spot.
pub const CLASSIC_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##    E     ##.######",
    "######.## ###--### ##.######",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##    F     ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......P .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

static CLASSIC: LazyLock<Arc<Maze>> = LazyLock::new(|| {
    Arc::new(Maze::parse(&CLASSIC_LAYOUT.join("\n")).expect("classic layout should be valid"))
});

/// Static wall grid and landmarks of a maze.
///
/// The maze is immutable and shared between episodes. Positions are resolved with
/// two rules:
///
/// - A row whose two edge tiles are both walkable is a *tunnel row*; x wraps modulo
///   the maze width on it.
/// - Elsewhere, a position is inside the maze only if it lies within the walkable
///   bound box (the bounding rectangle of walkable tiles off tunnel rows).
///
/// Everything else is out of bounds; [`Maze::resolve`] returns `None` for it, so
/// no lookup ever indexes outside the grid.
#[derive(Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    tunnel_rows: Vec<i32>,
    bounds: TileBounds,
    dots: Vec<TilePosition>,
    power_dots: Vec<TilePosition>,
    agent_start: TilePosition,
    ghost_exit: TilePosition,
    fruit_spot: TilePosition,
}

impl Maze {
    /// Returns the shared classic maze.
    #[must_use]
    pub fn classic() -> Arc<Self> {
        Arc::clone(&CLASSIC)
    }

    /// Parses a maze from a text layout (see [`CLASSIC_LAYOUT`] for the legend).
    pub fn parse(layout: &str) -> Result<Self, MazeParseError> {
        let rows = layout.lines().collect::<Vec<_>>();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if rows.is_empty() || width == 0 {
            return Err(MazeParseError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut dots = vec![];
        let mut power_dots = vec![];
        let mut agent_start = None;
        let mut ghost_exit = None;
        let mut fruit_spot = None;

        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(MazeParseError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = TilePosition::new(coord(x), coord(y));
                let tile = match ch {
                    '#' => Tile::Wall,
                    '-' => Tile::Door,
                    ' ' => Tile::Path,
                    '.' => {
                        dots.push(pos);
                        Tile::Path
                    }
                    'o' => {
                        power_dots.push(pos);
                        Tile::Path
                    }
                    'P' => {
                        set_landmark(&mut agent_start, pos, "agent start")?;
                        Tile::Path
                    }
                    'E' => {
                        set_landmark(&mut ghost_exit, pos, "ghost exit")?;
                        Tile::Path
                    }
                    'F' => {
                        set_landmark(&mut fruit_spot, pos, "fruit spot")?;
                        Tile::Path
                    }
                    _ => return Err(MazeParseError::UnknownTile { ch, x, y }),
                };
                tiles.push(tile);
            }
        }

        let height = rows.len();
        let tunnel_rows = (0..height)
            .filter(|&y| tiles[y * width].is_path() && tiles[y * width + width - 1].is_path())
            .map(coord)
            .collect::<Vec<_>>();

        let mut min = None::<TilePosition>;
        let mut max = None::<TilePosition>;
        for (i, tile) in tiles.iter().enumerate() {
            let pos = TilePosition::new(coord(i % width), coord(i / width));
            if !tile.is_path() || tunnel_rows.contains(&pos.y) {
                continue;
            }
            min = Some(min.map_or(pos, |m| TilePosition::new(m.x.min(pos.x), m.y.min(pos.y))));
            max = Some(max.map_or(pos, |m| TilePosition::new(m.x.max(pos.x), m.y.max(pos.y))));
        }
        let (Some(min), Some(max)) = (min, max) else {
            return Err(MazeParseError::NoWalkableTiles);
        };

        Ok(Self {
            width,
            height,
            tiles,
            tunnel_rows,
            bounds: TileBounds { min, max },
            dots,
            power_dots,
            agent_start: agent_start.ok_or(MazeParseError::MissingLandmark("agent start"))?,
            ghost_exit: ghost_exit.ok_or(MazeParseError::MissingLandmark("ghost exit"))?,
            fruit_spot: fruit_spot.ok_or(MazeParseError::MissingLandmark("fruit spot"))?,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Walkable bound box (excluding tunnel rows).
    #[must_use]
    pub fn bounds(&self) -> TileBounds {
        self.bounds
    }

    #[must_use]
    pub fn is_tunnel_row(&self, y: i32) -> bool {
        self.tunnel_rows.contains(&y)
    }

    /// Initial dot positions, in layout order.
    #[must_use]
    pub fn dots(&self) -> &[TilePosition] {
        &self.dots
    }

    /// Initial power-dot positions, in layout order.
    #[must_use]
    pub fn power_dots(&self) -> &[TilePosition] {
        &self.power_dots
    }

    #[must_use]
    pub fn agent_start(&self) -> TilePosition {
        self.agent_start
    }

    #[must_use]
    pub fn ghost_exit(&self) -> TilePosition {
        self.ghost_exit
    }

    #[must_use]
    pub fn fruit_spot(&self) -> TilePosition {
        self.fruit_spot
    }

    /// Maps a position into the maze.
    ///
    /// On tunnel rows x wraps modulo the maze width. Elsewhere the position must lie
    /// inside the walkable bound box, otherwise `None` is returned.
    #[must_use]
    pub fn resolve(&self, pos: TilePosition) -> Option<TilePosition> {
        if self.is_tunnel_row(pos.y) {
            return Some(TilePosition::new(pos.x.rem_euclid(coord(self.width)), pos.y));
        }
        self.bounds.contains(pos).then_some(pos)
    }

    /// Returns the tile at a resolved position, or `None` when out of bounds.
    #[must_use]
    pub fn tile(&self, pos: TilePosition) -> Option<Tile> {
        let pos = self.resolve(pos)?;
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then(|| self.tiles[y * self.width + x])
    }

    #[must_use]
    pub fn is_walkable(&self, pos: TilePosition) -> bool {
        self.tile(pos).is_some_and(|tile| tile.is_path())
    }

    /// Returns the resolved neighbor of `pos` in `dir` if it is walkable.
    #[must_use]
    pub fn neighbor(&self, pos: TilePosition, dir: Direction) -> Option<TilePosition> {
        let next = self.resolve(pos.step(dir, 1))?;
        self.is_walkable(next).then_some(next)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn coord(value: usize) -> i32 {
    value as i32
}

fn set_landmark(
    slot: &mut Option<TilePosition>,
    pos: TilePosition,
    name: &'static str,
) -> Result<(), MazeParseError> {
    if slot.replace(pos).is_some() {
        return Err(MazeParseError::DuplicateLandmark(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_counts() {
        let maze = Maze::classic();
        assert_eq!(maze.width(), 28);
        assert_eq!(maze.height(), 31);
        assert_eq!(maze.dots().len(), 240);
        assert_eq!(maze.power_dots().len(), 4);
        assert_eq!(maze.agent_start(), TilePosition::new(13, 23));
        assert_eq!(maze.ghost_exit(), TilePosition::new(13, 11));
        assert_eq!(maze.fruit_spot(), TilePosition::new(13, 17));
    }

    #[test]
    fn test_classic_bounds_and_tunnel() {
        let maze = Maze::classic();
        assert_eq!(
            maze.bounds(),
            TileBounds {
                min: TilePosition::new(1, 1),
                max: TilePosition::new(26, 29),
            }
        );
        assert!(maze.is_tunnel_row(14));
        assert!(!maze.is_tunnel_row(13));
    }

    #[test]
    fn test_tunnel_wraps() {
        let maze = Maze::classic();
        assert_eq!(
            maze.resolve(TilePosition::new(-1, 14)),
            Some(TilePosition::new(27, 14))
        );
        assert_eq!(
            maze.resolve(TilePosition::new(28, 14)),
            Some(TilePosition::new(0, 14))
        );
        assert_eq!(
            maze.neighbor(TilePosition::new(0, 14), Direction::Left),
            Some(TilePosition::new(27, 14))
        );
    }

    #[test]
    fn test_out_of_bounds_resolves_to_none() {
        let maze = Maze::classic();
        assert_eq!(maze.resolve(TilePosition::new(0, 13)), None);
        assert_eq!(maze.resolve(TilePosition::new(10, -4)), None);
        assert_eq!(maze.resolve(TilePosition::new(40, 40)), None);
        assert_eq!(maze.tile(TilePosition::new(-100, 5)), None);
        assert!(!maze.is_walkable(TilePosition::new(-100, 5)));
    }

    #[test]
    fn test_door_is_not_walkable() {
        let maze = Maze::classic();
        assert_eq!(maze.tile(TilePosition::new(13, 12)), Some(Tile::Door));
        assert!(!maze.is_walkable(TilePosition::new(13, 12)));
        assert_eq!(maze.neighbor(maze.ghost_exit(), Direction::Down), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Maze::parse(""), Err(MazeParseError::Empty)));
        assert!(matches!(
            Maze::parse("###\n#P\n###"),
            Err(MazeParseError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            Maze::parse("#####\n#P?E#\n#####"),
            Err(MazeParseError::UnknownTile { ch: '?', .. })
        ));
        assert!(matches!(
            Maze::parse("#####\n#PEF#\n#####"),
            Ok(_)
        ));
        assert!(matches!(
            Maze::parse("#####\n#P E#\n#####"),
            Err(MazeParseError::MissingLandmark("fruit spot"))
        ));
        assert!(matches!(
            Maze::parse("######\n#PPEF#\n######"),
            Err(MazeParseError::DuplicateLandmark("agent start"))
        ));
    }
}
