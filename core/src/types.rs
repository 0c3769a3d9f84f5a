use core::ops::RangeInclusive;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Number of cells on a `width` by `height` board, a `Coord` squared always fits.
pub const fn area((width, height): Coord2) -> CellCount {
    width as CellCount * height as CellCount
}

/// Whether `a` and `b` are the same cell or touch each other, including diagonally.
pub const fn within_one(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

/// Positions one step either side of `center` along an axis of length `len`.
fn span(center: Coord, len: Coord) -> RangeInclusive<Coord> {
    center.saturating_sub(1)..=center.saturating_add(1).min(len.saturating_sub(1))
}

/// Every position touching `center`, including diagonals, that lies on a board of `size`.
///
/// Yields up to 8 positions row by row. `center` itself must be on the board.
pub fn neighbors_of(center: Coord2, size: Coord2) -> impl Iterator<Item = Coord2> + Clone {
    let xs = span(center.0, size.0);
    span(center.1, size.1)
        .flat_map(move |y| xs.clone().map(move |x| (x, y)))
        .filter(move |&pos| pos != center)
}
