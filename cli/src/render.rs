use sapper_core::*;
use std::io::{self, Write};

fn cell_char(cell: &Cell, triggered_mine: Option<Coord2>) -> char {
    match cell.view() {
        CellView::Covered => '#',
        CellView::Flagged => 'F',
        CellView::Open(0) => '.',
        CellView::Open(count) => char::from(b'0' + count),
        CellView::Mine if triggered_mine == Some(cell.coords()) => 'X',
        CellView::Mine => '*',
    }
}

pub fn board_lines(grid: &Grid, triggered_mine: Option<Coord2>) -> Vec<String> {
    grid.rows()
        .map(|row| {
            row.iter()
                .map(|cell| cell_char(cell, triggered_mine))
                .collect()
        })
        .collect()
}

pub fn status_line<G: MineGenerator>(engine: &BoardEngine<G>) -> String {
    let phase = match engine.phase() {
        Phase::Playing => "playing",
        Phase::Won => "you win!",
        Phase::Lost => "BOOOM!",
    };
    format!(
        "mines left: {}  time: {}s  {}",
        engine.mines_left(),
        engine.elapsed().as_secs(),
        phase
    )
}

pub fn write_board<G: MineGenerator>(
    out: &mut impl Write,
    engine: &BoardEngine<G>,
) -> io::Result<()> {
    writeln!(out, "{}", status_line(engine))?;
    for line in board_lines(engine.grid(), engine.triggered_mine()) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
