use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, Print, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_minimax::{
    board::{Board, Cell, Token},
    COLUMNS,
};

/// `first` is drawn in red and every other token in yellow
fn cell_color(cell: Cell, first: Token) -> Color {
    match cell {
        Cell::Occupied(token) if token == first => Color::Red,
        Cell::Occupied(_) => Color::Yellow,
        Cell::Empty => Color::DarkBlue,
    }
}

/// Writes the column numbers followed by the rows, top row first
fn render<W: Write>(out: &mut W, board: &Board, first: Token) -> Result<()> {
    let header: String = (1..=COLUMNS).map(|column| column.to_string()).collect();
    out.queue(Print(header + "\n"))?;

    for cells in board.rows().iter() {
        for &cell in cells.iter() {
            out.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(cell_color(cell, first)),
            ))?;
        }
        out.queue(Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

pub fn draw(board: &Board, first: Token) -> Result<()> {
    render(&mut stdout(), board, first)
}
