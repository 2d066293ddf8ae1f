//! Move order serialization.

use std::io::{self, Write};

use crate::world::MoveOrder;

/// Formats one order as `o <row> <col> <dir>`.
pub fn format_order(order: &MoveOrder) -> String {
    format!(
        "o {} {} {}",
        order.location.row,
        order.location.col,
        order.direction.protocol_char()
    )
}

/// Writes every order followed by the `go` terminator, then flushes.
pub fn write_orders<W: Write>(out: &mut W, orders: &[MoveOrder]) -> io::Result<()> {
    for order in orders {
        writeln!(out, "{}", format_order(order))?;
    }
    write_go(out)
}

/// Writes the bare `go` line that ends a response, then flushes.
pub fn write_go<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "go")?;
    out.flush()
}
