//! Plain-text ticket builder
//!
//! Tickets are printed through the OS print verb, so the output is plain
//! UTF-8 text laid out in fixed columns rather than printer commands.

use crate::text::{center, pad, text_width, wrap};

/// Plain-text ticket builder
///
/// Common widths:
/// - 58mm paper: 32 characters
/// - 80mm paper: 48 characters
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    buf: String,
    width: usize,
}

impl TicketBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::with_capacity(2048),
            width,
        }
    }

    // === Text Output ===

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    /// Write text wrapped to the paper width
    pub fn wrapped(&mut self, s: &str) -> &mut Self {
        for l in wrap(s, self.width) {
            self.line(&l);
        }
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Write multiple empty lines
    pub fn feed(&mut self, lines: usize) -> &mut Self {
        for _ in 0..lines {
            self.newline();
        }
        self
    }

    /// Print text centered in the line width
    pub fn centered(&mut self, s: &str) -> &mut Self {
        let line = center(s, self.width);
        self.line(&line)
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width);
        self.line(&sep)
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width);
        self.line(&sep)
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width(left);
        let rw = text_width(right);

        if lw + rw >= self.width {
            self.line(left);
            let right = pad(right, self.width, true);
            self.line(&right)
        } else {
            let spaces = self.width - lw - rw;
            let line = format!("{}{}{}", left, " ".repeat(spaces), right);
            self.line(&line)
        }
    }

    /// Print a row of fixed-width columns
    ///
    /// `columns` pairs each cell with its width and alignment
    /// (`true` = right aligned). Cells are truncated to fit.
    pub fn row(&mut self, columns: &[(&str, usize, bool)]) -> &mut Self {
        let line: String = columns
            .iter()
            .map(|(text, width, right)| pad(text, *width, *right))
            .collect();
        let line = line.trim_end().to_string();
        self.line(&line)
    }

    // === Build ===

    /// Finalize and return the accumulated text
    pub fn finalize(self) -> String {
        self.buf
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Default for TicketBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lr_fills_width() {
        let mut b = TicketBuilder::new(20);
        b.line_lr("Total", "45.00");
        assert_eq!(b.as_str(), "Total          45.00\n");
    }

    #[test]
    fn test_line_lr_overflow_splits() {
        let mut b = TicketBuilder::new(10);
        b.line_lr("Subtotal due", "45.00");
        assert_eq!(b.finalize(), "Subtotal due\n     45.00\n");
    }

    #[test]
    fn test_row_truncates_cells() {
        let mut b = TicketBuilder::new(16);
        b.row(&[("Falafel sandwich", 8, false), ("2", 3, true), ("10.00", 5, true)]);
        assert_eq!(b.as_str(), "Falafel   210.00\n");
    }

    #[test]
    fn test_separators_and_center() {
        let mut b = TicketBuilder::new(6);
        b.sep_double().centered("ab").sep_single();
        assert_eq!(b.finalize(), "======\n  ab\n------\n");
    }
}
