// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aligned text tables for list output.

use std::io::Write;

use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Muted,
}

/// One table column: header, alignment, and tone.
#[derive(Debug, Clone)]
pub struct Column {
    header: &'static str,
    align: Align,
    tone: Tone,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, align: Align::Left, tone: Tone::Plain }
    }

    /// Right-aligned, for counts.
    pub fn right(header: &'static str) -> Self {
        Self { align: Align::Right, ..Self::left(header) }
    }

    /// Left-aligned, rendered in the muted color.
    pub fn muted(header: &'static str) -> Self {
        Self { tone: Tone::Muted, ..Self::left(header) }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Add a row. Missing cells render empty; extra cells are dropped.
    pub fn row(&mut self, cells: Vec<String>) {
        let row = (0..self.columns.len()).map(|i| cells.get(i).cloned().unwrap_or_default());
        self.rows.push(row.collect());
    }

    /// Write the header and rows. Colors are applied after padding so
    /// escape codes never skew the alignment.
    pub fn render(&self, out: &mut (impl Write + ?Sized)) {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let cells = self.rows.iter().filter_map(|r| r.get(i)).map(|c| c.chars().count());
                cells.chain([col.header.len()]).max().unwrap_or(0)
            })
            .collect();

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let _ = writeln!(out, "{}", self.line(&headers, &widths, |_, text| color::header(&text)));
        for row in &self.rows {
            let line = self.line(row, &widths, |col, text| match col.tone {
                Tone::Plain => text,
                Tone::Muted => color::muted(&text),
            });
            let _ = writeln!(out, "{}", line);
        }
    }

    fn line(
        &self,
        cells: &[String],
        widths: &[usize],
        paint: impl Fn(&Column, String) -> String,
    ) -> String {
        let last = self.columns.len().saturating_sub(1);
        let parts: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .zip(cells)
            .enumerate()
            .map(|(i, ((col, width), cell))| {
                // no trailing padding on the last column
                let width = if i == last && col.align == Align::Left { 0 } else { *width };
                paint(col, pad(cell, width, col.align))
            })
            .collect();
        parts.join("  ")
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text),
        Align::Right => format!("{:>width$}", text),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
