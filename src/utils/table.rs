//! Fixed-width text tables for terminal summaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    header: String,
    width: usize,
    align: Align,
}

impl Column {
    pub fn left(header: &str, width: usize) -> Self {
        Self::with_align(header, width, Align::Left)
    }

    /// Counts read better right-aligned.
    pub fn right(header: &str, width: usize) -> Self {
        Self::with_align(header, width, Align::Right)
    }

    fn with_align(header: &str, width: usize, align: Align) -> Self {
        Self {
            header: header.to_string(),
            width: width.max(header.len()),
            align,
        }
    }

    fn cell(&self, text: &str) -> String {
        match self.align {
            Align::Left => format!("{:<w$}", text, w = self.width),
            Align::Right => format!("{:>w$}", text, w = self.width),
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Header, a rule, then one line per row. Missing cells render empty.
    pub fn render(&self) -> String {
        let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string() + "\n";

        let header = line(self.columns.iter().map(|c| c.cell(&c.header)).collect());
        let rule = line(self.columns.iter().map(|c| "-".repeat(c.width)).collect());

        let body = self.rows.iter().map(|row| {
            line(
                self.columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c.cell(row.get(i).map(String::as_str).unwrap_or("")))
                    .collect(),
            )
        });

        std::iter::once(header).chain(std::iter::once(rule)).chain(body).collect()
    }
}
