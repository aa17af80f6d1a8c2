use crate::cli::io;

/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: &'static str,
    pub width: usize,
}

impl TableColumn {
    pub const fn new(header: &'static str, width: usize) -> Self {
        Self { header, width }
    }
}

/// Padded-column table for read-only listings.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows
            .push(cells.into_iter().map(|value| value.into()).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let header: Vec<String> = self.columns.iter().map(|col| col.header.to_string()).collect();
        lines.push(self.format_line(&header));
        let total: usize = self.columns.iter().map(|col| col.width + 1).sum();
        lines.push("-".repeat(total.saturating_sub(1)));
        for row in &self.rows {
            lines.push(self.format_line(row));
        }
        lines
    }

    pub fn print(&self) {
        for line in self.render() {
            io::print_info(line);
        }
    }

    fn format_line(&self, cells: &[String]) -> String {
        let mut line = String::new();
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                line.push(' ');
            }
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            line.push_str(&format!("{:width$}", fit(cell, column.width), width = column.width));
        }
        line.trim_end().to_string()
    }
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_and_truncated() {
        let mut table = Table::new(vec![TableColumn::new("ID", 3), TableColumn::new("Nome", 6)]);
        table.add_row(vec!["1", "Cleyton Muianga"]);
        table.add_row(vec!["22", "Ana"]);
        let lines = table.render();
        assert_eq!(lines[0], "ID  Nome");
        assert_eq!(lines[1], "-".repeat(10));
        assert_eq!(lines[2], "1   Cleyt~");
        assert_eq!(lines[3], "22  Ana");
    }
}
