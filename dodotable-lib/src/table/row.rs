//! Materialized rows and cells

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::model::Value;

/// Turns a cell value into its display text.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// The default formatter: the value's display form, null as empty text.
pub fn display_formatter() -> Formatter {
    Arc::new(|value: &Value| value.to_string())
}

/// One cell of a materialized row.
#[derive(Clone)]
pub struct Cell {
    col: usize,
    row: usize,
    data: Value,
    url: Option<String>,
    classes: Vec<String>,
    formatter: Formatter,
}

impl Cell {
    /// Creates a cell formatted with `formatter`.
    pub fn new(col: usize, row: usize, data: Value, formatter: Formatter) -> Self {
        Self {
            col,
            row,
            data,
            url: None,
            classes: Vec::new(),
            formatter,
        }
    }

    /// Sets the link target (builder pattern).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the classes (builder pattern).
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    /// Returns the column position among visible columns.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the row position within the selected page.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the extracted value.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the link target, for cells of linked columns.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the classes copied from the column.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns the value formatted by the column's formatter.
    pub fn display(&self) -> String {
        (self.formatter)(&self.data)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.col == other.col
            && self.row == other.row
            && self.data == other.data
            && self.url == other.url
            && self.classes == other.classes
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("col", &self.col)
            .field("row", &self.row)
            .field("data", &self.data)
            .field("url", &self.url)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

/// A materialized table row: one cell per visible column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from its cells.
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Appends a cell.
    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Returns the cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates over the cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Index<usize> for Row {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}

impl<'r> IntoIterator for &'r Row {
    type Item = &'r Cell;
    type IntoIter = std::slice::Iter<'r, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
