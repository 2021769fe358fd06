//! Block domain model.
//!
//! # Responsibility
//! - Define the block entity and its variant-specific payload.
//! - Provide the wire shape shared by the local and remote stores.
//!
//! # Invariants
//! - `id` is immutable and never reused for another block.
//! - Every variant except `Table` and `Divider` carries a text string.
//! - A table grid is rectangular with at least one row and one column.
//! - `checked` is only carried by the checkbox variant.

use crate::model::id::{new_id, BlockId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Type tag of a block, serialized as the wire `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// Plain paragraph text.
    Text,
    Heading1,
    Heading2,
    Bullet,
    Numbered,
    Checkbox,
    Table,
    Quote,
    Code,
    Callout,
    Divider,
}

impl BlockKind {
    /// All variants in command-palette order.
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Text,
        BlockKind::Heading1,
        BlockKind::Heading2,
        BlockKind::Bullet,
        BlockKind::Numbered,
        BlockKind::Checkbox,
        BlockKind::Table,
        BlockKind::Quote,
        BlockKind::Code,
        BlockKind::Callout,
        BlockKind::Divider,
    ];

    /// Returns the wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Bullet => "bullet",
            Self::Numbered => "numbered",
            Self::Checkbox => "checkbox",
            Self::Table => "table",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::Callout => "callout",
            Self::Divider => "divider",
        }
    }

    /// Parses a wire tag.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// List-like variants continue themselves on Enter.
    pub fn is_list_like(self) -> bool {
        matches!(self, Self::Bullet | Self::Numbered | Self::Checkbox)
    }

    /// Whether blocks of this kind carry editable text.
    pub fn has_text(self) -> bool {
        !matches!(self, Self::Table | Self::Divider)
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the empty-state hint shown for a block kind.
pub fn placeholder_for(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Text => "Type '/' for commands",
        BlockKind::Heading1 => "Heading 1",
        BlockKind::Heading2 => "Heading 2",
        BlockKind::Bullet | BlockKind::Numbered => "List item",
        BlockKind::Checkbox => "To-do",
        BlockKind::Table => "",
        BlockKind::Quote => "Quote",
        BlockKind::Code => "Code",
        BlockKind::Callout => "Callout",
        BlockKind::Divider => "",
    }
}

/// Wire-level validation failures for blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    NilId,
    EmptyTable,
    RaggedTable { row: usize, expected: usize, actual: usize },
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "block id must not be nil"),
            Self::EmptyTable => write!(f, "table must have at least one row and one column"),
            Self::RaggedTable {
                row,
                expected,
                actual,
            } => write!(
                f,
                "table row {row} has {actual} cells, expected {expected}"
            ),
        }
    }
}

impl Error for BlockValidationError {}

/// Rejected table grid mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Removing a row would leave the table empty.
    LastRow,
    /// Removing a column would leave the table empty.
    LastColumn,
    CellOutOfRange { row: usize, column: usize },
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastRow => write!(f, "a table needs at least one row"),
            Self::LastColumn => write!(f, "a table needs at least one column"),
            Self::CellOutOfRange { row, column } => {
                write!(f, "table cell ({row}, {column}) is out of range")
            }
        }
    }
}

impl Error for GridError {}

/// Rectangular grid of cell strings backing a table block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    /// Side length of the grid materialized on first render.
    pub const DEFAULT_SIZE: usize = 3;

    /// Creates an empty grid; dimensions are clamped to at least 1×1.
    pub fn new(row_count: usize, column_count: usize) -> Self {
        let columns = column_count.max(1);
        Self {
            rows: vec![vec![String::new(); columns]; row_count.max(1)],
        }
    }

    /// Builds a grid from raw rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, BlockValidationError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(BlockValidationError::EmptyTable);
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(BlockValidationError::RaggedTable {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Appends an empty row.
    pub fn add_row(&mut self) {
        let columns = self.column_count();
        self.rows.push(vec![String::new(); columns]);
    }

    /// Appends an empty cell to every row.
    pub fn add_column(&mut self) {
        for cells in &mut self.rows {
            cells.push(String::new());
        }
    }

    /// Removes the last row; refuses to go below one row.
    pub fn remove_row(&mut self) -> Result<(), GridError> {
        if self.rows.len() <= 1 {
            return Err(GridError::LastRow);
        }
        self.rows.pop();
        Ok(())
    }

    /// Removes the last column; refuses to go below one column.
    pub fn remove_column(&mut self) -> Result<(), GridError> {
        if self.column_count() <= 1 {
            return Err(GridError::LastColumn);
        }
        for cells in &mut self.rows {
            cells.pop();
        }
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), GridError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
            .ok_or(GridError::CellOutOfRange { row, column })?;
        *cell = value.into();
        Ok(())
    }
}

impl Default for TableGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
    }
}

impl TryFrom<Vec<Vec<String>>> for TableGrid {
    type Error = BlockValidationError;

    fn try_from(value: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::from_rows(value)
    }
}

impl From<TableGrid> for Vec<Vec<String>> {
    fn from(value: TableGrid) -> Self {
        value.rows
    }
}

/// Variant-specific block payload.
///
/// Converting between variants goes through [`BlockBody::converted`], which
/// carries text across text-bearing variants and drops payload that the
/// target variant cannot hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Text(String),
    Heading1(String),
    Heading2(String),
    Bullet(String),
    Numbered(String),
    Checkbox { text: String, checked: bool },
    /// `None` until the grid is materialized on first render.
    Table(Option<TableGrid>),
    Quote(String),
    Code(String),
    Callout(String),
    Divider,
}

impl BlockBody {
    /// Builds a body of `kind` holding `text` when the kind carries text.
    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        let text = text.into();
        match kind {
            BlockKind::Text => Self::Text(text),
            BlockKind::Heading1 => Self::Heading1(text),
            BlockKind::Heading2 => Self::Heading2(text),
            BlockKind::Bullet => Self::Bullet(text),
            BlockKind::Numbered => Self::Numbered(text),
            BlockKind::Checkbox => Self::Checkbox {
                text,
                checked: false,
            },
            BlockKind::Table => Self::Table(None),
            BlockKind::Quote => Self::Quote(text),
            BlockKind::Code => Self::Code(text),
            BlockKind::Callout => Self::Callout(text),
            BlockKind::Divider => Self::Divider,
        }
    }

    pub fn empty(kind: BlockKind) -> Self {
        Self::with_text(kind, String::new())
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Text(_) => BlockKind::Text,
            Self::Heading1(_) => BlockKind::Heading1,
            Self::Heading2(_) => BlockKind::Heading2,
            Self::Bullet(_) => BlockKind::Bullet,
            Self::Numbered(_) => BlockKind::Numbered,
            Self::Checkbox { .. } => BlockKind::Checkbox,
            Self::Table(_) => BlockKind::Table,
            Self::Quote(_) => BlockKind::Quote,
            Self::Code(_) => BlockKind::Code,
            Self::Callout(_) => BlockKind::Callout,
            Self::Divider => BlockKind::Divider,
        }
    }

    /// Returns block text, or `None` for tables and dividers.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text)
            | Self::Heading1(text)
            | Self::Heading2(text)
            | Self::Bullet(text)
            | Self::Numbered(text)
            | Self::Checkbox { text, .. }
            | Self::Quote(text)
            | Self::Code(text)
            | Self::Callout(text) => Some(text),
            Self::Table(_) | Self::Divider => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Text(text)
            | Self::Heading1(text)
            | Self::Heading2(text)
            | Self::Bullet(text)
            | Self::Numbered(text)
            | Self::Checkbox { text, .. }
            | Self::Quote(text)
            | Self::Code(text)
            | Self::Callout(text) => Some(text),
            Self::Table(_) | Self::Divider => None,
        }
    }

    /// Consumes the body and returns its text (empty for tables and dividers).
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text)
            | Self::Heading1(text)
            | Self::Heading2(text)
            | Self::Bullet(text)
            | Self::Numbered(text)
            | Self::Checkbox { text, .. }
            | Self::Quote(text)
            | Self::Code(text)
            | Self::Callout(text) => text,
            Self::Table(_) | Self::Divider => String::new(),
        }
    }

    /// Converts to another variant; a same-kind conversion is the identity.
    pub fn converted(self, kind: BlockKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        Self::with_text(kind, self.into_text())
    }
}

/// One unit of page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockRecord", into = "BlockRecord")]
pub struct Block {
    pub id: BlockId,
    pub body: BlockBody,
}

impl Block {
    /// Creates a block with a fresh id.
    pub fn new(body: BlockBody) -> Self {
        Self { id: new_id(), body }
    }

    pub fn with_text(kind: BlockKind, text: impl Into<String>) -> Self {
        Self::new(BlockBody::with_text(kind, text))
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    pub fn text(&self) -> Option<&str> {
        self.body.text()
    }

    /// Returns a copy of this block's payload under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self::new(self.body.clone())
    }
}

/// Wire record: `{ id, type, content, checked?, tableData? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockRecord {
    id: BlockId,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table_data: Option<TableGrid>,
}

impl TryFrom<BlockRecord> for Block {
    type Error = BlockValidationError;

    fn try_from(record: BlockRecord) -> Result<Self, Self::Error> {
        if record.id.is_nil() {
            return Err(BlockValidationError::NilId);
        }
        let body = match record.kind {
            BlockKind::Checkbox => BlockBody::Checkbox {
                text: record.content,
                checked: record.checked.unwrap_or(false),
            },
            BlockKind::Table => BlockBody::Table(record.table_data),
            other => BlockBody::with_text(other, record.content),
        };
        Ok(Self {
            id: record.id,
            body,
        })
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        let kind = block.kind();
        let (checked, table_data) = match &block.body {
            BlockBody::Checkbox { checked, .. } => (Some(*checked), None),
            BlockBody::Table(grid) => (None, grid.clone()),
            _ => (None, None),
        };
        Self {
            id: block.id,
            kind,
            content: block.body.into_text(),
            checked,
            table_data,
        }
    }
}
