//! Statement columns and the per-page column map

use std::fmt;

/// A semantic column of a bank statement table.
///
/// The set is closed. `Column::ALL` lists the columns in output order, which
/// is also the priority order used when a header token could match several
/// categories and when a token sits exactly between two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    /// Transaction date
    Date,
    /// Narration / particulars
    Description,
    /// Money out
    Debit,
    /// Money in
    Credit,
    /// Running balance
    Balance,
}

impl Column {
    /// All columns in output order
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Description,
        Column::Debit,
        Column::Credit,
        Column::Balance,
    ];

    /// Get the column name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Description => "description",
            Column::Debit => "debit",
            Column::Credit => "credit",
            Column::Balance => "balance",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Horizontal center of each detected column on one page.
///
/// Derived once from the header row and never changed for the rest of the
/// page. Columns the header did not mention are simply absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnMap {
    centers: [Option<f64>; 5],
}

impl ColumnMap {
    /// Create an empty column map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the center of a column, replacing any earlier value
    pub fn set(&mut self, column: Column, center_x: f64) {
        self.centers[column.index()] = Some(center_x);
    }

    /// Center of a column, if the header declared it
    pub fn get(&self, column: Column) -> Option<f64> {
        self.centers[column.index()]
    }

    /// Whether no column has been declared
    pub fn is_empty(&self) -> bool {
        self.centers.iter().all(Option::is_none)
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.centers.iter().filter(|c| c.is_some()).count()
    }

    /// Declared columns and their centers, in `Column::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = (Column, f64)> + '_ {
        Column::ALL
            .iter()
            .filter_map(move |&col| self.get(col).map(|cx| (col, cx)))
    }

    /// Column whose center is closest to `center_x`.
    ///
    /// Ties go to the column that comes first in `Column::ALL`. Returns
    /// `None` for an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledgerline_domain::{Column, ColumnMap};
    ///
    /// let mut map = ColumnMap::new();
    /// map.set(Column::Debit, 100.0);
    /// map.set(Column::Credit, 200.0);
    /// assert_eq!(map.nearest(140.0), Some(Column::Debit));
    /// assert_eq!(map.nearest(150.0), Some(Column::Debit));
    /// assert_eq!(map.nearest(151.0), Some(Column::Credit));
    /// ```
    pub fn nearest(&self, center_x: f64) -> Option<Column> {
        let mut best: Option<(Column, f64)> = None;
        for (col, cx) in self.iter() {
            let distance = (cx - center_x).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((col, distance)),
            }
        }
        best.map(|(col, _)| col)
    }
}
