use std::ops::Range;

use log::debug;

use crate::libs::ldpc_error::ldpc_error::LdpcError;

// Element type of the CSC tables. The embedded tables are generated as u16, which covers codes of
// up to 65535 edges.
pub type MatrixIndex = u16;

/// A binary M x N parity-check matrix in Compressed Sparse Column form.
///
/// The row indices of the 1s in column `c` are stored at
/// `row_indices[column_pointers[c] .. column_pointers[c + 1]]`, in no particular order. Each
/// position in `row_indices` identifies one edge of the Tanner graph; the decoder keys its messages
/// by that position.
///
/// The tables are borrowed, so a matrix built over `static` tables is itself free to share between
/// threads for the lifetime of the process. There are no mutating operations.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseParityMatrix<'a> {
    rows: usize,
    columns: usize,
    column_pointers: &'a [MatrixIndex],
    row_indices: &'a [MatrixIndex],
}

fn malformed(reason: String) -> LdpcError {
    LdpcError::MalformedMatrix(reason)
}

impl<'a> SparseParityMatrix<'a> {
    /// Validates the CSC tables and wraps them. `rows` is M (check nodes), `columns` is N
    /// (variable nodes).
    pub fn new(rows: usize, columns: usize, num_nonzero: usize,
               column_pointers: &'a [MatrixIndex], row_indices: &'a [MatrixIndex]) -> Result<Self, LdpcError> {
        if rows == 0 {
            return Err(malformed("a parity-check matrix needs at least one row".to_string()));
        }
        if columns < rows {
            return Err(malformed(format!("{} columns is fewer than the {} rows", columns, rows)));
        }
        let pointer_count = columns.checked_add(1)
            .ok_or_else(|| malformed(format!("{} columns cannot be indexed", columns)))?;
        if column_pointers.len() != pointer_count {
            return Err(malformed(format!("expected {} column pointers, found {}", pointer_count, column_pointers.len())));
        }
        if column_pointers[0] != 0 {
            return Err(malformed(format!("first column pointer is {}, not 0", column_pointers[0])));
        }
        if let Some(column) = (0..columns).find(|&c| column_pointers[c + 1] < column_pointers[c]) {
            return Err(malformed(format!("column pointers decrease at column {}", column)));
        }
        if column_pointers[columns] as usize != num_nonzero {
            return Err(malformed(format!("last column pointer is {}, but there are {} non-zero entries",
                                         column_pointers[columns], num_nonzero)));
        }
        if row_indices.len() != num_nonzero {
            return Err(malformed(format!("expected {} row indices, found {}", num_nonzero, row_indices.len())));
        }

        let mut seen = vec![false; rows];
        for column in 0..columns {
            let range = column_pointers[column] as usize..column_pointers[column + 1] as usize;
            for &row in &row_indices[range.clone()] {
                let row = row as usize;
                if row >= rows {
                    return Err(malformed(format!("row index {} in column {} is not less than {}", row, column, rows)));
                }
                if seen[row] {
                    return Err(malformed(format!("row index {} repeated in column {}", row, column)));
                }
                seen[row] = true;
            }
            for &row in &row_indices[range] {
                seen[row as usize] = false;
            }
        }

        debug!("Parity-check matrix is ({}, {}) with {} non-zero entries", rows, columns, num_nonzero);
        Ok(Self {
            rows,
            columns,
            column_pointers,
            row_indices,
        })
    }

    /// M, the number of parity checks.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// N, the codeword length.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn num_nonzero(&self) -> usize {
        self.row_indices.len()
    }

    pub fn column_pointers(&self) -> &'a [MatrixIndex] {
        self.column_pointers
    }

    pub fn row_indices(&self) -> &'a [MatrixIndex] {
        self.row_indices
    }

    fn check_column(&self, column: usize) -> Result<(), LdpcError> {
        if column >= self.columns {
            return Err(LdpcError::IndexOutOfRange { index: column, limit: self.columns });
        }
        Ok(())
    }

    // Edge identifiers (positions in row_indices) of a column already known to be in range.
    pub(crate) fn column_range(&self, column: usize) -> Range<usize> {
        self.column_pointers[column] as usize..self.column_pointers[column + 1] as usize
    }

    /// The rows holding a 1 in `column`.
    pub fn row_indices_in_column(&self, column: usize) -> Result<&'a [MatrixIndex], LdpcError> {
        self.check_column(column)?;
        Ok(&self.row_indices[self.column_range(column)])
    }

    /// The edge identifiers of `column`: the positions of its entries in `row_indices()`.
    pub fn column_edges(&self, column: usize) -> Result<Range<usize>, LdpcError> {
        self.check_column(column)?;
        Ok(self.column_range(column))
    }

    /// Hamming weight of `column`.
    pub fn column_weight(&self, column: usize) -> Result<usize, LdpcError> {
        self.check_column(column)?;
        Ok(self.column_range(column).len())
    }

    pub fn column_weights(&self) -> Vec<usize> {
        (0..self.columns).map(|column| self.column_range(column).len()).collect()
    }

    pub fn is_one_at(&self, row: usize, column: usize) -> Result<bool, LdpcError> {
        if row >= self.rows {
            return Err(LdpcError::IndexOutOfRange { index: row, limit: self.rows });
        }
        Ok(self.row_indices_in_column(column)?.iter().any(|&r| r as usize == row))
    }
}

#[cfg(test)]
#[path = "./sparse_parity_matrix_spec.rs"]
mod sparse_parity_matrix_spec;
