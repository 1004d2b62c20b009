use std::ops::Range;

use bitvec::prelude::{BitSlice, BitVec, Msb0};
use log::debug;

use crate::libs::ldpc_error::ldpc_error::LdpcError;
use crate::libs::sparse_binary_matrix::sparse_parity_matrix::SparseParityMatrix;

// A candidate word, one bit per variable node.
pub type Codeword = BitVec<Msb0, u8>;
// One bit per check node: 1 where that check's parity is odd.
pub type Syndrome = BitVec<Msb0, u8>;

/// The bipartite graph between variable nodes (columns) and check nodes (rows) of a parity-check
/// matrix.
///
/// The CSC form already groups edges by column. This adds the row-grouped inversion, built once:
/// for every row, the columns with a 1 in that row (ascending), and alongside each, the edge
/// identifier (position in the matrix' row_indices table) of that 1. Both tables are flat arrays;
/// there are no node objects.
#[derive(Debug, Clone)]
pub struct TannerGraph<'a> {
    matrix: &'a SparseParityMatrix<'a>,
    row_pointers: Vec<usize>,
    neighbor_columns: Vec<usize>,
    neighbor_edges: Vec<usize>,
}

impl<'a> TannerGraph<'a> {
    pub fn new(matrix: &'a SparseParityMatrix<'a>) -> Self {
        let rows = matrix.rows();
        let row_indices = matrix.row_indices();

        let mut row_pointers = vec![0usize; rows + 1];
        for &row in row_indices {
            row_pointers[row as usize + 1] += 1;
        }
        for row in 0..rows {
            row_pointers[row + 1] += row_pointers[row];
        }

        let mut next_slot = row_pointers[..rows].to_vec();
        let mut neighbor_columns = vec![0usize; row_indices.len()];
        let mut neighbor_edges = vec![0usize; row_indices.len()];
        for column in 0..matrix.columns() {
            for edge in matrix.column_range(column) {
                let row = row_indices[edge] as usize;
                let slot = next_slot[row];
                next_slot[row] += 1;
                neighbor_columns[slot] = column;
                neighbor_edges[slot] = edge;
            }
        }
        debug!("Tanner graph has {} check nodes, {} variable nodes, {} edges",
               rows, matrix.columns(), neighbor_edges.len());

        Self {
            matrix,
            row_pointers,
            neighbor_columns,
            neighbor_edges,
        }
    }

    pub fn matrix(&self) -> &'a SparseParityMatrix<'a> {
        self.matrix
    }

    pub fn check_nodes(&self) -> usize {
        self.matrix.rows()
    }

    pub fn variable_nodes(&self) -> usize {
        self.matrix.columns()
    }

    pub fn edges(&self) -> usize {
        self.neighbor_edges.len()
    }

    fn check_row(&self, row: usize) -> Result<(), LdpcError> {
        if row >= self.check_nodes() {
            return Err(LdpcError::IndexOutOfRange { index: row, limit: self.check_nodes() });
        }
        Ok(())
    }

    pub(crate) fn row_range(&self, row: usize) -> Range<usize> {
        self.row_pointers[row]..self.row_pointers[row + 1]
    }

    // Unchecked forms for the decoder's inner loops.
    pub(crate) fn neighbors_of(&self, row: usize) -> &[usize] {
        &self.neighbor_columns[self.row_range(row)]
    }

    pub(crate) fn edges_of(&self, row: usize) -> &[usize] {
        &self.neighbor_edges[self.row_range(row)]
    }

    /// The columns (variable nodes) taking part in check `row`.
    pub fn check_neighbors(&self, row: usize) -> Result<&[usize], LdpcError> {
        self.check_row(row)?;
        Ok(self.neighbors_of(row))
    }

    /// The edge identifiers of check `row`, parallel to `check_neighbors(row)`.
    pub fn check_edges(&self, row: usize) -> Result<&[usize], LdpcError> {
        self.check_row(row)?;
        Ok(self.edges_of(row))
    }

    pub fn row_weight(&self, row: usize) -> Result<usize, LdpcError> {
        self.check_row(row)?;
        Ok(self.row_range(row).len())
    }

    /// Regroups the row-grouped form by column and counts the entries per column.
    pub fn column_weights_from_rows(&self) -> Vec<usize> {
        let mut weights = vec![0usize; self.variable_nodes()];
        for &column in &self.neighbor_columns {
            weights[column] += 1;
        }
        weights
    }

    fn check_length(&self, bits: &BitSlice<Msb0, u8>) -> Result<(), LdpcError> {
        if bits.len() != self.variable_nodes() {
            return Err(LdpcError::DimensionMismatch { expected: self.variable_nodes(), actual: bits.len() });
        }
        Ok(())
    }

    pub(crate) fn check_is_odd(&self, row: usize, bits: &BitSlice<Msb0, u8>) -> bool {
        self.neighbors_of(row).iter().filter(|&&column| bits[column]).count() % 2 == 1
    }

    pub(crate) fn all_checks_satisfied(&self, bits: &BitSlice<Msb0, u8>) -> bool {
        !(0..self.check_nodes()).any(|row| self.check_is_odd(row, bits))
    }

    pub fn syndrome(&self, bits: &BitSlice<Msb0, u8>) -> Result<Syndrome, LdpcError> {
        self.check_length(bits)?;
        Ok((0..self.check_nodes()).map(|row| self.check_is_odd(row, bits)).collect())
    }

    /// Whether `bits` satisfies every parity check.
    pub fn is_codeword(&self, bits: &BitSlice<Msb0, u8>) -> Result<bool, LdpcError> {
        self.check_length(bits)?;
        Ok(self.all_checks_satisfied(bits))
    }
}

#[cfg(test)]
#[path = "./tanner_graph_spec.rs"]
mod tanner_graph_spec;
