use crate::libs::sparse_binary_matrix::sparse_parity_matrix::{MatrixIndex, SparseParityMatrix};

// From "Iterative Error Correction", Example 2.5 "A regular parity-check matrix, with
// Wc = 2 and Wr = 3". Row-wise: [0, 1, 3], [1, 2, 4], [0, 4, 5], [2, 3, 5].
pub static EX_2_5_COLPTR: [MatrixIndex; 7] = [0, 2, 4, 6, 8, 10, 12];
pub static EX_2_5_ROW_IDX: [MatrixIndex; 12] = [0, 2, 0, 1, 1, 3, 0, 3, 1, 2, 2, 3];

// A codeword of example 2.5, from example 2.23.
pub const EX_2_5_CODEWORD: [u8; 6] = [0, 0, 1, 0, 1, 1];

pub fn example_2_5_parity_check_matrix() -> SparseParityMatrix<'static> {
    SparseParityMatrix::new(4, 6, 12, &EX_2_5_COLPTR, &EX_2_5_ROW_IDX).unwrap()
}

#[cfg(test)]
#[path = "./ex_2_5_spec.rs"]
mod ex_2_5_spec;
