// Generated from a parity-check matrix description. A sparse LDPC matrix (containing only zeros and
// ones) held in compressed sparse column (CSC) form. The code is known at compile time, so it is
// embedded here rather than loaded from a file.
extern crate lazy_static;
use lazy_static::lazy_static;

use crate::libs::ldpc_error::ldpc_error::LdpcError;
use crate::libs::sparse_binary_matrix::sparse_parity_matrix::{MatrixIndex, SparseParityMatrix};

pub const AUTOGEN_M: usize = 4;
pub const AUTOGEN_N: usize = 14;
pub const AUTOGEN_NUM_NZ: usize = 23;

pub static AUTOGEN_COLPTR: [MatrixIndex; AUTOGEN_N + 1] = [
    0x0, 0x2, 0x3, 0x4, 0x8, 0x9, 0xa, 0xb, 0xc, 0xe, 0xf, 0x10, 0x13, 0x15, 0x17
];

pub static AUTOGEN_ROW_IDX: [MatrixIndex; AUTOGEN_NUM_NZ] = [
    0x1, 0x3, 0x2, 0x0, 0x0, 0x1, 0x2, 0x3, 0x1, 0x2, 0x2, 0x3, 0x0, 0x2, 0x3, 0x1, 0x0, 0x2, 0x3, 0x0, 0x2, 0x1, 0x3
];

lazy_static! {
    static ref AUTOGEN_LDPC: Result<SparseParityMatrix<'static>, LdpcError> =
        SparseParityMatrix::new(AUTOGEN_M, AUTOGEN_N, AUTOGEN_NUM_NZ, &AUTOGEN_COLPTR, &AUTOGEN_ROW_IDX);
}

/// The embedded parity-check matrix, validated on first use.
pub fn autogen_ldpc() -> Result<&'static SparseParityMatrix<'static>, LdpcError> {
    AUTOGEN_LDPC.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
#[path = "./autogen_ldpc_spec.rs"]
mod autogen_ldpc_spec;
