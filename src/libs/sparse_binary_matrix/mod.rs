pub mod autogen_ldpc;
pub mod sparse_parity_matrix;
pub mod tanner_graph;

#[cfg(test)]
pub mod ex_2_5;
