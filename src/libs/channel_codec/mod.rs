pub mod check_node;
pub mod ldpc;
pub mod ldpc_util;
