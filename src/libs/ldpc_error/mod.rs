pub mod ldpc_error;
