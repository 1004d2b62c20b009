pub mod channel_codec;
pub mod config_dir;
pub mod config_file;
pub mod ldpc_error;
pub mod llr_csv;
pub mod sparse_binary_matrix;
pub mod util;
