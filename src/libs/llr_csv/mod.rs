pub mod llr_csv;
