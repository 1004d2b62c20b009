use std::{fs, io};
use std::path::Path;

use bitvec::prelude::{BitSlice, Msb0};

use crate::libs::sparse_binary_matrix::sparse_parity_matrix::SparseParityMatrix;
use crate::libs::sparse_binary_matrix::tanner_graph::{Codeword, TannerGraph};

// Given a graph and an output filename (ending in .dot), create the output file for graphviz'
// dot to convert to a suitable output file e.g.
// dot -Tpng my_graph_file.dot -o my_graph_file.png
pub fn draw_tanner_graph(source: &TannerGraph, output_filename: &str) -> io::Result<()> {
    fs::write(Path::new(output_filename), tanner_graph_dot(source))
}

pub fn tanner_graph_dot(source: &TannerGraph) -> String {
    let checks = source.check_nodes();
    let bits = source.variable_nodes();
    let mut dot = String::new();
    dot += "
graph G {
   ranksep = 1.2;
   nodesep = 1.2;
   splines=false;
   rankdir = LR;
   peripheries = 0;
   subgraph cluster_checks {
      node[shape=square, style=filled]
";
    // check nodes (one per row)
    for row in 0..checks {
        dot += format!("      check{} [label=\"\",fillcolor=lightgray]\n", row + 1).as_str();
    }
    dot += "      ";
    dot += (1..=checks).map(|row| format!("check{}", row)).collect::<Vec<String>>().join("--").as_str();
    dot += "  [style=invis]";
    dot += "
   }
   subgraph cluster_padding1 {
      color=invis;
      a12m [style=invisible]
   }
   subgraph cluster_padding2 {
      color=invis;
      a22m [style=invisible]
   }
   subgraph cluster_bits {
      node[shape=circle, style=filled]
";
    // bit nodes (one per column)
    for col in 0..bits {
        dot += format!("      bit{} [label=\"\",fillcolor=white]\n", col + 1).as_str();
    }
    dot += "      ";
    dot += (1..=bits).map(|col| format!("bit{}", col)).collect::<Vec<String>>().join("--").as_str();
    dot += " [style=invis]
   }\n";
    // edges
    for row in 0..checks {
        for &col in source.neighbors_of(row) {
            dot += format!("   check{}--bit{} [constraint=false]\n", row + 1, col + 1).as_str();
        }
    }
    dot += "}
";
    dot
}

// Given a matrix, construct a displayable (dense) representation of it, one String per row.
pub fn display_matrix(source: &SparseParityMatrix) -> Vec<String> {
    let mut dense = vec![vec![false; source.columns()]; source.rows()];
    for col in 0..source.columns() {
        for edge in source.column_range(col) {
            dense[source.row_indices()[edge] as usize][col] = true;
        }
    }
    dense.iter()
        .map(|row| row.iter().map(|&one| if one { "1 " } else { "0 " }).collect::<String>())
        .collect()
}

// Given a word, construct a displayable representation of it
pub fn codeword_to_display(bits: &BitSlice<Msb0, u8>) -> String {
    (0..bits.len()).map(|i| if bits[i] { '1' } else { '0' }).collect()
}

// Any non-zero byte is a 1.
pub fn codeword_from_bits(bits: &[u8]) -> Codeword {
    bits.iter().map(|&bit| bit != 0).collect()
}

// Maps known bits onto channel LLRs of the given magnitude: 0 -> +magnitude, 1 -> -magnitude.
pub fn bits_to_llrs(bits: &[u8], magnitude: f64) -> Vec<f64> {
    bits.iter()
        .map(|&bit| if bit == 0 { magnitude } else { -magnitude })
        .collect()
}

// Decides each bit from its LLR alone; <= 0 decides 1.
pub fn hard_decisions(llrs: &[f64]) -> Codeword {
    llrs.iter().map(|&llr| llr <= 0.0).collect()
}

// Packs a word into bytes, first bit in the most significant bit of the first byte; the last byte
// is padded with zeros.
pub fn pack_codeword(bits: &BitSlice<Msb0, u8>) -> Vec<u8> {
    let mut out = vec![0u8; (bits.len() + 7) >> 3];
    for i in 0..bits.len() {
        if bits[i] {
            out[i >> 3] |= 0x80 >> (i & 0x07);
        }
    }
    out
}

#[cfg(test)]
#[path = "./ldpc_util_spec.rs"]
mod ldpc_util_spec;
