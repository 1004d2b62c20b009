use bitvec::prelude::{BitSlice, Msb0};

use crate::libs::channel_codec::ldpc_util::codeword_to_display;

pub fn dump_byte_vec(bytes: &[u8]) -> String {
    let mut out = vec![];
    for b in bytes {
        out.push(format!("{:#010b}", b));
    }
    format!("[{}]", out.join(", "))
}

// Groups a word into runs of 8 bits for display.
pub fn grouped_bits(bits: &BitSlice<Msb0, u8>) -> String {
    let display = codeword_to_display(bits);
    display.as_bytes()
        .chunks(8)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn dump_llrs(llrs: &[f64]) -> String {
    let out: Vec<String> = llrs.iter().map(|llr| format!("{:+.3}", llr)).collect();
    format!("[{}]", out.join(", "))
}

#[cfg(test)]
#[path = "./util_spec.rs"]
mod util_spec;
