use std::error::Error;
use std::path::Path;

use log::debug;

/// Reads received vectors from a CSV file: one vector of channel LLRs per line, no header. Blank
/// lines are skipped; every vector must have `expected_length` values.
pub fn read_llr_vectors(path: &Path, expected_length: usize) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(path)?;
    let mut vectors = vec![];
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let llrs = record.iter()
            .map(|field| field.parse::<f64>()
                .map_err(|err| format!("Record {}: '{}' is not a number: {}", line + 1, field, err)))
            .collect::<Result<Vec<f64>, String>>()?;
        if llrs.len() != expected_length {
            return Err(Box::<dyn Error>::from(format!("Record {} has {} LLRs, expecting {}", line + 1, llrs.len(), expected_length)));
        }
        vectors.push(llrs);
    }
    debug!("Read {} received vectors from {:?}", vectors.len(), path);
    Ok(vectors)
}

#[cfg(test)]
#[path = "./llr_csv_spec.rs"]
mod llr_csv_spec;
