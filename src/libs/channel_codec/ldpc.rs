// Belief-propagation decoding of a binary LDPC code given by its parity-check matrix.
//
// Messages live in flat arrays indexed by edge identifier: the position of the matrix entry in the
// CSC row_indices table. Variable nodes (columns) reach their edges through the CSC column
// pointers; check nodes (rows) through the Tanner graph's row-grouped inversion. Both are built
// before the first decode and never change.
//
// LLRs are ln(P(0) / P(1)): positive favours 0. A bit is decided 1 when its posterior LLR is <= 0,
// so a total erasure (LLR 0) decides 1.
//
// One iteration is a flooding schedule:
// 1) every check node sends each neighbour the combination of the *other* neighbours' messages,
// 2) every variable node sends each neighbour its channel LLR plus the *other* check messages,
// 3) tentative bits are decided from the posterior (channel + all check messages) and the syndrome
//    is checked.

use bitvec::prelude::BitVec;
use log::{debug, info, log_enabled, trace, Level};
use metered::time_source::{Instant, StdInstant};
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::libs::channel_codec::check_node::{clamp_llr, min_sum_update, sum_product_update, Algorithm};
use crate::libs::ldpc_error::ldpc_error::LdpcError;
use crate::libs::sparse_binary_matrix::autogen_ldpc::autogen_ldpc;
use crate::libs::sparse_binary_matrix::sparse_parity_matrix::SparseParityMatrix;
use crate::libs::sparse_binary_matrix::tanner_graph::{Codeword, TannerGraph};

pub const DEFAULT_MAX_ITERATIONS: usize = 20;
pub const DEFAULT_LLR_CLAMP: f64 = 25.0;
pub const DEFAULT_MIN_SUM_SCALE: f64 = 0.75;

// Validates the embedded matrix, and logs how long that takes.
pub fn init_ldpc() -> Result<&'static SparseParityMatrix<'static>, LdpcError> {
    let ldpc_init_duration = StdInstant::now();
    let matrix = autogen_ldpc()?;
    info!("LDPC codeword length {} parity checks {} edges {}", matrix.columns(), matrix.rows(), matrix.num_nonzero());
    info!("LDPC initialised in {}ms", ldpc_init_duration.elapsed_time());
    Ok(matrix)
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone)]
pub struct DecoderSettings {
    pub algorithm: Algorithm,
    pub max_iterations: usize,
    pub early_stop: bool,
    pub llr_clamp: f64,
    pub min_sum_scale: f64,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::SumProduct,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            early_stop: true,
            llr_clamp: DEFAULT_LLR_CLAMP,
            min_sum_scale: DEFAULT_MIN_SUM_SCALE,
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum DecoderState {
    Initialized,
    Iterating,
    Converged,
    MaxIterationsExceeded,
}

/// The result of one decode. Failing to converge is not an error: the channel may simply have
/// been too noisy, and the caller decides what to do about it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    // The last tentative bits.
    pub decoded_bits: Codeword,
    // Whether decoded_bits satisfies every parity check.
    pub converged: bool,
    pub iterations_used: usize,
    pub state: DecoderState,
    // The first iteration whose tentative bits satisfied every check, if any. Differs from
    // iterations_used only when decoding continues past convergence.
    pub converged_at: Option<usize>,
}

/// An iterative belief-propagation decoder for one parity-check matrix.
///
/// The matrix is borrowed, so any number of decoders (on any number of threads) can share it. The
/// message buffers belong to the decoder and are reused by sequential calls to `decode`; since that
/// takes `&mut self`, one decoder can never be driven by two callers at once. Decode concurrently
/// by giving each thread its own decoder.
#[derive(Debug, Clone)]
pub struct LdpcDecoder<'a> {
    graph: TannerGraph<'a>,
    algorithm: Algorithm,
    llr_clamp: f64,
    min_sum_scale: f64,
    state: DecoderState,

    channel_llrs: Vec<f64>,
    posterior_llrs: Vec<f64>,
    variable_to_check: Vec<f64>,
    check_to_variable: Vec<f64>,
    // Per-check scratch, sized to the largest row weight.
    incoming: Vec<f64>,
    outgoing: Vec<f64>,
    tentative: Codeword,
}

impl<'a> LdpcDecoder<'a> {
    pub fn new(matrix: &'a SparseParityMatrix<'a>, algorithm: Algorithm, llr_clamp: f64, min_sum_scale: f64) -> Result<Self, LdpcError> {
        if !llr_clamp.is_finite() || llr_clamp <= 0.0 {
            return Err(LdpcError::InvalidParameter(format!("LLR clamp must be finite and positive, not {}", llr_clamp)));
        }
        if !(min_sum_scale > 0.0 && min_sum_scale <= 1.0) {
            return Err(LdpcError::InvalidParameter(format!("Min-sum scale must be in (0, 1], not {}", min_sum_scale)));
        }
        let graph = TannerGraph::new(matrix);
        let max_row_weight = (0..graph.check_nodes()).map(|row| graph.row_range(row).len()).max().unwrap_or(0);
        let variable_nodes = graph.variable_nodes();
        let edges = graph.edges();
        debug!("Decoder using {} with LLR clamp {}, largest check degree {}", algorithm, llr_clamp, max_row_weight);
        Ok(Self {
            graph,
            algorithm,
            llr_clamp,
            min_sum_scale,
            state: DecoderState::Initialized,
            channel_llrs: vec![0.0; variable_nodes],
            posterior_llrs: vec![0.0; variable_nodes],
            variable_to_check: vec![0.0; edges],
            check_to_variable: vec![0.0; edges],
            incoming: vec![0.0; max_row_weight],
            outgoing: vec![0.0; max_row_weight],
            tentative: BitVec::repeat(false, variable_nodes),
        })
    }

    pub fn from_settings(matrix: &'a SparseParityMatrix<'a>, settings: &DecoderSettings) -> Result<Self, LdpcError> {
        Self::new(matrix, settings.algorithm, settings.llr_clamp, settings.min_sum_scale)
    }

    pub fn graph(&self) -> &TannerGraph<'a> {
        &self.graph
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The state reached by the most recent decode.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Posterior LLRs from the final iteration of the most recent decode.
    pub fn posterior_llrs(&self) -> &[f64] {
        &self.posterior_llrs
    }

    /// Decodes one received vector of channel LLRs, running at most `max_iterations` iterations.
    /// With `early_stop`, decoding ends at the first iteration whose tentative bits satisfy every
    /// check; without it, all `max_iterations` run.
    pub fn decode(&mut self, received_llrs: &[f64], max_iterations: usize, early_stop: bool) -> Result<DecodeOutcome, LdpcError> {
        if received_llrs.len() != self.graph.variable_nodes() {
            return Err(LdpcError::DimensionMismatch { expected: self.graph.variable_nodes(), actual: received_llrs.len() });
        }
        if max_iterations == 0 {
            return Err(LdpcError::InvalidIterationBound(max_iterations));
        }
        let ldpc_decode_duration = StdInstant::now();

        self.initialise(received_llrs);
        self.state = DecoderState::Iterating;

        let mut iterations_used = 0;
        let mut converged = false;
        let mut converged_at = None;
        for iteration in 1..=max_iterations {
            self.process_check_nodes();
            self.process_variable_nodes();
            self.decide_tentative_bits();
            iterations_used = iteration;
            converged = self.graph.all_checks_satisfied(&self.tentative);
            if log_enabled!(Level::Trace) {
                let unsatisfied = (0..self.graph.check_nodes())
                    .filter(|&row| self.graph.check_is_odd(row, &self.tentative))
                    .count();
                trace!("Iteration {}: {} unsatisfied checks", iteration, unsatisfied);
            }
            if converged {
                if converged_at.is_none() {
                    converged_at = Some(iteration);
                }
                if early_stop {
                    break;
                }
            }
        }

        self.state = if converged { DecoderState::Converged } else { DecoderState::MaxIterationsExceeded };
        debug!("LDPC decoded in {}ms", ldpc_decode_duration.elapsed_time());
        if converged {
            debug!("Decoding converged after {} iterations", converged_at.unwrap_or(iterations_used));
        } else {
            debug!("Decoding unsuccessful after {} iterations", iterations_used);
        }

        Ok(DecodeOutcome {
            decoded_bits: self.tentative.clone(),
            converged,
            iterations_used,
            state: self.state,
            converged_at,
        })
    }

    /// `decode` with the iteration bound and stopping rule taken from `settings`.
    pub fn decode_with_settings(&mut self, received_llrs: &[f64], settings: &DecoderSettings) -> Result<DecodeOutcome, LdpcError> {
        self.decode(received_llrs, settings.max_iterations, settings.early_stop)
    }

    fn initialise(&mut self, received_llrs: &[f64]) {
        self.state = DecoderState::Initialized;
        let matrix = self.graph.matrix();
        for (variable, &llr) in received_llrs.iter().enumerate() {
            let channel_llr = clamp_llr(llr, self.llr_clamp);
            self.channel_llrs[variable] = channel_llr;
            self.posterior_llrs[variable] = channel_llr;
            // First variable messages use only the channel.
            for edge in matrix.column_range(variable) {
                self.variable_to_check[edge] = channel_llr;
            }
        }
        for message in self.check_to_variable.iter_mut() {
            *message = 0.0;
        }
    }

    fn process_check_nodes(&mut self) {
        for row in 0..self.graph.check_nodes() {
            let edges = self.graph.edges_of(row);
            let degree = edges.len();
            for (slot, &edge) in edges.iter().enumerate() {
                self.incoming[slot] = self.variable_to_check[edge];
            }
            match self.algorithm {
                Algorithm::SumProduct => {
                    sum_product_update(&self.incoming[..degree], &mut self.outgoing[..degree], self.llr_clamp);
                }
                Algorithm::MinSum => {
                    min_sum_update(&self.incoming[..degree], &mut self.outgoing[..degree], self.min_sum_scale, self.llr_clamp);
                }
            }
            for (slot, &edge) in edges.iter().enumerate() {
                self.check_to_variable[edge] = self.outgoing[slot];
            }
        }
    }

    fn process_variable_nodes(&mut self) {
        let matrix = self.graph.matrix();
        for variable in 0..matrix.columns() {
            let edges = matrix.column_range(variable);
            let check_to_variable = &self.check_to_variable;
            let posterior = self.channel_llrs[variable]
                + edges.clone().map(|edge| check_to_variable[edge]).sum::<f64>();
            self.posterior_llrs[variable] = posterior;
            // Everything but the destination's own message.
            for edge in edges {
                self.variable_to_check[edge] = clamp_llr(posterior - self.check_to_variable[edge], self.llr_clamp);
            }
        }
    }

    fn decide_tentative_bits(&mut self) {
        for (variable, &posterior) in self.posterior_llrs.iter().enumerate() {
            self.tentative.set(variable, posterior <= 0.0);
        }
    }
}

#[cfg(test)]
#[path = "./ldpc_spec.rs"]
mod ldpc_spec;
