#[macro_use]
extern crate clap;

use std::error::Error;
use std::path::Path;

use clap::{App, Arg, ArgMatches};
use log::{debug, error, info, warn};
use pretty_hex::*;

use ldpc_csc::libs::channel_codec::check_node::Algorithm;
use ldpc_csc::libs::channel_codec::ldpc::{init_ldpc, LdpcDecoder};
use ldpc_csc::libs::channel_codec::ldpc_util::{display_matrix, draw_tanner_graph, pack_codeword};
use ldpc_csc::libs::config_dir::config_dir;
use ldpc_csc::libs::config_file::config_file::ConfigurationStore;
use ldpc_csc::libs::llr_csv::llr_csv::read_llr_vectors;
use ldpc_csc::libs::sparse_binary_matrix::tanner_graph::TannerGraph;
use ldpc_csc::libs::util::logging::initialise_logging;
use ldpc_csc::libs::util::util::{dump_byte_vec, dump_llrs, grouped_bits};
use ldpc_csc::libs::util::version::VERSION;

const MAX_ITERATIONS: &'static str = "max-iterations";
const ALGORITHM: &'static str = "algorithm";
const EARLY_STOP: &'static str = "early-stop";
const NO_EARLY_STOP: &'static str = "no-early-stop";
const LLR_CLAMP: &'static str = "llr-clamp";
const MIN_SUM_SCALE: &'static str = "min-sum-scale";
const LLR_FILE: &'static str = "llr-file";
const OUTPUT_FILE: &'static str = "output-file";

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Mode {
        Info,
        Graph,
        Decode,
        ConfigFileLocation
    }
}

fn parse_command_line<'a>() -> (ArgMatches<'a>, Mode) {
    let result = App::new("ldpc-csc")
        .version(VERSION)
        .author("Matt Gumbley <matt.gumbley@gmail.com>")
        .about("Belief-propagation decoder for an embedded LDPC parity-check matrix")

        .arg(Arg::from_usage("<mode> 'The mode to use, usually Decode.'").possible_values(&Mode::variants()).default_value("Info"))

        .arg(Arg::with_name(LLR_FILE)
            .short("l")
            .long("llrs")
            .value_name("CSV file of received LLRs")
            .help("Sets the file of received vectors to decode, one vector of channel LLRs per line")
            .takes_value(true))

        .arg(Arg::with_name(OUTPUT_FILE)
            .short("o").long("output").help("Sets the Graphviz dot file to write the Tanner graph to")
            .value_name("dot file").takes_value(true))

        .arg(Arg::with_name(MAX_ITERATIONS)
            .short("i").long("maxiter").help("Sets the maximum number of decoding iterations")
            .value_name("iterations").takes_value(true))

        .arg(Arg::with_name(ALGORITHM)
            .short("a").long("algorithm").help("Sets the check node algorithm, SumProduct or MinSum")
            .value_name("algorithm").takes_value(true))

        .arg(Arg::with_name(EARLY_STOP)
            .short("e").long("earlystop").help("Stop decoding as soon as every parity check is satisfied")
            .conflicts_with(NO_EARLY_STOP))

        .arg(Arg::with_name(NO_EARLY_STOP)
            .short("E").long("noearlystop").help("Always run the maximum number of iterations"))

        .arg(Arg::with_name(LLR_CLAMP)
            .short("c").long("clamp").help("Sets the magnitude LLRs and messages are saturated to")
            .value_name("magnitude").takes_value(true))

        .arg(Arg::with_name(MIN_SUM_SCALE)
            .short("s").long("scale").help("Sets the min-sum normalisation factor, in (0, 1]")
            .value_name("scale").takes_value(true))

        .get_matches();

    let mode = value_t!(result.value_of("mode"), Mode).unwrap_or(Mode::Info);

    return (result, mode);
}

// Options given on the command line are stored in the configuration file, then everything is taken
// from the configuration.
fn configure_decoder(arguments: &ArgMatches, config: &mut ConfigurationStore) -> Result<(), Box<dyn Error>> {
    if arguments.is_present(ALGORITHM) {
        let algorithm = value_t!(arguments, ALGORITHM, Algorithm)?;
        info!("Setting algorithm to {}", algorithm);
        config.set_algorithm(algorithm)?;
    }
    if arguments.is_present(MAX_ITERATIONS) {
        let max_iterations = value_t!(arguments, MAX_ITERATIONS, usize)?;
        info!("Setting maximum iterations to {}", max_iterations);
        config.set_max_iterations(max_iterations)?;
    }
    if arguments.is_present(EARLY_STOP) {
        info!("Setting early stop");
        config.set_early_stop(true)?;
    }
    if arguments.is_present(NO_EARLY_STOP) {
        info!("Clearing early stop");
        config.set_early_stop(false)?;
    }
    if arguments.is_present(LLR_CLAMP) {
        let llr_clamp = value_t!(arguments, LLR_CLAMP, f64)?;
        info!("Setting LLR clamp to {}", llr_clamp);
        config.set_llr_clamp(llr_clamp)?;
    }
    if arguments.is_present(MIN_SUM_SCALE) {
        let min_sum_scale = value_t!(arguments, MIN_SUM_SCALE, f64)?;
        info!("Setting min-sum scale to {}", min_sum_scale);
        config.set_min_sum_scale(min_sum_scale)?;
    }
    Ok(())
}

fn run(arguments: ArgMatches, mode: Mode) -> Result<i32, Box<dyn Error>> {
    let home_dir = dirs::home_dir();
    let config_path = config_dir::configuration_directory(home_dir)?;
    let config_path_clone = config_path.clone();
    let mut config = ConfigurationStore::new(config_path)?;
    if mode == Mode::ConfigFileLocation {
        info!("Configuration path is [{:?}]", config_path_clone);
        info!("Configuration file is [{:?}]", config.get_config_file_path());
        return Ok(0)
    }

    configure_decoder(&arguments, &mut config)?;
    let settings = config.decoder_settings();
    debug!("Decoder settings {:?}", settings);

    info!("Initialising LDPC...");
    let matrix = init_ldpc()?;
    let graph = TannerGraph::new(matrix);

    match mode {
        Mode::Info => {
            info!("Parity-check matrix is {} x {} with {} non-zero entries", matrix.rows(), matrix.columns(), matrix.num_nonzero());
            info!("Column weights {:?}", matrix.column_weights());
            for row in 0..graph.check_nodes() {
                info!("Check {} neighbours {:?}", row, graph.check_neighbors(row)?);
            }
            for line in display_matrix(matrix) {
                info!("{}", line);
            }
            Ok(0)
        }
        Mode::Graph => {
            let output = arguments.value_of(OUTPUT_FILE)
                .ok_or_else(|| format!("Graph mode needs an output file (--output)"))?;
            draw_tanner_graph(&graph, output)?;
            info!("Tanner graph written to {}", output);
            Ok(0)
        }
        Mode::Decode => {
            let llr_file = arguments.value_of(LLR_FILE)
                .ok_or_else(|| format!("Decode mode needs a file of received LLRs (--llrs)"))?;
            let vectors = read_llr_vectors(Path::new(llr_file), matrix.columns())?;
            let mut decoder = LdpcDecoder::from_settings(matrix, &settings)?;
            let mut failures = 0;
            for (index, llrs) in vectors.iter().enumerate() {
                debug!("Received {}", dump_llrs(llrs));
                let outcome = decoder.decode_with_settings(llrs, &settings)?;
                if outcome.converged {
                    info!("Vector {}: {} converged after {} iterations", index, grouped_bits(&outcome.decoded_bits),
                          outcome.converged_at.unwrap_or(outcome.iterations_used));
                } else {
                    failures += 1;
                    warn!("Vector {}: {} did not converge in {} iterations", index, grouped_bits(&outcome.decoded_bits),
                          outcome.iterations_used);
                }
                let packed = pack_codeword(&outcome.decoded_bits);
                debug!("Packed {}", dump_byte_vec(&packed));
                info!("\n{}", pretty_hex(&packed));
            }
            info!("Decoded {} vectors, {} did not converge", vectors.len(), failures);
            Ok(if failures == 0 { 0 } else { 2 })
        }
        Mode::ConfigFileLocation => Ok(0),
    }
}

fn main() {
    initialise_logging();

    let (arguments, mode) = parse_command_line();
    debug!("Command line parsed");

    match run(arguments, mode) {
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
    }
}
