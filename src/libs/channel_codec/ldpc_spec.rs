extern crate hamcrest2;

#[cfg(test)]
mod ldpc_spec {
    use std::env;
    use std::thread;
    use std::time::Duration;

    use hamcrest2::prelude::*;
    use log::info;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    use crate::libs::channel_codec::check_node::Algorithm;
    use crate::libs::channel_codec::ldpc::{DecodeOutcome, DecoderSettings, DecoderState, LdpcDecoder, init_ldpc};
    use crate::libs::channel_codec::ldpc_util::{bits_to_llrs, codeword_from_bits, codeword_to_display};
    use crate::libs::ldpc_error::ldpc_error::LdpcError;
    use crate::libs::sparse_binary_matrix::autogen_ldpc::autogen_ldpc;
    use crate::libs::sparse_binary_matrix::ex_2_5::{EX_2_5_CODEWORD, example_2_5_parity_check_matrix};
    use crate::libs::util::test_util::panic_after;

    // Satisfies every check of the embedded matrix.
    const AUTOGEN_CODEWORD: [u8; 14] = [0, 1, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0];
    const CLAMP: f64 = 25.0;
    const SCALE: f64 = 0.75;

    #[ctor::ctor]
    fn before_each() {
        env::set_var("RUST_LOG", "debug");
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[ctor::dtor]
    fn after_each() {}

    fn autogen_decoder(algorithm: Algorithm) -> LdpcDecoder<'static> {
        LdpcDecoder::new(autogen_ldpc().unwrap(), algorithm, CLAMP, SCALE).unwrap()
    }

    fn log_outcome(outcome: &DecodeOutcome) {
        info!("Decoded {} converged {} after {} iterations", codeword_to_display(&outcome.decoded_bits),
              outcome.converged, outcome.iterations_used);
    }

    #[test]
    fn embedded_code_initialises() {
        let matrix = init_ldpc().unwrap();
        assert_that!(matrix.columns(), equal_to(14));
        assert_that!(matrix.rows(), equal_to(4));
    }

    #[test]
    fn new_decoder_is_initialized() {
        let decoder = autogen_decoder(Algorithm::SumProduct);
        assert_that!(decoder.state(), equal_to(DecoderState::Initialized));
        assert_that!(decoder.algorithm(), equal_to(Algorithm::SumProduct));
        assert_that!(decoder.graph().variable_nodes(), equal_to(14));
    }

    #[rstest]
    #[case(Algorithm::SumProduct)]
    #[case(Algorithm::MinSum)]
    fn uncorrupted_codeword_converges_in_one_iteration(#[case] algorithm: Algorithm) {
        let mut decoder = autogen_decoder(algorithm);
        let llrs = bits_to_llrs(&AUTOGEN_CODEWORD, 4.0);
        for &max_iterations in &[1, 2, 20] {
            let outcome = decoder.decode(&llrs, max_iterations, true).unwrap();
            log_outcome(&outcome);
            assert_that!(outcome.converged, equal_to(true));
            assert_that!(outcome.iterations_used, equal_to(1));
            assert_that!(outcome.converged_at, equal_to(Some(1)));
            assert_that!(outcome.state, equal_to(DecoderState::Converged));
            assert_that!(outcome.decoded_bits.clone(), equal_to(codeword_from_bits(&AUTOGEN_CODEWORD)));
        }
        assert_that!(decoder.state(), equal_to(DecoderState::Converged));
    }

    #[rstest]
    #[case(Algorithm::SumProduct)]
    #[case(Algorithm::MinSum)]
    fn every_codeword_converges_in_one_iteration(#[case] algorithm: Algorithm) {
        let mut decoder = autogen_decoder(algorithm);
        let mut codewords = 0;
        for word in 0u32..(1 << 14) {
            let bits: Vec<u8> = (0..14).map(|i| ((word >> (13 - i)) & 1) as u8).collect();
            if !decoder.graph().is_codeword(&codeword_from_bits(&bits)).unwrap() {
                continue;
            }
            codewords += 1;
            let outcome = decoder.decode(&bits_to_llrs(&bits, 2.0), 20, true).unwrap();
            assert_that!(outcome.converged, equal_to(true));
            assert_that!(outcome.iterations_used, equal_to(1));
            assert_that!(outcome.decoded_bits, equal_to(codeword_from_bits(&bits)));
        }
        info!("{} codewords decoded", codewords);
        // 14 columns, 4 independent checks.
        assert_that!(codewords, equal_to(1024));
    }

    #[test]
    fn all_zero_codeword_converges_in_one_iteration() {
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        let outcome = decoder.decode(&[3.0; 14], 10, true).unwrap();
        assert_that!(outcome.converged, equal_to(true));
        assert_that!(outcome.iterations_used, equal_to(1));
        assert_that!(outcome.decoded_bits.count_ones(), equal_to(0));
    }

    #[rstest]
    #[case(Algorithm::SumProduct)]
    #[case(Algorithm::MinSum)]
    fn total_ambiguity_runs_to_the_iteration_bound(#[case] algorithm: Algorithm) {
        let mut decoder = autogen_decoder(algorithm);
        let outcome = decoder.decode(&[0.0; 14], 7, true).unwrap();
        log_outcome(&outcome);
        assert_that!(outcome.converged, equal_to(false));
        assert_that!(outcome.iterations_used, equal_to(7));
        assert_that!(outcome.converged_at, equal_to(None));
        assert_that!(outcome.state, equal_to(DecoderState::MaxIterationsExceeded));
        assert_that!(decoder.state(), equal_to(DecoderState::MaxIterationsExceeded));
    }

    #[test]
    fn non_convergence_always_terminates() {
        let outcome = panic_after(Duration::from_secs(30), || {
            let mut decoder = autogen_decoder(Algorithm::SumProduct);
            decoder.decode(&[0.0; 14], 10_000, true).unwrap()
        });
        assert_that!(outcome.converged, equal_to(false));
        assert_that!(outcome.iterations_used, equal_to(10_000));
    }

    #[rstest]
    #[case(Algorithm::SumProduct)]
    #[case(Algorithm::MinSum)]
    fn weakly_received_single_error_is_corrected(#[case] algorithm: Algorithm) {
        let mut decoder = autogen_decoder(algorithm);
        let expected = codeword_from_bits(&AUTOGEN_CODEWORD);
        for position in 0..AUTOGEN_CODEWORD.len() {
            let mut llrs = bits_to_llrs(&AUTOGEN_CODEWORD, 4.0);
            llrs[position] = -llrs[position] / 4.0;
            let outcome = decoder.decode(&llrs, 20, true).unwrap();
            log_outcome(&outcome);
            assert_that!(outcome.converged, equal_to(true));
            assert_that!(outcome.iterations_used, equal_to(1));
            assert_that!(outcome.decoded_bits, equal_to(expected.clone()));
        }
    }

    #[test]
    fn strongly_received_error_on_heavy_column_is_corrected() {
        // Column 3 takes part in all four checks, so all four vote it back.
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        let mut corrupted = AUTOGEN_CODEWORD;
        corrupted[3] ^= 1;
        let outcome = decoder.decode(&bits_to_llrs(&corrupted, 2.0), 20, true).unwrap();
        log_outcome(&outcome);
        assert_that!(outcome.converged, equal_to(true));
        assert_that!(outcome.decoded_bits, equal_to(codeword_from_bits(&AUTOGEN_CODEWORD)));
    }

    #[test]
    fn ex_2_5_single_errors_are_corrected() {
        // Example 2.23 in Sarah J. Johnson - Iterative Error Correction
        let ex2_5 = example_2_5_parity_check_matrix();
        let mut decoder = LdpcDecoder::new(&ex2_5, Algorithm::SumProduct, CLAMP, SCALE).unwrap();
        for j in 0..EX_2_5_CODEWORD.len() {
            let mut codeword_bad = EX_2_5_CODEWORD;
            codeword_bad[j] ^= 1;
            let outcome = decoder.decode(&bits_to_llrs(&codeword_bad, 1.3863), 100, true).unwrap();
            assert_that!(outcome.converged, equal_to(true));
            assert_that!(outcome.iterations_used, equal_to(1));
            assert_that!(outcome.decoded_bits, equal_to(codeword_from_bits(&EX_2_5_CODEWORD)));
        }
    }

    #[test]
    fn without_early_stop_every_iteration_runs() {
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        let outcome = decoder.decode(&bits_to_llrs(&AUTOGEN_CODEWORD, 4.0), 5, false).unwrap();
        assert_that!(outcome.iterations_used, equal_to(5));
        assert_that!(outcome.converged, equal_to(true));
        assert_that!(outcome.converged_at, equal_to(Some(1)));
        assert_that!(outcome.state, equal_to(DecoderState::Converged));
        assert_that!(outcome.decoded_bits, equal_to(codeword_from_bits(&AUTOGEN_CODEWORD)));
    }

    #[test]
    fn huge_llrs_are_saturated() {
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        let outcome = decoder.decode(&bits_to_llrs(&AUTOGEN_CODEWORD, 1.0e9), 3, true).unwrap();
        assert_that!(outcome.converged, equal_to(true));
        assert_that!(decoder.posterior_llrs().iter().all(|llr| llr.is_finite()), equal_to(true));
        assert_that!(decoder.posterior_llrs().iter().all(|llr| llr.abs() <= CLAMP * 5.0), equal_to(true));
    }

    #[test]
    fn wrong_length_is_a_dimension_mismatch() {
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        assert_that!(decoder.decode(&[1.0; 13], 10, true), equal_to(Err(LdpcError::DimensionMismatch { expected: 14, actual: 13 })));
        assert_that!(decoder.decode(&[1.0; 15], 10, true), equal_to(Err(LdpcError::DimensionMismatch { expected: 14, actual: 15 })));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        assert_that!(decoder.decode(&[1.0; 14], 0, true), equal_to(Err(LdpcError::InvalidIterationBound(0))));
        assert_that!(decoder.state(), equal_to(DecoderState::Initialized));
    }

    #[rstest]
    #[case(0.0, SCALE)]
    #[case(-1.0, SCALE)]
    #[case(f64::NAN, SCALE)]
    #[case(f64::INFINITY, SCALE)]
    #[case(CLAMP, 0.0)]
    #[case(CLAMP, 1.5)]
    fn invalid_arithmetic_parameters_are_rejected(#[case] llr_clamp: f64, #[case] min_sum_scale: f64) {
        let result = LdpcDecoder::new(autogen_ldpc().unwrap(), Algorithm::MinSum, llr_clamp, min_sum_scale);
        let rejected = match result {
            Err(LdpcError::InvalidParameter(_)) => true,
            _ => false,
        };
        assert_that!(rejected, equal_to(true));
    }

    #[test]
    fn settings_drive_the_decoder() {
        let settings = DecoderSettings {
            algorithm: Algorithm::MinSum,
            max_iterations: 4,
            early_stop: true,
            llr_clamp: 10.0,
            min_sum_scale: 1.0,
        };
        let mut decoder = LdpcDecoder::from_settings(autogen_ldpc().unwrap(), &settings).unwrap();
        assert_that!(decoder.algorithm(), equal_to(Algorithm::MinSum));
        let outcome = decoder.decode_with_settings(&[0.0; 14], &settings).unwrap();
        assert_that!(outcome.iterations_used, equal_to(4));
    }

    fn random_llrs(rng: &mut StdRng) -> Vec<f64> {
        (0..14).map(|_| rng.gen_range(-3.0..3.0)).collect()
    }

    #[rstest]
    #[case(Algorithm::SumProduct)]
    #[case(Algorithm::MinSum)]
    fn decoding_is_deterministic(#[case] algorithm: Algorithm) {
        let mut rng = StdRng::seed_from_u64(22020);
        let mut reused = autogen_decoder(algorithm);
        for _ in 0..100 {
            let llrs = random_llrs(&mut rng);
            let first = autogen_decoder(algorithm).decode(&llrs, 20, true).unwrap();
            let second = autogen_decoder(algorithm).decode(&llrs, 20, true).unwrap();
            let third = reused.decode(&llrs, 20, true).unwrap();
            assert_that!(second, equal_to(first.clone()));
            assert_that!(third, equal_to(first));
        }
    }

    #[test]
    fn converged_outcomes_are_codewords() {
        let mut rng = StdRng::seed_from_u64(1401);
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        for _ in 0..200 {
            let llrs = random_llrs(&mut rng);
            let outcome = decoder.decode(&llrs, 20, true).unwrap();
            assert_that!(decoder.graph().is_codeword(&outcome.decoded_bits).unwrap(), equal_to(outcome.converged));
            if !outcome.converged {
                assert_that!(outcome.iterations_used, equal_to(20));
            }
        }
    }

    #[test]
    fn noisy_channel_decodes_to_the_transmitted_codeword() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut decoder = autogen_decoder(Algorithm::SumProduct);
        let expected = codeword_from_bits(&AUTOGEN_CODEWORD);
        for _ in 0..50 {
            let llrs: Vec<f64> = bits_to_llrs(&AUTOGEN_CODEWORD, 4.0)
                .iter()
                .map(|llr| llr + rng.gen_range(-1.5..1.5))
                .collect();
            let outcome = decoder.decode(&llrs, 20, true).unwrap();
            assert_that!(outcome.converged, equal_to(true));
            assert_that!(outcome.decoded_bits, equal_to(expected.clone()));
        }
    }

    #[test]
    fn decoders_on_many_threads_share_one_matrix() {
        let mut rng = StdRng::seed_from_u64(99);
        let inputs: Vec<Vec<f64>> = (0..8).map(|_| random_llrs(&mut rng)).collect();
        let mut sequential = autogen_decoder(Algorithm::SumProduct);
        let expected: Vec<DecodeOutcome> = inputs.iter().map(|llrs| sequential.decode(llrs, 20, true).unwrap()).collect();

        let handles: Vec<thread::JoinHandle<DecodeOutcome>> = inputs.into_iter().map(|llrs| {
            thread::spawn(move || {
                let mut decoder = autogen_decoder(Algorithm::SumProduct);
                decoder.decode(&llrs, 20, true).unwrap()
            })
        }).collect();
        let actual: Vec<DecodeOutcome> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert_that!(actual, equal_to(expected));
    }
}
