//! Sequence-Match Driver
//!
//! ```text
//! compile → setup → assignment → public part → prove → verify
//! ```
//!
//! Runs the whole pipeline once for the configured sequences and prints the
//! proof envelope followed by the verification result.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seq_match_prover::{Config, MatchProver};

fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    // RUST_LOG=seq_match_circuits=trace 형태로 레벨 제어 가능
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "seq_match_prover=debug,seq_match_circuits=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting sequence-match prover");

    // 설정 로드
    let config = Config::from_env()?;
    let contract = config.contract();
    tracing::info!(
        semantics = %config.semantics,
        reference = %config.reference_visibility,
        environment = ?config.environment,
        "📋 Configuration loaded"
    );

    let prover = MatchProver::with_setup_seed(config.setup_seed);

    let compiled = prover.compiled(contract)?;
    tracing::info!(
        constraints = compiled.stats.constraints,
        witness_variables = compiled.stats.witness_variables,
        public_inputs = compiled.stats.public_inputs,
        "🔐 Circuit compiled"
    );

    let a: Vec<char> = config.private_sequence.chars().collect();
    let b: Vec<char> = config.reference_sequence.chars().collect();

    let outcome = match config.expected_signal {
        Some(expected) => prover.prove(contract, &a, &b, expected),
        None => prover.prove_honest(contract, &a, &b),
    }
    .and_then(|result| {
        prover.verify(contract, &result.envelope)?;
        Ok(result)
    });

    match outcome {
        Ok(result) => {
            println!("{}", result.envelope.to_json()?);
            println!("Signal: {}", result.signal);
            println!("Verification Result: Success");
            Ok(())
        }
        Err(e) => {
            println!("Verification Result: Failed");
            Err(e.into())
        }
    }
}
