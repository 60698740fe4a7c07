//! Random Settlement Demo Node
//!
//! Runs the request/settlement protocol in-process against recording
//! callbacks and prints the resulting protocol log.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use random_settlement::{
    config::{digest_key, ProtocolConfig, VerifierKind},
    core::{Principal, RandomNumber, Seed},
    protocol::{DigestProofVerifier, ProtocolError, RecordingCallback, VerifierRef},
    VERSION,
};

/// Number of requests in the demo run.
const DEMO_REQUESTS: u64 = 30;

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ProtocolConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => ProtocolConfig::from_env().context("reading environment")?,
    };

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Random Settlement v{}", VERSION);
    info!("Admin: {}", config.admin_principal()?);

    demo(&config)
}

/// Register and settle a batch of requests, then replay the failure paths.
fn demo(config: &ProtocolConfig) -> Result<()> {
    info!("=== Starting Demo Run ===");

    let mut protocol = config.build_protocol()?;
    let admin = config.admin_principal()?;
    let requester = Principal::from_name("demo-requester");

    // The demo settles with a keyed digest so that bad proofs are observable
    let key = match &config.default_verifier {
        Some(VerifierKind::Digest { key }) => digest_key(key)?,
        _ => digest_key("random-settlement-demo")?,
    };
    let verifier = DigestProofVerifier::new(key);
    protocol.set_admin_verifier(&admin, VerifierRef::new(verifier.clone()))?;

    let mut recorders = Vec::new();
    for i in 0..DEMO_REQUESTS {
        let seed = Seed::from(1234 + i);
        let recorder = RecordingCallback::new();
        let registration = protocol.register(&requester, seed, recorder.handle())?;

        if let Err(e) = registration.opening().verify(&registration.commitment) {
            warn!("Commitment for seed {} did not verify: {}", seed, e);
        }
        recorders.push((seed, recorder));
    }
    info!("{} requests pending", protocol.pending_count());

    for (i, (seed, _)) in recorders.iter().enumerate() {
        let value = RandomNumber::from(0x1234 + i as u64);
        let proof = verifier.prove(seed, &value);
        protocol.settle(*seed, value, &proof)?;
    }

    for (seed, recorder) in &recorders {
        match recorder.value_for(seed) {
            Some(value) => info!("Seed {} received {}", seed, value),
            None => warn!("Seed {} received nothing", seed),
        }
    }

    info!("=== Checking Failure Paths ===");

    let seed = Seed::from(1234u64);
    match protocol.settle(seed, RandomNumber::from(1u64), &[0u8; 32]) {
        Err(ProtocolError::NotFound { .. }) => info!("Replay of seed {} rejected", seed),
        other => warn!("Unexpected replay outcome: {:?}", other),
    }

    let recorder = RecordingCallback::new();
    protocol.register(&requester, seed, recorder.handle())?;
    match protocol.settle(seed, RandomNumber::from(1u64), &[0u8; 32]) {
        Err(ProtocolError::InvalidProof { .. }) => info!("Forged proof for seed {} rejected", seed),
        other => warn!("Unexpected forged-proof outcome: {:?}", other),
    }
    info!("Seed {} still pending: {}", seed, protocol.query(&seed).is_some());

    let events = protocol.events();
    info!(
        "Protocol log: {} events, {} settlements, {} bytes encoded",
        events.len(),
        events.settlements().len(),
        events.to_bytes()?.len()
    );
    println!("{}", events.to_json()?);

    Ok(())
}
