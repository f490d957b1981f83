use std::time::Duration;

use clap::Parser;
use dotenvy::dotenv;
use log::{error, info, warn};
use rand::distributions::{Alphanumeric, Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::ClientBuilder;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "submit-daemon",
    about = "Submits generated messages through the form server at a fixed rate"
)]
struct Args {
    /// Base url of the form server
    #[arg(long, env = "FORM_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Total submission rate (messages / second) across all workers
    #[arg(short, long, default_value_t = 10.0)]
    rate: f64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 1)]
    concurrency: usize,

    /// Base seed for deterministic sender ids & message text
    #[arg(short, long, default_value_t = 42u64)]
    seed: u64,

    /// Optional number of messages per worker (if omitted, runs indefinitely)
    #[arg(short, long)]
    messages: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    if args.concurrency == 0 {
        anyhow::bail!("concurrency must be > 0");
    }
    if args.rate <= 0.0 {
        anyhow::bail!("rate must be > 0");
    }

    let per_worker_rate = args.rate / args.concurrency as f64;
    info!(
        "Starting submit daemon: endpoint={}, total_rate={} msg/s, per_worker_rate={:.3}, concurrency={}, seed={}, messages_per_worker={:?}",
        args.endpoint,
        args.rate,
        per_worker_rate,
        args.concurrency,
        args.seed,
        args.messages
    );

    // A redirect means the submission was treated as empty.
    let http_client = ClientBuilder::new()
        .timeout(Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let mut handles = Vec::with_capacity(args.concurrency);

    for i in 0..args.concurrency {
        let client = http_client.clone();
        let endpoint = format!("{}/publish", args.endpoint.trim_end_matches('/'));
        let seed = args.seed + i as u64;
        let messages_target = args.messages;
        let sleep_duration = Duration::from_secs_f64(1.0 / per_worker_rate);
        let worker_index = i;

        handles.push(tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let sender = deterministic_uuid(&mut rng);
            let words = Uniform::new_inclusive(1usize, 12);

            info!(
                "worker={} started sender={} target_messages={:?}",
                worker_index, sender, messages_target
            );

            let mut sent: u64 = 0;
            let mut failed: u64 = 0;
            loop {
                if let Some(limit) = messages_target {
                    if sent >= limit {
                        break;
                    }
                }

                let word_count = words.sample(&mut rng);
                let text = random_text(&mut rng, word_count);
                let message = format!("[{sender} #{sent}] {text}");

                match client
                    .post(&endpoint)
                    .form(&[("message", message.as_str())])
                    .send()
                    .await
                {
                    Ok(resp) if resp.status().is_success() => {}
                    Ok(resp) => {
                        failed += 1;
                        warn!("worker={} unexpected status {}", worker_index, resp.status());
                    }
                    Err(e) => {
                        failed += 1;
                        error!("worker={} HTTP send error: {e}", worker_index);
                    }
                }

                sent += 1;
                if sent % 1000 == 0 {
                    info!(
                        "worker={} sender={} sent={} failed={}",
                        worker_index, sender, sent, failed
                    );
                }

                tokio::time::sleep(sleep_duration).await;
            }

            info!(
                "worker={} finished total_sent={} failed={}",
                worker_index, sent, failed
            );
        }));
    }

    if args.messages.is_none() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { info!("Ctrl-C received, shutting down"); }
        }
        for h in &handles {
            h.abort();
        }
    }

    for h in handles {
        let _ = h.await;
    }

    info!("submit daemon exiting");
    Ok(())
}

fn random_text(rng: &mut StdRng, words: usize) -> String {
    let lengths = Uniform::new_inclusive(2usize, 9);
    (0..words)
        .map(|_| {
            let len = lengths.sample(rng);
            Alphanumeric
                .sample_iter(&mut *rng)
                .take(len)
                .map(char::from)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn deterministic_uuid(rng: &mut StdRng) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    bytes[6] = (bytes[6] & 0x0F) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3F) | 0x80; // variant RFC4122
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sender() {
        let a = deterministic_uuid(&mut StdRng::seed_from_u64(7));
        let b = deterministic_uuid(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn random_text_has_requested_word_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = random_text(&mut rng, 5);
        assert_eq!(text.split(' ').count(), 5);
        assert!(!text.is_empty());
    }
}
