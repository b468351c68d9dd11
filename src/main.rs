use anyhow::Context;
use order_bot::conversation::Envelope;
use order_bot::lifecycle::{setup_tracing, BotConfig, OrderSystem};
use order_bot::response;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn, Instrument};

const FAILURE_REPLY: &str = "Sorry, something went wrong on our side. Please try again shortly.";

/// Reads one JSON envelope per line on stdin and writes one reply per message on stdout.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = BotConfig::from_env().context("loading configuration")?;
    let system = OrderSystem::new(config).context("starting order system")?;
    info!("Reading events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let envelope: Envelope = match serde_json::from_str(&line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "Skipping malformed envelope");
                continue;
            }
        };

        for (event, display_name) in envelope.into_events() {
            let span = tracing::info_span!("event", id = %event.id);
            let reply = async {
                match system.dispatcher.dispatch(&event, &display_name).await {
                    Ok(handled) => handled.reply,
                    Err(e) => {
                        error!(error = %e, "Event handling failed");
                        response::text(&event.from, FAILURE_REPLY)
                    }
                }
            }
            .instrument(span)
            .await;

            let mut out = serde_json::to_vec(&reply)?;
            out.push(b'\n');
            stdout.write_all(&out).await?;
            stdout.flush().await?;
        }
    }

    system.shutdown().await.map_err(anyhow::Error::msg)?;
    info!("Input closed, exiting");
    Ok(())
}
