use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::events::{TableEvent, parse_command};

/// Read commands from stdin and forward them as events. End of input quits.
pub async fn stdin_io(
    events_tx: AsyncSender<TableEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            let _ = events_tx.send(TableEvent::Quit).await;
            break;
        };

        match parse_command(&line) {
            Ok(event) => {
                let quit = event == TableEvent::Quit;
                events_tx.send(event).await?;
                if quit {
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}
