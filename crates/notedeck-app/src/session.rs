use kanal::{AsyncReceiver, AsyncSender};
use notedeck_core::{MarkingStore, MarkingTag, TableViewController};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{TableEvent, event_loop};
use crate::io::stdin_io;

/// Channel and task wiring of an interactive table
pub struct TableSession {
    events: (AsyncSender<TableEvent>, AsyncReceiver<TableEvent>),
    cancel_token: CancellationToken,
}

impl TableSession {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(64),
            cancel_token: CancellationToken::new(),
        }
    }

    #[cfg(test)]
    pub fn sender(&self) -> AsyncSender<TableEvent> {
        self.events.0.clone()
    }

    pub fn spawn_tasks<M, S>(
        &self,
        controller: TableViewController<M, S>,
        read_stdin: bool,
    ) -> JoinSet<anyhow::Result<()>>
    where
        M: MarkingTag,
        S: MarkingStore<M> + 'static,
    {
        let mut tasks = JoinSet::new();

        tasks.spawn(event_loop(
            controller,
            self.events.1.clone(),
            self.cancel_token.child_token(),
        ));

        if read_stdin {
            tasks.spawn(stdin_io(self.events.0.clone(), self.cancel_token.child_token()));
        }

        tasks
    }

    /// Run until the table loop ends; errors of any task are logged
    pub async fn run<M, S>(&self, controller: TableViewController<M, S>) -> anyhow::Result<()>
    where
        M: MarkingTag,
        S: MarkingStore<M> + 'static,
    {
        let mut tasks = self.spawn_tasks(controller, true);

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("table task failed: {e}"),
                Err(e) => tracing::error!("table task panicked: {e}"),
            }
            // Either task ending ends the session
            self.shutdown();
        }

        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Default for TableSession {
    fn default() -> Self {
        Self::new()
    }
}
