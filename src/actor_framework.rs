use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A screen whose state is owned by one task and changed only by commands.
#[async_trait]
pub trait Page: Send + 'static {
    type Command: Send + Debug + 'static;
    type Outcome: Send + Debug + 'static;
    /// Snapshot handed to callers after every interaction.
    type View: Clone + Send + Debug + 'static;

    fn name(&self) -> &'static str;

    /// Fetches the page's data. Failures are kept in the page state.
    async fn load(&mut self);

    async fn handle(&mut self, command: Self::Command) -> Self::Outcome;

    fn view(&self) -> Self::View;

    /// Runs before every request is served. Pages derived from the wall
    /// clock bring themselves up to date here.
    fn sync(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("Page closed")]
    Closed,
    #[error("Page dropped")]
    Dropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub enum PageRequest<P: Page> {
    Load {
        respond_to: Response<P::View>,
    },
    Command {
        command: P::Command,
        respond_to: Response<P::Outcome>,
    },
    View {
        respond_to: Response<P::View>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR
// =============================================================================

pub struct PageActor<P: Page> {
    receiver: mpsc::Receiver<PageRequest<P>>,
    page: P,
}

impl<P: Page> PageActor<P> {
    pub fn new(buffer_size: usize, page: P) -> (Self, PageClient<P>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, page }, PageClient { sender })
    }

    /// Runs until every `PageClient` is dropped.
    pub async fn run(mut self) {
        let name = self.page.name();
        info!(page = name, "Page started");
        while let Some(msg) = self.receiver.recv().await {
            self.page.sync();
            match msg {
                PageRequest::Load { respond_to } => {
                    self.page.load().await;
                    let _ = respond_to.send(self.page.view());
                }
                PageRequest::Command { command, respond_to } => {
                    debug!(page = name, ?command, "Handling command");
                    let outcome = self.page.handle(command).await;
                    let _ = respond_to.send(outcome);
                }
                PageRequest::View { respond_to } => {
                    let _ = respond_to.send(self.page.view());
                }
            }
        }
        info!(page = name, "Page stopped");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct PageClient<P: Page> {
    sender: mpsc::Sender<PageRequest<P>>,
}

impl<P: Page> Clone for PageClient<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P: Page> PageClient<P> {
    pub fn new(sender: mpsc::Sender<PageRequest<P>>) -> Self {
        Self { sender }
    }

    pub async fn load(&self) -> Result<P::View, PageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PageRequest::Load { respond_to })
            .await
            .map_err(|_| PageError::Closed)?;
        response.await.map_err(|_| PageError::Dropped)
    }

    pub async fn send(&self, command: P::Command) -> Result<P::Outcome, PageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PageRequest::Command { command, respond_to })
            .await
            .map_err(|_| PageError::Closed)?;
        response.await.map_err(|_| PageError::Dropped)
    }

    pub async fn view(&self) -> Result<P::View, PageError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PageRequest::View { respond_to })
            .await
            .map_err(|_| PageError::Closed)?;
        response.await.map_err(|_| PageError::Dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        loads: u32,
        value: i64,
    }

    #[derive(Debug)]
    enum CounterCommand {
        Add(i64),
    }

    #[async_trait]
    impl Page for Counter {
        type Command = CounterCommand;
        type Outcome = i64;
        type View = (u32, i64);

        fn name(&self) -> &'static str {
            "counter"
        }

        async fn load(&mut self) {
            self.loads += 1;
        }

        async fn handle(&mut self, command: CounterCommand) -> i64 {
            match command {
                CounterCommand::Add(n) => {
                    self.value += n;
                    self.value
                }
            }
        }

        fn view(&self) -> (u32, i64) {
            (self.loads, self.value)
        }
    }

    #[tokio::test]
    async fn test_page_actor_serializes_commands() {
        let (actor, client) = PageActor::new(8, Counter::default());
        let handle = tokio::spawn(actor.run());

        assert_eq!(client.load().await, Ok((1, 0)));
        assert_eq!(client.send(CounterCommand::Add(5)).await, Ok(5));
        assert_eq!(client.send(CounterCommand::Add(-2)).await, Ok(3));
        assert_eq!(client.view().await, Ok((1, 3)));

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_page_reports_error() {
        let (actor, client) = PageActor::new(1, Counter::default());
        drop(actor);
        assert_eq!(client.view().await, Err(PageError::Closed));
    }
}
