//! Event plumbing for the console.
//!
//! Terminal input, periodic ticks and request completions all arrive on one
//! channel, so the UI loop is the only owner of console state.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use grassdb_core::{GetResponse, NodeError, ReadSubmission, SetResponse, WriteSubmission};
use tokio::sync::mpsc;
use tokio::time::interval;

/// A request that finished, successfully or not.
#[derive(Debug)]
pub enum Completion {
    Write(WriteSubmission, Result<SetResponse, NodeError>),
    Read(ReadSubmission, Result<GetResponse, NodeError>),
}

#[derive(Debug)]
pub enum Event {
    /// Periodic tick for housekeeping and redraws.
    Tick,
    Key(KeyEvent),
    Resize,
    Completed(Completion),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Spawns a tick generator and a blocking reader for terminal input.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tick_tx = tx.clone();
        tokio::spawn(async move {
            let mut ticker = interval(tick_rate);
            loop {
                ticker.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        let input_tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => {}
                    Ok(false) => {
                        if input_tx.is_closed() {
                            break;
                        }
                        continue;
                    }
                    Err(e) => {
                        log::error!("Terminal input poll failed: {}", e);
                        break;
                    }
                }

                let event = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Resize(..)) => Event::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Terminal input read failed: {}", e);
                        break;
                    }
                };

                if input_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for request completions.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Returns `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
