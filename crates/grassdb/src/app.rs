use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use grassdb_core::{
    ConsoleState, NodeDriver, ReadSubmission, WriteSubmission, run_read, run_write,
};
use log::debug;
use tokio::sync::mpsc;

use crate::event::{Completion, Event};

/// Finished requests older than this are dropped from the tracker.
const COMPLETED_REQUEST_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    NodeUrl,
    WriteKey,
    WriteValue,
    SearchKey,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::NodeUrl,
        Focus::WriteKey,
        Focus::WriteValue,
        Focus::SearchKey,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct App {
    pub console: ConsoleState,
    pub focus: Focus,
    pub should_quit: bool,
    driver: Arc<dyn NodeDriver>,
    events: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        node_url: impl Into<String>,
        driver: Arc<dyn NodeDriver>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            console: ConsoleState::new(node_url),
            focus: Focus::WriteKey,
            should_quit: false,
            driver,
            events,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Completed(completion) => self.apply(completion),
            Event::Tick => self
                .console
                .requests_mut()
                .cleanup_completed(COMPLETED_REQUEST_TTL),
            Event::Resize => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_field_mut().push(c);
            }
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::NodeUrl => &mut self.console.node_url,
            Focus::WriteKey => &mut self.console.write.key,
            Focus::WriteValue => &mut self.console.write.value,
            Focus::SearchKey => &mut self.console.read.search_key,
        }
    }

    fn submit(&mut self) {
        match self.focus {
            Focus::NodeUrl => self.focus = Focus::WriteKey,
            Focus::WriteKey | Focus::WriteValue => {
                if let Some(submission) = self.console.submit_write() {
                    self.dispatch_write(submission);
                } else if self.console.write.key.is_empty() {
                    self.focus = Focus::WriteKey;
                } else {
                    self.focus = Focus::WriteValue;
                }
            }
            Focus::SearchKey => {
                if let Some(submission) = self.console.submit_read() {
                    self.dispatch_read(submission);
                }
            }
        }
    }

    fn dispatch_write(&self, submission: WriteSubmission) {
        let driver = self.driver.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = run_write(driver.as_ref(), &submission).await;
            if events
                .send(Event::Completed(Completion::Write(submission, outcome)))
                .is_err()
            {
                debug!("Console closed before write completed");
            }
        });
    }

    fn dispatch_read(&self, submission: ReadSubmission) {
        let driver = self.driver.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = run_read(driver.as_ref(), &submission).await;
            if events
                .send(Event::Completed(Completion::Read(submission, outcome)))
                .is_err()
            {
                debug!("Console closed before read completed");
            }
        });
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Write(submission, outcome) => {
                self.console.finish_write(&submission, outcome);
            }
            Completion::Read(submission, outcome) => {
                self.console.finish_read(&submission, outcome);
            }
        }
    }
}
