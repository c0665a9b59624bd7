use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Align, Color32, Key, Layout, RichText, Ui};
use tracing::{debug, warn};

use crate::backend::SharedBackend;

const GREETING: &str = "Ask me about the codebase: what a function does, who calls it, \
                        or what might break if it changes.";
const CONNECTION_ERROR: &str = "Connection error.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

pub(in crate::app) struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pending: Option<Receiver<Option<String>>>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Assistant,
                text: GREETING.to_owned(),
            }],
            input: String::new(),
            pending: None,
        }
    }
}

impl ChatState {
    pub(in crate::app) fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Moves the trimmed input into the transcript. Blank input, or input
    /// while an answer is outstanding, is ignored.
    fn take_question(&mut self) -> Option<String> {
        if self.is_waiting() {
            return None;
        }

        let question = self.input.trim().to_owned();
        if question.is_empty() {
            return None;
        }

        self.input.clear();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: question.clone(),
        });
        Some(question)
    }

    fn record_answer(&mut self, answer: Option<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: answer.unwrap_or_else(|| CONNECTION_ERROR.to_owned()),
        });
    }

    pub(in crate::app) fn submit(&mut self, backend: &SharedBackend) {
        let Some(question) = self.take_question() else {
            return;
        };

        debug!(chars = question.len(), "sending chat question");
        let (tx, rx) = mpsc::channel();
        let backend = SharedBackend::clone(backend);
        thread::spawn(move || {
            let answer = match backend.ask(&question) {
                Ok(response) => Some(response.response),
                Err(error) => {
                    warn!(error = %format!("{error:#}"), "query service failed");
                    None
                }
            };
            let _ = tx.send(answer);
        });
        self.pending = Some(rx);
    }

    pub(in crate::app) fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.take() else {
            return false;
        };

        match rx.try_recv() {
            Ok(answer) => self.record_answer(answer),
            Err(TryRecvError::Empty) => {
                self.pending = Some(rx);
                return true;
            }
            Err(TryRecvError::Disconnected) => self.record_answer(None),
        }
        false
    }

    pub(in crate::app) fn draw(&mut self, ui: &mut Ui, backend: &SharedBackend) {
        ui.heading("Ask the codebase");
        ui.separator();

        let input_height = 64.0;
        egui::ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height((ui.available_height() - input_height).max(80.0))
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &self.messages {
                    draw_bubble(ui, message);
                }
                if self.is_waiting() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Analyzing...").italics());
                    });
                }
            });

        ui.separator();
        let mut send = false;
        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("Ask a question")
                    .desired_width(ui.available_width() - 56.0),
            );
            if field.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                send = true;
            }
            let can_send = !self.is_waiting() && !self.input.trim().is_empty();
            if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
                send = true;
            }
        });

        if send {
            self.submit(backend);
        }
    }
}

fn draw_bubble(ui: &mut Ui, message: &ChatMessage) {
    let (layout, fill) = match message.role {
        ChatRole::User => (
            Layout::right_to_left(Align::TOP),
            Color32::from_rgb(0x0A, 0x84, 0xFF),
        ),
        ChatRole::Assistant => (Layout::left_to_right(Align::TOP), Color32::from_gray(44)),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(260.0);
                ui.label(RichText::new(message.text.as_str()).color(Color32::WHITE));
            });
    });
    ui.add_space(4.0);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::backend::fake::FakeBackend;

    fn wait(chat: &mut ChatState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while chat.poll() {
            assert!(Instant::now() < deadline, "query worker never reported");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_starts_with_greeting() {
        let chat = ChatState::default();
        assert_eq!(chat.messages.len(), 1);
        assert_eq!(chat.messages[0].role, ChatRole::Assistant);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut chat = ChatState::default();
        chat.input = "   ".to_owned();
        assert!(chat.take_question().is_none());
        assert_eq!(chat.messages.len(), 1);
    }

    #[test]
    fn test_question_is_trimmed_and_input_cleared() {
        let mut chat = ChatState::default();
        chat.input = "  who calls login?  ".to_owned();
        assert_eq!(chat.take_question().as_deref(), Some("who calls login?"));
        assert!(chat.input.is_empty());
        assert_eq!(chat.messages[1].role, ChatRole::User);
    }

    #[test]
    fn test_answer_is_appended() {
        let backend: SharedBackend = Arc::new(FakeBackend {
            answer: Some("login is called by a::f1".to_owned()),
            ..Default::default()
        });
        let mut chat = ChatState::default();
        chat.input = "who calls login?".to_owned();
        chat.submit(&backend);
        assert!(chat.is_waiting());

        wait(&mut chat);
        let last = chat.messages.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.text, "login is called by a::f1");
    }

    #[test]
    fn test_failure_shows_connection_error() {
        let backend: SharedBackend = Arc::new(FakeBackend::default());
        let mut chat = ChatState::default();
        chat.input = "anything".to_owned();
        chat.submit(&backend);

        wait(&mut chat);
        assert_eq!(chat.messages.last().unwrap().text, CONNECTION_ERROR);
    }
}
