use coddy_core::Clock;
use coddy_core::model::{
    CHAT_FAILURE_MESSAGE, ChatAnswer, ChatMessage, MessageId, WELCOME_MESSAGE,
};
use services::{ApiError, InFlight, InFlightGuard, RequestKey};

use super::markdown_vm::markdown_to_html;
use super::time_fmt::format_message_time;

const SEND_OPERATION: &str = "chat.ask";

/// A question accepted for sending. Hold it until the answer arrives.
#[derive(Debug)]
pub struct PendingSend {
    pub question: String,
    _guard: InFlightGuard,
}

/// Conversation state of one chat view.
#[derive(Debug, Clone)]
pub struct ChatVm {
    messages: Vec<ChatMessage>,
    loading: bool,
    next_id: u64,
    clock: Clock,
    inflight: InFlight,
}

impl ChatVm {
    /// A conversation seeded with the assistant's welcome message.
    #[must_use]
    pub fn new(clock: Clock, inflight: InFlight) -> Self {
        let mut vm = Self {
            messages: Vec::new(),
            loading: false,
            next_id: 1,
            clock,
            inflight,
        };
        let id = vm.allocate_id();
        vm.messages
            .push(ChatMessage::assistant(id, WELCOME_MESSAGE, clock.now()));
        vm
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Append the user's message and mark the view loading.
    ///
    /// Blank input and sends while an answer is pending are ignored.
    pub fn begin_send(&mut self, input: &str) -> Option<PendingSend> {
        if input.trim().is_empty() || self.loading {
            return None;
        }
        let guard = self
            .inflight
            .try_begin(RequestKey::new(SEND_OPERATION, "send"))?;

        let id = self.allocate_id();
        self.messages
            .push(ChatMessage::user(id, input, self.clock.now()));
        self.loading = true;
        Some(PendingSend {
            question: input.to_owned(),
            _guard: guard,
        })
    }

    /// Append the answer, or the failure notice, and clear `loading`.
    pub fn finish_send(&mut self, pending: PendingSend, result: Result<ChatAnswer, ApiError>) {
        let content = match result {
            Ok(answer) => answer.answer,
            Err(_) => CHAT_FAILURE_MESSAGE.to_owned(),
        };
        let id = self.allocate_id();
        self.messages
            .push(ChatMessage::assistant(id, content, self.clock.now()));
        self.loading = false;
        drop(pending);
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// One rendered chat bubble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatBubbleVm {
    pub id: u64,
    pub from_user: bool,
    pub author: &'static str,
    /// Sanitized HTML for assistant messages, plain text for user messages.
    pub body: String,
    pub time: String,
}

#[must_use]
pub fn map_chat_bubbles(messages: &[ChatMessage]) -> Vec<ChatBubbleVm> {
    messages
        .iter()
        .map(|message| {
            let from_user = message.is_user();
            ChatBubbleVm {
                id: message.id.value(),
                from_user,
                author: if from_user { "Kamu" } else { "Coddy" },
                body: if from_user {
                    message.content.clone()
                } else {
                    markdown_to_html(&message.content)
                },
                time: format_message_time(message.timestamp),
            }
        })
        .collect()
}
