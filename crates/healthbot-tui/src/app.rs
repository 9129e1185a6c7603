//! Application state and update logic for the HealthBot TUI.

use healthbot_engine::{
    CompletionError, Config, Conversation, Message, Settled, SubmitRejected, Transport,
};
use tracing::{debug, info};

use crate::conversation::{input_placeholder, TranscriptScroll, SCROLL_STEP};
use crate::event::Action;
use crate::theme::Theme;
use crate::widgets::{HeaderStatus, TextInputState};

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Message list and exchange phase.
    pub conversation: Conversation,
    /// Message being composed.
    pub input: TextInputState,
    /// Transcript scroll position.
    pub scroll: TranscriptScroll,
    /// Animation counter, advanced on every tick event.
    pub tick: u64,
    pub theme: Theme,
    /// Model name, or the proxy endpoint, for the header.
    pub model_label: String,
    /// Variable the credential is read from, for the unconfigured hint.
    pub api_key_env: String,
    /// Request payload waiting to be sent by the event loop.
    outbound: Option<Vec<Message>>,
}

impl App {
    /// Create the app for a resolved configuration.
    pub fn new(config: &Config) -> Self {
        let model_label = match config.transport {
            Transport::Direct => config.model.clone(),
            Transport::Proxy => format!("proxy {}", config.endpoint_url()),
        };

        Self {
            should_quit: false,
            conversation: Conversation::from_config(config),
            input: TextInputState::new(),
            scroll: TranscriptScroll::new(),
            tick: 0,
            theme: Theme::from_env(),
            model_label,
            api_key_env: config.api_key_env.clone(),
            outbound: None,
        }
    }

    /// Create a configured app with short canned text for testing.
    pub fn new_for_test() -> Self {
        let mut config = Config {
            system_prompt: "You are HealthBot.".into(),
            greeting: "Hello! How can I help you today?".into(),
            ..Config::default()
        };
        config.api_key = Some("test-key".into());

        let mut app = Self::new(&config);
        app.theme = Theme::mocha();
        app
    }

    /// Handle an action from a key or mouse event.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => {
                let _ = self.submit();
            }
            Action::ScrollUp => self.scroll.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.scroll.scroll_down(SCROLL_STEP),
            Action::PageUp => self.scroll.page_up(),
            Action::PageDown => self.scroll.page_down(),
            Action::None => {}
            edit => {
                if self.input_enabled() {
                    self.edit(edit);
                }
            }
        }
    }

    fn edit(&mut self, action: Action) {
        match action {
            Action::Insert(ch) => self.input.insert(ch),
            Action::Newline => self.input.insert('\n'),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            _ => {}
        }
    }

    /// Whether the input accepts typing.
    pub fn input_enabled(&self) -> bool {
        self.conversation.is_configured() && !self.conversation.is_in_flight()
    }

    /// Submit the input buffer.
    ///
    /// On success the buffer is cleared, the transcript is pinned to the
    /// bottom and the request payload is queued for [`take_outbound`](Self::take_outbound).
    /// A rejected submission changes nothing.
    pub fn submit(&mut self) -> Result<(), SubmitRejected> {
        match self.conversation.submit(self.input.content()) {
            Ok(payload) => {
                self.input.clear();
                self.scroll.pin_to_bottom();
                self.outbound = Some(payload);
                Ok(())
            }
            Err(rejected) => {
                debug!(%rejected, "submit ignored");
                Err(rejected)
            }
        }
    }

    /// Take the queued request payload, if any.
    pub fn take_outbound(&mut self) -> Option<Vec<Message>> {
        self.outbound.take()
    }

    /// Record the outcome of the in-flight request.
    pub fn settle(&mut self, outcome: Result<Message, CompletionError>) {
        let Some(failed) = self.conversation.settle(outcome).map(Settled::is_failure) else {
            return;
        };
        self.scroll.pin_to_bottom();
        info!(failed, messages = self.conversation.len(), "exchange settled");
    }

    /// Advance the thinking animation.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn header_status(&self) -> HeaderStatus {
        if !self.conversation.is_configured() {
            HeaderStatus::NotConfigured
        } else if self.conversation.is_in_flight() {
            HeaderStatus::Waiting
        } else {
            HeaderStatus::Ready
        }
    }

    /// Placeholder for the input bar in the current state.
    pub fn placeholder(&self) -> String {
        input_placeholder(
            self.conversation.is_configured(),
            self.conversation.is_in_flight(),
            &self.api_key_env,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use healthbot_engine::{CompletionClient, Role};

    struct MockClient {
        reply: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(&self, _messages: &[Message]) -> Result<Message, CompletionError> {
            match self.reply {
                Ok(content) => Ok(Message::assistant(content)),
                Err(e) => Err(CompletionError::Unavailable(e.into())),
            }
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_action(Action::Insert(ch));
        }
    }

    /// Drive one request through `client` the way the event loop does.
    async fn run_outbound(app: &mut App, client: &dyn CompletionClient) {
        let payload = app.take_outbound().expect("a request should be queued");
        let outcome = client.complete(&payload).await;
        app.settle(outcome);
    }

    #[test]
    fn test_app_new() {
        let app = App::new_for_test();
        assert!(!app.should_quit);
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.header_status(), HeaderStatus::Ready);
        assert_eq!(app.model_label, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_quit_action() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_and_newline() {
        let mut app = App::new_for_test();
        type_text(&mut app, "line");
        app.handle_action(Action::Newline);
        type_text(&mut app, "two");
        assert_eq!(app.input.content(), "line\ntwo");
    }

    #[test]
    fn test_blank_submit_changes_nothing() {
        let mut app = App::new_for_test();
        type_text(&mut app, "   ");
        app.handle_action(Action::Submit);

        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.input.content(), "   ");
        assert!(app.take_outbound().is_none());
    }

    #[test]
    fn test_submit_queues_payload_and_clears_input() {
        let mut app = App::new_for_test();
        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);

        assert!(app.input.is_empty());
        assert_eq!(app.header_status(), HeaderStatus::Waiting);
        let payload = app.take_outbound().unwrap();
        assert_eq!(payload.len(), 3);
        assert_eq!(payload[0].role, Role::System);
        assert_eq!(payload[2], Message::user("hello"));
    }

    #[test]
    fn test_typing_ignored_while_in_flight() {
        let mut app = App::new_for_test();
        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);

        type_text(&mut app, "more");
        app.handle_action(Action::Submit);
        assert!(app.input.is_empty());
        assert_eq!(app.conversation.len(), 3);
    }

    #[test]
    fn test_unconfigured_app_rejects_input() {
        let config = Config::default();
        let mut app = App::new(&config);
        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);

        assert!(app.input.is_empty());
        assert_eq!(app.conversation.len(), 2);
        assert_eq!(app.header_status(), HeaderStatus::NotConfigured);
        assert!(app.placeholder().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_proxy_label() {
        let mut config = Config::default();
        config.use_proxy("http://localhost:3000");
        let app = App::new(&config);
        assert_eq!(app.model_label, "proxy http://localhost:3000/api/chat");
        assert!(app.input_enabled());
    }

    #[test]
    fn test_scroll_actions_and_repin_on_settle() {
        let mut app = App::new_for_test();
        app.scroll.resolve(100, 10);
        app.handle_action(Action::PageUp);
        assert!(!app.scroll.is_following());

        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);
        assert!(app.scroll.is_following());

        app.handle_action(Action::ScrollUp);
        app.settle(Ok(Message::assistant("Hi")));
        assert!(app.scroll.is_following());
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let mut app = App::new_for_test();
        let client = MockClient { reply: Ok("Hi there") };

        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);
        run_outbound(&mut app, &client).await;

        assert_eq!(app.conversation.len(), 4);
        assert_eq!(app.conversation.last().unwrap().content, "Hi there");
        assert!(!app.conversation.is_in_flight());
        assert!(app.input_enabled());
    }

    #[tokio::test]
    async fn test_failed_exchange_appends_error() {
        let mut app = App::new_for_test();
        let client = MockClient { reply: Err("error sending request") };

        type_text(&mut app, "hello");
        app.handle_action(Action::Submit);
        run_outbound(&mut app, &client).await;

        let visible: Vec<&Message> = app.conversation.visible().collect();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[2].role, Role::Assistant);
        assert_eq!(
            visible[2].content,
            "Sorry, something went wrong: error sending request"
        );
        assert!(!app.conversation.is_in_flight());
        assert!(app.conversation.is_failure_at(3));
    }

    #[test]
    fn test_settle_without_request_keeps_scroll() {
        let mut app = App::new_for_test();
        app.scroll.resolve(100, 10);
        app.handle_action(Action::PageUp);

        app.settle(Ok(Message::assistant("stray")));
        assert_eq!(app.conversation.len(), 2);
        assert!(!app.scroll.is_following());
    }
}
