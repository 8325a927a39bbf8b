//! Dispatcher - routes inbound chat actions through the conversation flows.
//!
//! The dispatcher owns the `chat → ConversationSession` table. For each
//! inbound action it:
//!
//! 1. Takes the chat's lock so one chat is handled one action at a time
//! 2. Loads the session (absent means idle) and runs the pure flow step
//! 3. Applies the outcome: saves or clears the session, commits requests,
//!    completes registrations
//! 4. Logs flow events and sends the replies
//!
//! Event-log and delivery failures are logged and never change the flow.

use std::sync::Arc;

use crate::domain::conversation::{
    manager, registration, texts, transfer, Action, ConversationSession, Keyboard, Outcome,
    QuickReply, Reply, Transition, UserEvent,
};
use crate::domain::foundation::{DomainError, TelegramId};
use crate::domain::user::SenderProfile;
use crate::ports::{
    ContentReader, EventLog, Messenger, RequestNotifier, RequestRepository, SessionStore,
    SessionStoreError, UserRepository,
};

use super::chat_locks::ChatLocks;
use super::registration::{
    CompleteRegistrationHandler, RegistrationError, StartOutcome, StartRegistrationHandler,
};
use super::submit_request::{SubmitError, SubmitRequestCommand, SubmitRequestHandler};

/// One inbound action with its sender.
#[derive(Debug, Clone)]
pub struct InboundUpdate {
    pub sender: SenderProfile,
    /// Chat the replies go to; equal to the sender id in private chats.
    pub chat: TelegramId,
    pub action: Action,
}

impl InboundUpdate {
    /// Update from a private chat, where chat id and sender id coincide.
    pub fn private(sender: SenderProfile, action: Action) -> Self {
        Self {
            chat: sender.telegram_id,
            sender,
            action,
        }
    }
}

/// Failure that prevented an action from being handled.
///
/// The user has already been sent a generic "try again" reply.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Session store failed: {0}")]
    Session(#[from] SessionStoreError),

    #[error("Identity lookup failed: {0}")]
    Identity(#[from] DomainError),
}

/// Entry point for every inbound chat action.
pub struct Dispatcher {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventLog>,
    content: Arc<dyn ContentReader>,
    sessions: Arc<dyn SessionStore>,
    messenger: Arc<dyn Messenger>,
    start: StartRegistrationHandler,
    complete: CompleteRegistrationHandler,
    submit: SubmitRequestHandler,
    locks: ChatLocks,
}

impl Dispatcher {
    pub fn new(
        users: Arc<dyn UserRepository>,
        requests: Arc<dyn RequestRepository>,
        events: Arc<dyn EventLog>,
        content: Arc<dyn ContentReader>,
        sessions: Arc<dyn SessionStore>,
        messenger: Arc<dyn Messenger>,
        notifier: Arc<dyn RequestNotifier>,
    ) -> Self {
        Self {
            start: StartRegistrationHandler::new(users.clone(), events.clone()),
            complete: CompleteRegistrationHandler::new(users.clone()),
            submit: SubmitRequestHandler::new(users.clone(), requests, events.clone(), notifier),
            users,
            events,
            content,
            sessions,
            messenger,
            locks: ChatLocks::new(),
        }
    }

    /// Handles one inbound action end to end.
    pub async fn dispatch(&self, update: InboundUpdate) -> Result<(), DispatchError> {
        let _guard = self.locks.acquire(update.chat).await;

        match self.route(&update).await {
            Ok(replies) => {
                self.deliver(update.chat, &replies).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, chat = %update.chat, "Failed to handle chat action");
                self.deliver(update.chat, &[Reply::new(texts::TRY_AGAIN, Keyboard::Keep)])
                    .await;
                Err(e)
            }
        }
    }

    async fn route(&self, update: &InboundUpdate) -> Result<Vec<Reply>, DispatchError> {
        let sender = update.sender.telegram_id;

        if update.action == Action::Start {
            // /start always abandons whatever flow was in progress
            self.sessions.clear(update.chat).await?;
            return self.handle_start(update).await;
        }

        let transition = match self.sessions.load(update.chat).await? {
            None => return self.handle_idle(update).await,
            Some(ConversationSession::Registration { step }) => {
                registration::advance(step, &update.action, sender)
            }
            Some(ConversationSession::Transfer { step, draft }) => {
                transfer::advance(step, draft, &update.action)
            }
            Some(ConversationSession::Manager { step, draft }) => {
                manager::advance(step, draft, &update.action)
            }
        };

        self.apply(update, transition).await
    }

    async fn handle_start(&self, update: &InboundUpdate) -> Result<Vec<Reply>, DispatchError> {
        match self.start.handle(&update.sender).await? {
            StartOutcome::AlreadyActive => {
                Ok(vec![Reply::new(texts::MAIN_MENU, Keyboard::MainMenu)])
            }
            StartOutcome::Blocked => Ok(vec![Reply::new(texts::BLOCKED, Keyboard::Remove)]),
            StartOutcome::Begin => self.apply(update, registration::begin()).await,
        }
    }

    /// No flow in progress: main-menu buttons, each gated on an active identity.
    async fn handle_idle(&self, update: &InboundUpdate) -> Result<Vec<Reply>, DispatchError> {
        let sender = update.sender.telegram_id;
        let has_access = self
            .users
            .find_by_telegram_id(sender)
            .await?
            .map(|user| user.has_access())
            .unwrap_or(false);

        if !has_access {
            tracing::debug!(telegram_id = %sender, "Idle action from user without access");
            return Ok(vec![Reply::new(texts::ACCESS_DENIED, Keyboard::Remove)]);
        }

        match update.action.quick_reply() {
            Some(QuickReply::OrderTransfer) => self.apply(update, transfer::start()).await,
            Some(QuickReply::ContactManager) => self.apply(update, manager::start()).await,
            Some(QuickReply::MenuPrograms) => {
                self.log_event(sender, &UserEvent::MenuOpened).await;
                Ok(vec![Reply::new(self.menu_text().await, Keyboard::MainMenu)])
            }
            Some(QuickReply::Rules) => {
                self.log_event(sender, &UserEvent::RulesOpened).await;
                Ok(vec![Reply::new(texts::RULES, Keyboard::MainMenu)])
            }
            Some(QuickReply::MyStatus) => {
                Ok(vec![Reply::new(texts::STATUS_PLACEHOLDER, Keyboard::MainMenu)])
            }
            Some(QuickReply::PromoCodes) => {
                Ok(vec![Reply::new(texts::PROMO_PLACEHOLDER, Keyboard::MainMenu)])
            }
            _ => Ok(vec![Reply::new(texts::MAIN_MENU, Keyboard::MainMenu)]),
        }
    }

    async fn menu_text(&self) -> String {
        match self.content.menu().await {
            Ok(sections) if !sections.is_empty() => texts::menu(&sections),
            Ok(_) => texts::MENU_UNAVAILABLE.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load menu content");
                texts::MENU_UNAVAILABLE.to_string()
            }
        }
    }

    /// Applies a flow step: session bookkeeping, commits, and replies.
    async fn apply(
        &self,
        update: &InboundUpdate,
        transition: Transition,
    ) -> Result<Vec<Reply>, DispatchError> {
        let sender = update.sender.telegram_id;
        let chat = update.chat;
        let Transition {
            outcome,
            mut replies,
            events,
        } = transition;

        for event in &events {
            self.log_event(sender, event).await;
        }

        match outcome {
            Outcome::Continue(session) => {
                tracing::debug!(chat = %chat, step = %session.step_name(), "Flow continues");
                self.sessions.save(chat, &session).await?;
            }
            Outcome::Cancelled | Outcome::Rejected(_) => {
                tracing::debug!(chat = %chat, "Flow ended");
                self.sessions.clear(chat).await?;
            }
            Outcome::Submit(details) => {
                let command = SubmitRequestCommand {
                    telegram_id: sender,
                    details,
                };
                match self.submit.handle(command).await {
                    Ok(request) => {
                        self.sessions.clear(chat).await?;
                        replies.push(Reply::new(
                            texts::submitted(request.kind, request.id),
                            Keyboard::MainMenu,
                        ));
                    }
                    Err(SubmitError::IdentityNotFound(id)) => {
                        tracing::warn!(telegram_id = %id, "Commit without identity, flow aborted");
                        self.sessions.clear(chat).await?;
                        replies.push(Reply::new(texts::IDENTITY_MISSING, Keyboard::MainMenu));
                    }
                    Err(SubmitError::AccessRevoked(id)) => {
                        tracing::info!(telegram_id = %id, "Commit by user without access, flow aborted");
                        self.sessions.clear(chat).await?;
                        replies.push(Reply::new(texts::ACCESS_DENIED, Keyboard::Remove));
                    }
                    Err(SubmitError::Persistence(e)) => {
                        // Session stays at the confirmation step so the user can retry
                        tracing::error!(error = %e, telegram_id = %sender, "Failed to store request");
                        replies.push(Reply::new(texts::SUBMIT_FAILED, Keyboard::Confirm));
                    }
                }
            }
            Outcome::Activate { phone } => {
                self.sessions.clear(chat).await?;
                match self.complete.handle(sender, &phone).await {
                    Ok(user) => {
                        let phone = user.phone.unwrap_or(phone);
                        replies.push(Reply::new(
                            texts::registration_complete(&phone),
                            Keyboard::MainMenu,
                        ));
                    }
                    Err(RegistrationError::Blocked(_)) => {
                        replies.push(Reply::new(texts::BLOCKED, Keyboard::Remove));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, telegram_id = %sender, "Failed to complete registration");
                        replies.push(Reply::new(texts::REGISTRATION_FAILED, Keyboard::Remove));
                    }
                }
            }
        }

        Ok(replies)
    }

    async fn log_event(&self, telegram_id: TelegramId, event: &UserEvent) {
        if let Err(e) = self.events.record(telegram_id, event).await {
            tracing::warn!(
                error = %e,
                telegram_id = %telegram_id,
                event_type = event.event_type(),
                "Failed to log user event"
            );
        }
    }

    async fn deliver(&self, chat: TelegramId, replies: &[Reply]) {
        for reply in replies {
            if let Err(e) = self.messenger.send(chat, reply).await {
                tracing::warn!(error = %e, chat = %chat, "Failed to deliver reply");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryEventLog, InMemoryRequestRepository, InMemoryUserRepository, RecordingMessenger,
        StaticContentReader,
    };
    use crate::adapters::session::InMemorySessionStore;
    use crate::domain::content::{ContentCategory, ContentItem, MenuSection};
    use crate::domain::conversation::{TransferDraft, TransferField, TransferStep};
    use crate::domain::foundation::{CategoryId, UserId};
    use crate::domain::request::RequestStatus;
    use crate::domain::user::{UserIdentity, UserStatus};
    use crate::ports::NotificationReport;
    use crate::domain::request::SubmittedRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const SENDER: TelegramId = TelegramId::new(1001);

    #[derive(Default)]
    struct CountingNotifier {
        notified: Mutex<usize>,
    }

    #[async_trait]
    impl RequestNotifier for CountingNotifier {
        async fn notify_new_request(&self, _request: &SubmittedRequest) -> NotificationReport {
            *self.notified.lock().unwrap() += 1;
            NotificationReport {
                delivered: 1,
                failed: 0,
            }
        }
    }

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        requests: Arc<InMemoryRequestRepository>,
        events: Arc<InMemoryEventLog>,
        sessions: Arc<InMemorySessionStore>,
        messenger: Arc<RecordingMessenger>,
        notifier: Arc<CountingNotifier>,
        dispatcher: Dispatcher,
    }

    fn fixture_with_menu(sections: Vec<MenuSection>) -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let requests = Arc::new(InMemoryRequestRepository::new());
        let events = Arc::new(InMemoryEventLog::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let messenger = Arc::new(RecordingMessenger::new());
        let notifier = Arc::new(CountingNotifier::default());
        let dispatcher = Dispatcher::new(
            users.clone(),
            requests.clone(),
            events.clone(),
            Arc::new(StaticContentReader::new(sections)),
            sessions.clone(),
            messenger.clone(),
            notifier.clone(),
        );
        Fixture {
            users,
            requests,
            events,
            sessions,
            messenger,
            notifier,
            dispatcher,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_menu(vec![])
    }

    impl Fixture {
        async fn send(&self, action: Action) {
            self.dispatcher
                .dispatch(InboundUpdate::private(SenderProfile::bare(SENDER), action))
                .await
                .unwrap();
        }

        async fn text(&self, text: &str) {
            self.send(Action::Text(text.to_string())).await;
        }

        async fn press(&self, button: QuickReply) {
            self.text(button.label()).await;
        }

        async fn last_reply(&self) -> Reply {
            self.messenger.last_to(SENDER).await.expect("a reply was sent")
        }

        async fn add_active_user(&self) {
            let mut user = UserIdentity::register(UserId::new(1), &SenderProfile::bare(SENDER));
            user.status = UserStatus::Active;
            user.phone = Some("+79001234567".to_string());
            self.users.insert(user).await;
        }
    }

    mod access_gate {
        use super::*;

        #[tokio::test]
        async fn unknown_user_cannot_enter_flows() {
            let f = fixture();
            f.press(QuickReply::OrderTransfer).await;

            assert_eq!(f.last_reply().await.text, texts::ACCESS_DENIED);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
        }

        #[tokio::test]
        async fn pending_user_cannot_open_menu() {
            let f = fixture();
            f.send(Action::Start).await;
            f.sessions.clear(SENDER).await.unwrap();

            f.press(QuickReply::ContactManager).await;

            assert_eq!(f.last_reply().await.text, texts::ACCESS_DENIED);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
        }

        #[tokio::test]
        async fn unmatched_text_shows_main_menu() {
            let f = fixture();
            f.add_active_user().await;

            f.text("hello?").await;

            let reply = f.last_reply().await;
            assert_eq!(reply.text, texts::MAIN_MENU);
            assert_eq!(reply.keyboard, Keyboard::MainMenu);
        }

        #[tokio::test]
        async fn active_user_enters_transfer_flow() {
            let f = fixture();
            f.add_active_user().await;

            f.press(QuickReply::OrderTransfer).await;

            assert_eq!(
                f.sessions.load(SENDER).await.unwrap(),
                Some(ConversationSession::Transfer {
                    step: TransferStep::Entering(TransferField::Address),
                    draft: TransferDraft::default(),
                })
            );
            assert_eq!(f.events.event_types(SENDER).await, vec!["transfer_requested"]);
        }
    }

    mod registration_flow {
        use super::*;

        #[tokio::test]
        async fn full_registration_activates_user() {
            let f = fixture();

            f.send(Action::Start).await;
            assert_eq!(f.last_reply().await.keyboard, Keyboard::Age);

            f.press(QuickReply::AgeConfirm).await;
            f.press(QuickReply::ConsentAccept).await;
            assert_eq!(f.last_reply().await.keyboard, Keyboard::Phone);

            f.send(Action::Contact(crate::domain::conversation::ContactShare {
                phone_number: "+79001234567".to_string(),
                owner: Some(SENDER),
            }))
            .await;

            let user = f.users.get(SENDER).await.unwrap();
            assert_eq!(user.status, UserStatus::Active);
            assert_eq!(user.phone.as_deref(), Some("+79001234567"));
            assert_eq!(f.last_reply().await.keyboard, Keyboard::MainMenu);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
            assert_eq!(
                f.events.event_types(SENDER).await,
                vec![
                    "bot_start",
                    "age_confirmed",
                    "consent_accepted",
                    "phone_captured"
                ]
            );
        }

        #[tokio::test]
        async fn block_during_registration_survives_contact_share() {
            let f = fixture();
            f.send(Action::Start).await;
            f.press(QuickReply::AgeConfirm).await;
            f.press(QuickReply::ConsentAccept).await;

            let mut user = f.users.get(SENDER).await.unwrap();
            user.status = UserStatus::BlockedAdmin;
            f.users.insert(user).await;

            f.send(Action::Contact(crate::domain::conversation::ContactShare {
                phone_number: "+79001234567".to_string(),
                owner: Some(SENDER),
            }))
            .await;

            let user = f.users.get(SENDER).await.unwrap();
            assert_eq!(user.status, UserStatus::BlockedAdmin);
            assert_eq!(user.phone, None);
            assert_eq!(f.last_reply().await.text, texts::BLOCKED);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
        }

        #[tokio::test]
        async fn start_for_active_user_skips_registration() {
            let f = fixture();
            f.add_active_user().await;

            f.send(Action::Start).await;

            assert_eq!(f.last_reply().await.text, texts::MAIN_MENU);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
        }

        #[tokio::test]
        async fn underage_ends_without_access() {
            let f = fixture();
            f.send(Action::Start).await;
            f.press(QuickReply::AgeDeny).await;

            assert_eq!(f.last_reply().await.text, texts::AGE_REJECTED);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
            assert!(!f.users.get(SENDER).await.unwrap().has_access());
        }

        #[tokio::test]
        async fn start_mid_flow_discards_draft() {
            let f = fixture();
            f.add_active_user().await;
            f.press(QuickReply::OrderTransfer).await;
            f.text("Lenina 10").await;

            f.send(Action::Start).await;

            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
            assert_eq!(f.last_reply().await.text, texts::MAIN_MENU);
        }
    }

    mod commit {
        use super::*;

        async fn fill_transfer(f: &Fixture) {
            f.press(QuickReply::OrderTransfer).await;
            f.text("Lenina 10").await;
            f.text("tomorrow").await;
            f.text("19:00").await;
            f.text("4").await;
            f.press(QuickReply::SkipComment).await;
        }

        #[tokio::test]
        async fn confirm_creates_request_and_notifies() {
            let f = fixture();
            f.add_active_user().await;
            fill_transfer(&f).await;

            f.press(QuickReply::ConfirmSend).await;

            let stored = f.requests.all().await;
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].status, RequestStatus::New);
            assert_eq!(*f.notifier.notified.lock().unwrap(), 1);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
            let reply = f.last_reply().await;
            assert!(reply.text.contains(&format!("#{}", stored[0].id)));
            assert_eq!(reply.keyboard, Keyboard::MainMenu);
        }

        #[tokio::test]
        async fn storage_failure_keeps_confirmation_step() {
            let f = fixture();
            f.add_active_user().await;
            fill_transfer(&f).await;
            f.requests.set_failing(true);

            f.press(QuickReply::ConfirmSend).await;

            assert!(f.requests.all().await.is_empty());
            assert_eq!(*f.notifier.notified.lock().unwrap(), 0);
            assert_eq!(f.last_reply().await.text, texts::SUBMIT_FAILED);
            assert!(matches!(
                f.sessions.load(SENDER).await.unwrap(),
                Some(ConversationSession::Transfer {
                    step: TransferStep::Confirm,
                    ..
                })
            ));
        }

        #[tokio::test]
        async fn user_blocked_at_confirmation_cannot_submit() {
            let f = fixture();
            f.add_active_user().await;
            fill_transfer(&f).await;

            let mut user = f.users.get(SENDER).await.unwrap();
            user.status = UserStatus::BlockedAdmin;
            f.users.insert(user).await;

            f.press(QuickReply::ConfirmSend).await;

            assert!(f.requests.all().await.is_empty());
            assert_eq!(*f.notifier.notified.lock().unwrap(), 0);
            assert_eq!(f.last_reply().await.text, texts::ACCESS_DENIED);
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
        }

        #[tokio::test]
        async fn cancel_writes_nothing() {
            let f = fixture();
            f.add_active_user().await;
            fill_transfer(&f).await;

            f.press(QuickReply::Cancel).await;

            assert!(f.requests.all().await.is_empty());
            assert_eq!(f.sessions.load(SENDER).await.unwrap(), None);
            assert_eq!(f.last_reply().await.text, texts::CANCELLED);
        }
    }

    mod main_menu {
        use super::*;

        #[tokio::test]
        async fn menu_lists_content() {
            let f = fixture_with_menu(vec![MenuSection {
                category: ContentCategory {
                    id: CategoryId::new(1),
                    name: "Cocktails".to_string(),
                    description: None,
                    position: 0,
                },
                items: vec![ContentItem {
                    name: "Negroni".to_string(),
                    description: None,
                    price: Some("650".to_string()),
                    position: 0,
                }],
            }]);
            f.add_active_user().await;

            f.press(QuickReply::MenuPrograms).await;

            let reply = f.last_reply().await;
            assert!(reply.text.contains("Negroni"));
            assert_eq!(f.events.event_types(SENDER).await, vec!["menu_opened"]);
        }

        #[tokio::test]
        async fn empty_menu_is_unavailable() {
            let f = fixture();
            f.add_active_user().await;

            f.press(QuickReply::MenuPrograms).await;

            assert_eq!(f.last_reply().await.text, texts::MENU_UNAVAILABLE);
        }

        #[tokio::test]
        async fn delivery_failure_does_not_fail_dispatch() {
            let f = fixture();
            f.add_active_user().await;
            f.messenger.set_failing(true);

            f.press(QuickReply::Rules).await;

            assert_eq!(f.events.event_types(SENDER).await, vec!["rules_opened"]);
        }
    }
}
