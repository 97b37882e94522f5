use std::collections::BTreeMap;
use std::rc::Rc;

use crate::services::http::{self, ApiError};
use crate::stores::app_store::AppStore;
use crate::stores::snack_manager::Snack;
use crate::stores::types::{Message, PagedMessages};
use crate::utils::Observable;

/// Which message list a page belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageScope {
    All,
    App(u64),
}

impl MessageScope {
    fn path(&self, since: u64) -> String {
        match self {
            MessageScope::All => format!("message?since={}", since),
            MessageScope::App(id) => format!("application/{}/message?since={}", id, since),
        }
    }

    fn delete_path(&self) -> String {
        match self {
            MessageScope::All => "message".to_string(),
            MessageScope::App(id) => format!("application/{}/message", id),
        }
    }
}

/// Paging state of one message list
#[derive(Clone, Debug, PartialEq)]
pub struct MessageState {
    pub messages: Vec<Message>,
    pub has_more: bool,
    pub next_since: u64,
    pub loaded: bool,
}

impl Default for MessageState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            has_more: true,
            next_since: 0,
            loaded: false,
        }
    }
}

impl MessageState {
    /// Append an older page
    pub fn apply_page(&mut self, page: PagedMessages) {
        for message in page.messages {
            if !self.messages.iter().any(|m| m.id == message.id) {
                self.messages.push(message);
            }
        }
        self.next_since = page.paging.since;
        self.has_more = page.paging.next.is_some();
        self.loaded = true;
    }

    /// Put a new message on top; returns false for duplicates
    pub fn prepend(&mut self, message: Message) -> bool {
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }
        self.messages.insert(0, message);
        true
    }

    pub fn remove(&mut self, id: u64) {
        self.messages.retain(|m| m.id != id);
    }
}

/// Paged message lists, one per application plus the combined list
pub struct MessagesStore {
    app_store: Rc<AppStore>,
    snack: Snack,
    state: Observable<BTreeMap<MessageScope, MessageState>>,
}

impl MessagesStore {
    pub fn new(app_store: Rc<AppStore>, snack: Snack) -> Self {
        Self {
            app_store,
            snack,
            state: Observable::new(BTreeMap::new()),
        }
    }

    #[allow(dead_code)]
    pub fn app_store(&self) -> &Rc<AppStore> {
        &self.app_store
    }

    pub fn state(&self) -> Observable<BTreeMap<MessageScope, MessageState>> {
        self.state.clone()
    }

    pub fn exists(&self, scope: MessageScope) -> bool {
        self.state.with(|s| s.get(&scope).map(|st| st.loaded).unwrap_or(false))
    }

    #[allow(dead_code)]
    pub fn messages_of(&self, scope: MessageScope) -> Vec<Message> {
        self.state
            .with(|s| s.get(&scope).map(|st| st.messages.clone()).unwrap_or_default())
    }

    pub fn can_load_more(&self, scope: MessageScope) -> bool {
        self.state
            .with(|s| s.get(&scope).map(|st| st.has_more).unwrap_or(true))
    }

    /// Image path for a message, taken from its application
    pub fn image_of(&self, message: &Message) -> Option<String> {
        self.app_store.image_of(message.appid)
    }

    /// Fetch the next older page of a list
    pub async fn load_more(&self, scope: MessageScope) -> Result<(), ApiError> {
        if !self.can_load_more(scope) {
            return Ok(());
        }

        let since = self
            .state
            .with(|s| s.get(&scope).map(|st| st.next_since).unwrap_or(0));
        let page: PagedMessages = http::client()?.get(&scope.path(since)).await?;
        log::debug!("Loaded {} messages for {:?}", page.messages.len(), scope);

        self.state
            .update(|s| s.entry(scope).or_default().apply_page(page));
        Ok(())
    }

    /// Add a message that arrived over the stream
    ///
    /// Only lists that were already loaded receive it; the rest pick it up on
    /// their first page.
    pub fn publish_single_message(&self, message: Message) {
        let targets = [MessageScope::All, MessageScope::App(message.appid)];
        let mut changed = false;

        self.state.update(|s| {
            for scope in targets {
                if let Some(list) = s.get_mut(&scope).filter(|st| st.loaded) {
                    changed |= list.prepend(message.clone());
                }
            }
        });

        if !changed {
            log::debug!("Message {} not shown in any loaded list", message.id);
        }
    }

    pub async fn remove_single(&self, message: &Message) -> Result<(), ApiError> {
        http::client()?
            .delete(&format!("message/{}", message.id))
            .await?;

        self.state.update(|s| {
            for list in s.values_mut() {
                list.remove(message.id);
            }
        });
        self.snack.call("Message deleted");
        Ok(())
    }

    /// Delete every message of a list on the server, then reload it
    pub async fn remove_by_scope(&self, scope: MessageScope) -> Result<(), ApiError> {
        http::client()?.delete(&scope.delete_path()).await?;
        self.clear_all();
        self.snack.call("Deleted all messages from the application");
        self.refresh_by_scope(scope).await
    }

    pub async fn refresh_by_scope(&self, scope: MessageScope) -> Result<(), ApiError> {
        self.state.update(|s| {
            s.insert(scope, MessageState::default());
        });
        self.load_more(scope).await
    }

    pub fn clear_all(&self) {
        self.state.update(BTreeMap::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::snack_manager::SnackManager;
    use crate::stores::types::Paging;

    fn message(id: u64, appid: u64) -> Message {
        Message {
            id,
            appid,
            message: format!("message {}", id),
            title: "title".to_string(),
            priority: 0,
            date: "2024-03-01T10:15:00Z".to_string(),
            extras: None,
        }
    }

    fn page(messages: Vec<Message>, since: u64, has_next: bool) -> PagedMessages {
        PagedMessages {
            paging: Paging {
                next: has_next.then(|| format!("message?since={}", since)),
                size: messages.len() as u64,
                since,
                limit: 100,
            },
            messages,
        }
    }

    fn store() -> MessagesStore {
        let manager = SnackManager::new();
        let apps = Rc::new(AppStore::new(manager.snack()));
        MessagesStore::new(apps, manager.snack())
    }

    #[test]
    fn test_apply_page_tracks_paging() {
        let mut state = MessageState::default();
        assert!(state.has_more);

        state.apply_page(page(vec![message(10, 1), message(9, 1)], 9, true));
        assert!(state.loaded);
        assert!(state.has_more);
        assert_eq!(state.next_since, 9);

        state.apply_page(page(vec![message(9, 1), message(8, 1)], 0, false));
        assert!(!state.has_more);
        let ids: Vec<u64> = state.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 9, 8]);
    }

    #[test]
    fn test_scope_paths() {
        assert_eq!(MessageScope::All.path(0), "message?since=0");
        assert_eq!(MessageScope::App(4).path(12), "application/4/message?since=12");
        assert_eq!(MessageScope::App(4).delete_path(), "application/4/message");
    }

    #[test]
    fn test_publish_only_reaches_loaded_lists() {
        let store = store();
        store.state.update(|s| {
            let mut all = MessageState::default();
            all.apply_page(page(vec![message(1, 7)], 0, false));
            s.insert(MessageScope::All, all);
        });

        store.publish_single_message(message(2, 7));

        let ids: Vec<u64> = store.messages_of(MessageScope::All).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(store.messages_of(MessageScope::App(7)).is_empty());
        assert!(!store.exists(MessageScope::App(7)));
    }

    #[test]
    fn test_publish_ignores_duplicates() {
        let store = store();
        store.state.update(|s| {
            let mut app = MessageState::default();
            app.apply_page(page(vec![message(5, 3)], 0, false));
            s.insert(MessageScope::App(3), app);
        });

        store.publish_single_message(message(5, 3));
        store.publish_single_message(message(6, 3));

        let ids: Vec<u64> = store
            .messages_of(MessageScope::App(3))
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![6, 5]);
    }

    #[test]
    fn test_publish_notifies_observers() {
        let store = store();
        let calls = Rc::new(std::cell::Cell::new(0));
        let calls_cb = calls.clone();
        let _sub = store.state().subscribe(move |_| calls_cb.set(calls_cb.get() + 1));

        store.publish_single_message(message(1, 1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear_all() {
        let store = store();
        store.state.update(|s| {
            s.insert(MessageScope::All, MessageState::default());
        });
        store.clear_all();
        assert!(store.state().get().is_empty());
        assert!(store.can_load_more(MessageScope::All));
    }
}
