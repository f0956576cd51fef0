//! Dual-representation configuration content.
//!
//! A [`ContentStore`] keeps raw bytes as its source of truth and derives the
//! key-value view lazily, on the first structured read. Setting a mapping
//! goes the other way eagerly: the bytes are regenerated at once.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::fingerprint::Fingerprint;
use crate::text::{self, parse_text};
use crate::view::{Mapping, TypedAccess, TypedView};

/// Parse state of the stored content.
#[derive(Clone)]
enum State {
    /// Raw content only; the view has not been derived yet.
    Unparsed { content: Bytes },
    /// Raw content and the view derived from (or serialized into) it.
    Parsed { content: Bytes, view: TypedView },
}

impl State {
    fn content(&self) -> &Bytes {
        match self {
            Self::Unparsed { content } | Self::Parsed { content, .. } => content,
        }
    }
}

#[derive(Clone)]
struct Inner {
    state: State,
    fingerprint: Fingerprint,
}

impl Inner {
    fn unparsed(content: Bytes) -> Self {
        let fingerprint = Fingerprint::of(&content);
        Self {
            state: State::Unparsed { content },
            fingerprint,
        }
    }

    fn parsed(view: TypedView) -> Self {
        let content = text::serialize(view.mapping());
        let fingerprint = Fingerprint::of(&content);
        Self {
            state: State::Parsed { content, view },
            fingerprint,
        }
    }

    /// Moves to `Parsed` if needed and returns the view.
    fn ensure_parsed(&mut self) -> TypedView {
        let content = match &self.state {
            State::Parsed { view, .. } => return view.clone(),
            State::Unparsed { content } => content.clone(),
        };

        let view = parse_logged(&content, self.fingerprint);
        self.state = State::Parsed {
            content,
            view: view.clone(),
        };
        view
    }
}

/// Parses `content`, reporting every skipped line as a warning.
fn parse_logged(content: &[u8], fingerprint: Fingerprint) -> TypedView {
    let report = parse_text(content);
    for skipped in &report.skipped {
        tracing::warn!(
            line_number = skipped.line_number,
            line = %skipped.line,
            error = %skipped.error,
            fingerprint = %fingerprint,
            "skipping configuration line with malformed escape"
        );
    }
    TypedView::from_mapping(report.mapping)
}

/// Configuration content held as raw text and as a lazily derived mapping.
///
/// The store is safe to share between threads. The first structured read
/// (any [`TypedAccess`] getter, [`ContentStore::view`] or
/// [`ContentStore::get_all`]) parses the content exactly once under the
/// store's lock; concurrent readers either wait for that parse or see its
/// complete result. Views handed out earlier are snapshots and are not
/// affected by later writes.
///
/// # Example
///
/// ```
/// use logconf_config::{ContentStore, TypedAccess};
///
/// let store = ContentStore::from_text("# pool\nmax=16\nname=orders\n");
/// assert!(!store.is_parsed());
/// assert_eq!(store.get_int("max", 4), 16);
/// assert!(store.is_parsed());
///
/// let before = store.fingerprint();
/// store.put_all([("max", "32")]);
/// assert_ne!(store.fingerprint(), before);
/// assert_eq!(store.content_string(), "max=32\nname=orders\n");
/// ```
pub struct ContentStore {
    inner: RwLock<Inner>,
}

impl ContentStore {
    /// Creates an unparsed store over raw `content`.
    pub fn from_text(content: impl Into<Bytes>) -> Self {
        Self {
            inner: RwLock::new(Inner::unparsed(content.into())),
        }
    }

    /// Creates a parsed store from `map`; the content is its serialization.
    pub fn from_mapping(map: Mapping) -> Self {
        Self::from_view(TypedView::from_mapping(map))
    }

    /// Creates a parsed store backed by an existing view.
    pub fn from_view(view: TypedView) -> Self {
        Self {
            inner: RwLock::new(Inner::parsed(view)),
        }
    }

    /// Replaces the content with raw text; the next structured read reparses.
    pub fn copy_of_text(&self, content: impl Into<Bytes>) {
        *self.inner.write() = Inner::unparsed(content.into());
    }

    /// Replaces the content with `map`, regenerating the raw text.
    pub fn copy_of_mapping(&self, map: Mapping) {
        *self.inner.write() = Inner::parsed(TypedView::from_mapping(map));
    }

    /// Merges `items` over the current entries and regenerates the raw text.
    ///
    /// Unparsed content is parsed first so that its entries are kept.
    /// Returns `self` so calls can be chained.
    pub fn put_all<I, K, V>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut inner = self.inner.write();
        let merged = inner.ensure_parsed().merge(items);
        *inner = Inner::parsed(merged);
        self
    }

    /// The current entries as a [`TypedView`] snapshot.
    pub fn view(&self) -> TypedView {
        {
            let inner = self.inner.read();
            if let State::Parsed { view, .. } = &inner.state {
                return view.clone();
            }
        }
        self.inner.write().ensure_parsed()
    }

    /// All current entries.
    pub fn get_all(&self) -> Arc<Mapping> {
        self.view().snapshot()
    }

    /// Whether the key-value view has been derived for the current content.
    pub fn is_parsed(&self) -> bool {
        matches!(self.inner.read().state, State::Parsed { .. })
    }

    /// The raw content.
    pub fn content(&self) -> Bytes {
        self.inner.read().state.content().clone()
    }

    /// The raw content decoded as UTF-8, with invalid sequences replaced.
    pub fn content_string(&self) -> String {
        String::from_utf8_lossy(&self.content()).into_owned()
    }

    /// Trimmed, non-empty lines of the raw content.
    ///
    /// With `remove_comments`, `#` and `//` lines are dropped as well.
    pub fn lines(&self, remove_comments: bool) -> Vec<String> {
        let content = self.content_string();
        text::lines(&content, remove_comments)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Fingerprint of the current raw content.
    pub fn fingerprint(&self) -> Fingerprint {
        self.inner.read().fingerprint
    }
}

impl TypedAccess for ContentStore {
    fn get(&self, key: &str) -> Option<String> {
        self.view().get_str(key).map(str::to_string)
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        Self::from_view(TypedView::new())
    }
}

impl Clone for ContentStore {
    fn clone(&self) -> Self {
        Self {
            inner: RwLock::new(self.inner.read().clone()),
        }
    }
}

impl From<TypedView> for ContentStore {
    fn from(view: TypedView) -> Self {
        Self::from_view(view)
    }
}

impl fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ContentStore")
            .field("len", &inner.state.content().len())
            .field("parsed", &matches!(inner.state, State::Parsed { .. }))
            .field("fingerprint", &inner.fingerprint)
            .finish()
    }
}
