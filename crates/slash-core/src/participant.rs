//! Command participants
//!
//! A participant is either a known chat identity (numeric id plus display
//! name, optionally a handle) or a bare handle picked up from an
//! `@mention`. Bare handles start unresolved; [`Participant::resolve`]
//! looks the name up once and memoizes the outcome on the instance.

use std::borrow::Cow;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{Error, Result};
use crate::normalize::escape_markup;
use crate::profile::{ProfileLookup, extract_display_name};

/// Name shown instead of re-mentioning the sender when they target themselves.
pub const SELF_PLACEHOLDER: &str = "自己";

/// Whether a participant's display name is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Handle-only participant not yet looked up.
    Unresolved,
    /// Display name known.
    Resolved,
    /// Lookup found no such account.
    Absent,
}

#[derive(Debug)]
pub struct Participant {
    id: Option<i64>,
    handle: Option<String>,
    /// Unset: unresolved. `Some(name)`: resolved. `None`: absent.
    name: OnceCell<Option<String>>,
}

impl Participant {
    /// Participant from a chat identity. Needs an id with a name, or a handle.
    pub fn new(id: Option<i64>, name: Option<String>, handle: Option<String>) -> Result<Self> {
        let handle = handle.filter(|h| !h.is_empty());
        let name = name.filter(|n| !n.is_empty());

        match (id, name, handle) {
            (Some(id), Some(name), handle) => Ok(Self {
                id: Some(id),
                handle,
                name: OnceCell::new_with(Some(Some(name))),
            }),
            (id, _, Some(handle)) => Ok(Self::with_handle(id, handle)),
            _ => Err(Error::InvalidParticipant),
        }
    }

    /// Unresolved participant known only by its handle.
    pub fn from_handle(handle: impl Into<String>) -> Self {
        Self::with_handle(None, handle.into())
    }

    fn with_handle(id: Option<i64>, handle: String) -> Self {
        Self {
            id,
            handle: Some(handle),
            name: OnceCell::new(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.get().and_then(|name| name.as_deref())
    }

    pub fn resolution_state(&self) -> ResolutionState {
        match self.name.get() {
            None => ResolutionState::Unresolved,
            Some(Some(_)) => ResolutionState::Resolved,
            Some(None) => ResolutionState::Absent,
        }
    }

    /// Look up the display name of a handle-only participant.
    ///
    /// Runs the lookup at most once per instance; concurrent callers wait on
    /// the same fetch. A failed lookup is not memoized.
    pub async fn resolve<L: ProfileLookup>(&self, lookup: &L) -> Result<ResolutionState> {
        let Some(handle) = self.handle.as_deref() else {
            return Ok(self.resolution_state());
        };

        self.name
            .get_or_try_init(|| async {
                let page = lookup.fetch_profile(handle).await?;
                let name = extract_display_name(handle, &page)?;
                debug!(handle, found = name.is_some(), "Resolved profile");
                Ok::<_, Error>(name)
            })
            .await?;

        Ok(self.resolution_state())
    }

    /// Name without markup, or `@handle` when no name is known.
    pub fn plain_name(&self, as_self: bool) -> Cow<'_, str> {
        match self.display_name() {
            Some(_) if as_self => Cow::Borrowed(SELF_PLACEHOLDER),
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.bare_handle()),
        }
    }

    /// HTML mention: a deep link around the escaped name, or `@handle`.
    pub fn mention(&self, as_self: bool) -> String {
        if self.display_name().is_none() {
            return self.bare_handle();
        }
        let name = escape_markup(&self.plain_name(as_self));
        format!(r#"<a href="{}">{}</a>"#, self.deep_link(), name)
    }

    fn deep_link(&self) -> String {
        match (&self.handle, self.id) {
            (Some(handle), None) => format!("tg://resolve?domain={handle}"),
            (Some(handle), Some(id)) if id <= 0 => format!("tg://resolve?domain={handle}"),
            (_, Some(id)) => format!("tg://user?id={id}"),
            (None, None) => String::new(),
        }
    }

    fn bare_handle(&self) -> String {
        format!("@{}", self.handle.as_deref().unwrap_or_default())
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.id, other.id) {
            return a == b;
        }
        matches!((&self.handle, &other.handle), (Some(a), Some(b)) if a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockProfileLookup;

    fn alice() -> Participant {
        Participant::new(Some(1), Some("Alice".into()), Some("alice".into())).unwrap()
    }

    #[test]
    fn construction_requires_name_with_id_or_handle() {
        assert!(matches!(
            Participant::new(Some(1), None, None),
            Err(Error::InvalidParticipant)
        ));
        assert!(matches!(
            Participant::new(None, Some("Name".into()), None),
            Err(Error::InvalidParticipant)
        ));
        assert!(Participant::new(Some(1), Some("Name".into()), None).is_ok());
        assert!(Participant::new(None, None, Some("handle".into())).is_ok());
    }

    #[test]
    fn id_without_name_falls_back_to_handle() {
        let p = Participant::new(Some(5), None, Some("bob".into())).unwrap();
        assert_eq!(p.resolution_state(), ResolutionState::Unresolved);
        assert_eq!(p.mention(false), "@bob");
    }

    #[test]
    fn equality_by_id_or_handle() {
        let a = alice();
        let same_id = Participant::new(Some(1), Some("Other".into()), None).unwrap();
        let same_handle = Participant::from_handle("alice");
        let different = Participant::new(Some(2), Some("Bob".into()), Some("bob".into())).unwrap();

        assert_eq!(a, same_id);
        assert_eq!(a, same_handle);
        assert_ne!(a, different);
        assert_ne!(same_id, same_handle);
    }

    #[test]
    fn differing_ids_are_distinct_despite_shared_handle() {
        let a = Participant::new(Some(1), Some("A".into()), Some("same".into())).unwrap();
        let b = Participant::new(Some(2), Some("B".into()), Some("same".into())).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, Participant::from_handle("same"));
    }

    #[test]
    fn user_mention_links_by_id() {
        assert_eq!(alice().mention(false), r#"<a href="tg://user?id=1">Alice</a>"#);
    }

    #[test]
    fn channel_mention_links_by_handle() {
        let channel = Participant::new(Some(-100123), Some("News".into()), Some("news".into())).unwrap();
        assert_eq!(channel.mention(false), r#"<a href="tg://resolve?domain=news">News</a>"#);
    }

    #[test]
    fn self_mention_uses_placeholder() {
        assert_eq!(alice().mention(true), r#"<a href="tg://user?id=1">自己</a>"#);
        assert_eq!(alice().plain_name(true), "自己");
    }

    #[test]
    fn mention_escapes_name() {
        let p = Participant::new(Some(3), Some("<Tom & Jerry>".into()), None).unwrap();
        assert_eq!(p.mention(false), r#"<a href="tg://user?id=3">&lt;Tom &amp; Jerry&gt;</a>"#);
        assert_eq!(p.plain_name(false), "<Tom & Jerry>");
    }

    #[tokio::test]
    async fn resolve_existing_handle() {
        let lookup = MockProfileLookup::new().with_account("carol", "Carol ☕");
        let p = Participant::from_handle("carol");

        assert_eq!(p.resolution_state(), ResolutionState::Unresolved);
        assert_eq!(p.resolve(&lookup).await.unwrap(), ResolutionState::Resolved);
        assert_eq!(p.display_name(), Some("Carol ☕"));
        assert_eq!(p.mention(false), r#"<a href="tg://resolve?domain=carol">Carol ☕</a>"#);
    }

    #[tokio::test]
    async fn resolve_missing_handle_is_absent() {
        let lookup = MockProfileLookup::new();
        let p = Participant::from_handle("nobody");

        assert_eq!(p.resolve(&lookup).await.unwrap(), ResolutionState::Absent);
        assert_eq!(p.mention(false), "@nobody");
        assert_eq!(p.plain_name(false), "@nobody");
    }

    #[tokio::test]
    async fn resolve_is_memoized() {
        let lookup = MockProfileLookup::new().with_account("carol", "Carol");
        let p = Participant::from_handle("carol");

        p.resolve(&lookup).await.unwrap();
        p.resolve(&lookup).await.unwrap();

        assert_eq!(lookup.fetch_count("carol"), 1);
    }

    #[tokio::test]
    async fn resolve_skips_known_participants() {
        let lookup = MockProfileLookup::new();
        let p = alice();

        assert_eq!(p.resolve(&lookup).await.unwrap(), ResolutionState::Resolved);
        assert_eq!(lookup.fetch_count("alice"), 0);
    }

    #[tokio::test]
    async fn failed_lookup_surfaces_error() {
        let lookup = MockProfileLookup::new().with_failure("broken");
        let p = Participant::from_handle("broken");

        assert!(matches!(p.resolve(&lookup).await, Err(Error::Lookup(_))));
        assert_eq!(p.resolution_state(), ResolutionState::Unresolved);
    }
}
