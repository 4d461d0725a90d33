use crate::error::Result;
use crate::profile::ProfileCache;
use crate::slack::{UserId, WorkspaceApi};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@([A-Z0-9]+)>").expect("mention pattern is valid"));

/// Distinct user ids mentioned in `text`, in first-found order
pub fn mention_ids(text: &str) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for id in MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Rewrites `<@U123>` tokens into `@name`
pub struct MentionResolver {
    cache: Arc<ProfileCache>,
}

impl MentionResolver {
    pub fn new(cache: Arc<ProfileCache>) -> Self {
        Self { cache }
    }

    /// Replace every mention token in `text` with the mentioned user's name.
    ///
    /// Each distinct user is looked up once, in the order first seen, through
    /// the profile cache; `client` is the workspace the text came from. The
    /// output is then built in a single pass, and substituted names are never
    /// rescanned. Fails if any mentioned user cannot be resolved.
    pub async fn rewrite(&self, client: &dyn WorkspaceApi, text: &str) -> Result<String> {
        let ids = mention_ids(text);
        if ids.is_empty() {
            return Ok(text.to_string());
        }

        let mut names: HashMap<&str, String> = HashMap::with_capacity(ids.len());
        for id in ids {
            let profile = self.cache.resolve(client, &UserId::new(id)).await?;
            names.insert(id, profile.mention());
        }

        let rewritten = MENTION_RE.replace_all(text, |caps: &Captures| {
            names
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });

        Ok(rewritten.into_owned())
    }
}
