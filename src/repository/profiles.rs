// Profile Directory - batched author profile lookups with a small LRU cache.
// One membership query per listing over the distinct ids that missed the
// cache; never one query per row.

use crate::core::UserId;
use crate::error::AppResult;
use crate::gateway::DataGateway;
use crate::models::AuthorProfile;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

pub struct ProfileDirectory {
    gateway: Arc<dyn DataGateway>,
    cache: Mutex<LruCache<UserId, AuthorProfile>>,
}

impl std::fmt::Debug for ProfileDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileDirectory")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl ProfileDirectory {
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(gateway: Arc<dyn DataGateway>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            gateway,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Resolve profiles for the given author ids. Duplicates are collapsed,
    /// cache hits are served locally, and the remaining misses go to the
    /// gateway in a single membership query. Ids the backend does not know
    /// are simply absent from the map.
    pub async fn lookup(&self, user_ids: &[UserId]) -> AppResult<HashMap<UserId, AuthorProfile>> {
        let mut resolved = HashMap::new();
        let mut misses: Vec<UserId> = Vec::new();

        {
            let mut cache = self.cache.lock().unwrap();
            for id in user_ids {
                if resolved.contains_key(id) || misses.contains(id) {
                    continue;
                }
                match cache.get(id) {
                    Some(profile) => {
                        resolved.insert(*id, profile.clone());
                    }
                    None => misses.push(*id),
                }
            }
        }

        if !misses.is_empty() {
            let rows = self.gateway.fetch_profiles(&misses).await?;
            let mut cache = self.cache.lock().unwrap();
            for row in rows {
                let profile = AuthorProfile {
                    username: row.username,
                    display_name: row.display_name,
                    avatar_url: row.avatar_url,
                };
                cache.put(row.id, profile.clone());
                resolved.insert(row.id, profile);
            }
        }

        Ok(resolved)
    }

    /// Drop a cached entry, e.g. after an avatar update.
    pub fn invalidate(&self, user_id: UserId) {
        self.cache.lock().unwrap().pop(&user_id);
    }
}
