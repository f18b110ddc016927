//! Public user profiles and the follow set

use crate::core::auth::Role;
use crate::core::{Collation, Entity, FieldValue, Patchable};
use crate::listing::{Direction, Listable, Listing, ListingSpec, MatchKind, PredicateDescriptor, SortKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts_count: u32,
    pub followers_count: u32,
    pub joined_days_ago: u32,
}

/// A user as shown in the public directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub stats: UserStats,
    pub role: Role,
    #[serde(default)]
    pub is_profile_complete: bool,
}

impl Entity for PublicUser {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "username" => Some(FieldValue::Text(self.username.clone())),
            "displayName" => Some(FieldValue::Text(self.display_name.clone())),
            "bio" => self.bio.clone().map(FieldValue::Text),
            "location" => self.location.clone().map(FieldValue::Text),
            "occupation" => self.occupation.clone().map(FieldValue::Text),
            "skills" => Some(FieldValue::List(self.skills.clone())),
            "role" => Some(FieldValue::Text(self.role.as_str().to_string())),
            "postsCount" => Some(FieldValue::Integer(i64::from(self.stats.posts_count))),
            "followersCount" => Some(FieldValue::Integer(i64::from(self.stats.followers_count))),
            "joinedDaysAgo" => Some(FieldValue::Integer(i64::from(self.stats.joined_days_ago))),
            "isProfileComplete" => Some(FieldValue::Boolean(self.is_profile_complete)),
            _ => None,
        }
    }
}

/// Listing descriptor for the user directory
///
/// `createdAt` orders newest member first, read off `joinedDaysAgo`.
pub static USER_LISTING: ListingSpec = ListingSpec {
    name: "users",
    search_fields: &["username", "displayName", "bio"],
    predicates: &[PredicateDescriptor {
        selector: "role",
        field: "role",
        kind: MatchKind::Equals,
    }],
    sort_keys: &[
        SortKey {
            id: "createdAt",
            field: "joinedDaysAgo",
            direction: Direction::Ascending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "postsCount",
            field: "postsCount",
            direction: Direction::Descending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "followersCount",
            field: "followersCount",
            direction: Direction::Descending,
            collation: Collation::Numeric,
        },
        SortKey {
            id: "joinedDaysAgo",
            field: "joinedDaysAgo",
            direction: Direction::Ascending,
            collation: Collation::Numeric,
        },
    ],
    default_sort: "createdAt",
    default_limit: 12,
};

impl Listable for PublicUser {
    fn listing() -> &'static ListingSpec {
        &USER_LISTING
    }
}

/// Profile edits; identity, role and stats are not editable
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub occupation: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl Patchable for PublicUser {
    type Patch = UserPatch;

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(v) = patch.display_name {
            self.display_name = v;
        }
        if let Some(v) = patch.avatar {
            self.avatar = Some(v);
        }
        if let Some(v) = patch.bio {
            self.bio = Some(v);
        }
        if let Some(v) = patch.location {
            self.location = Some(v);
        }
        if let Some(v) = patch.website {
            self.website = Some(v);
        }
        if let Some(v) = patch.occupation {
            self.occupation = Some(v);
        }
        if let Some(v) = patch.skills {
            self.skills = v;
        }
    }
}

/// Ids of users the current visitor follows
///
/// Following or unfollowing adjusts the target's `followers_count` in the
/// listing's collection. The count saturates at 0.
#[derive(Debug, Clone, Default)]
pub struct FollowSet {
    following: BTreeSet<String>,
}

impl FollowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.contains(user_id)
    }

    pub fn len(&self) -> usize {
        self.following.len()
    }

    pub fn is_empty(&self) -> bool {
        self.following.is_empty()
    }

    /// Follow `user_id`; returns `false` when already following
    pub fn follow(&mut self, users: &mut Listing<PublicUser>, user_id: &str) -> bool {
        if !self.following.insert(user_id.to_string()) {
            return false;
        }
        users.update_entity(user_id, |user| {
            user.stats.followers_count = user.stats.followers_count.saturating_add(1);
        });
        tracing::debug!(user_id, "followed");
        true
    }

    /// Unfollow `user_id`; returns `false` when not following
    pub fn unfollow(&mut self, users: &mut Listing<PublicUser>, user_id: &str) -> bool {
        if !self.following.remove(user_id) {
            return false;
        }
        users.update_entity(user_id, |user| {
            user.stats.followers_count = user.stats.followers_count.saturating_sub(1);
        });
        tracing::debug!(user_id, "unfollowed");
        true
    }

    /// Flip the follow state; returns whether `user_id` is now followed
    pub fn toggle(&mut self, users: &mut Listing<PublicUser>, user_id: &str) -> bool {
        if self.is_following(user_id) {
            self.unfollow(users, user_id);
            false
        } else {
            self.follow(users, user_id);
            true
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    username: &str,
    display_name: &str,
    bio: &str,
    location: &str,
    occupation: &str,
    skills: &[&str],
    stats: (u32, u32, u32),
    role: Role,
) -> PublicUser {
    let (posts_count, followers_count, joined_days_ago) = stats;
    PublicUser {
        id: id.to_string(),
        username: username.to_string(),
        display_name: display_name.to_string(),
        avatar: None,
        bio: Some(bio.to_string()),
        location: Some(location.to_string()),
        website: None,
        social_links: SocialLinks {
            github: Some(format!("https://github.com/{username}")),
            ..Default::default()
        },
        occupation: Some(occupation.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        stats: UserStats {
            posts_count,
            followers_count,
            joined_days_ago,
        },
        role,
        is_profile_complete: true,
    }
}

/// Directory entries served by the in-memory user service
pub fn sample_users() -> Vec<PublicUser> {
    vec![
        profile(
            "1",
            "johndev",
            "John Developer",
            "全栈开发者，专注于现代Web技术和用户体验设计。喜欢分享技术心得和最佳实践。",
            "上海, 中国",
            "高级前端工程师",
            &["Vue.js", "TypeScript", "Node.js", "Python", "Docker"],
            (45, 1200, 365),
            Role::Author,
        ),
        profile(
            "2",
            "sarahui",
            "Sarah UI Designer",
            "UI/UX设计师，致力于创造直观美观的用户界面。热爱设计系统和交互设计。",
            "北京, 中国",
            "UI/UX设计师",
            &["Figma", "Sketch", "Prototyping", "Design System"],
            (28, 890, 240),
            Role::Author,
        ),
        profile(
            "3",
            "mikeback",
            "Mike Backend",
            "后端工程师，专注于系统架构和性能优化。喜欢探索新技术和解决复杂问题。",
            "深圳, 中国",
            "后端工程师",
            &["Java", "Spring Boot", "MySQL", "Redis", "Kubernetes"],
            (32, 567, 180),
            Role::Author,
        ),
        profile(
            "4",
            "emmaedits",
            "Emma Editor",
            "Copy editor keeping the blog readable.",
            "杭州, 中国",
            "编辑",
            &["Writing", "Markdown"],
            (6, 140, 90),
            Role::Editor,
        ),
        profile(
            "5",
            "reader42",
            "Quiet Reader",
            "Mostly here for the design posts.",
            "成都, 中国",
            "学生",
            &[],
            (0, 3, 12),
            Role::Subscriber,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(listing: &Listing<PublicUser>) -> Vec<String> {
        listing.view().items.into_iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_default_sort_is_newest_member_first() {
        let listing = Listing::from_entities(sample_users(), 12);
        assert_eq!(ids(&listing), vec!["5", "4", "3", "2", "1"]);
    }

    #[test]
    fn test_followers_sort_and_role_filter() {
        let mut listing = Listing::from_entities(sample_users(), 12);
        listing.set_sort_by("followersCount");
        assert_eq!(ids(&listing)[0], "1");

        assert!(listing.set_role_filter("author"));
        assert_eq!(listing.pagination().total, 3);
        assert!(!listing.set_category_filter("技术"));
    }

    #[test]
    fn test_search_reads_bio() {
        let mut listing = Listing::from_entities(sample_users(), 12);
        listing.set_search("DESIGN POSTS");
        assert_eq!(ids(&listing), vec!["5"]);
    }

    #[test]
    fn test_follow_set_adjusts_count() {
        let mut listing = Listing::from_entities(sample_users(), 12);
        let mut follows = FollowSet::new();

        assert!(follows.follow(&mut listing, "2"));
        assert!(!follows.follow(&mut listing, "2"));
        assert!(follows.is_following("2"));
        let count = |l: &Listing<PublicUser>| {
            l.entities()
                .iter()
                .find(|u| u.id == "2")
                .map(|u| u.stats.followers_count)
        };
        assert_eq!(count(&listing), Some(891));

        assert!(!follows.toggle(&mut listing, "2"));
        assert_eq!(count(&listing), Some(890));
        assert!(!follows.unfollow(&mut listing, "2"));
        assert!(follows.is_empty());
    }

    #[test]
    fn test_unfollow_never_goes_negative() {
        let mut users = sample_users();
        users[4].stats.followers_count = 0;
        let mut listing = Listing::from_entities(users, 12);
        let mut follows = FollowSet::new();
        follows.following.insert("5".into());
        assert!(follows.unfollow(&mut listing, "5"));
        assert_eq!(listing.entities()[4].stats.followers_count, 0);
    }

    #[test]
    fn test_patch_leaves_role_and_stats() {
        let mut user = sample_users().remove(0);
        user.apply_patch(UserPatch {
            bio: Some("new bio".into()),
            ..Default::default()
        });
        assert_eq!(user.bio.as_deref(), Some("new bio"));
        assert_eq!(user.role, Role::Author);
        assert_eq!(user.stats.posts_count, 45);
    }
}
