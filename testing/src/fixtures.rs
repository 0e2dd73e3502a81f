use security::{LdapEntry, LdapRoleFetcher, RoleMapping};
use std::sync::atomic::{AtomicU32, Ordering};

pub const RESEARCHERS_GROUP: &str = "RND-Researchers";
pub const TESTERS_GROUP: &str = "RND-Testers";

static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", prefix, id)
}

/// Directory DN of a group, as listed in `ismemberof`.
pub fn membership(group: &str) -> String {
    format!("CN={group},OU=Groups,DC=rnd,DC=example")
}

/// `RND-Researchers` -> `ROLE_CHERCHEUR`, `RND-Testers` -> `ROLE_TESTEUR`.
pub fn sample_role_mapping() -> RoleMapping {
    RoleMapping::new([
        (RESEARCHERS_GROUP, "ROLE_CHERCHEUR"),
        (TESTERS_GROUP, "ROLE_TESTEUR")
    ])
}

pub fn sample_role_fetcher() -> LdapRoleFetcher {
    LdapRoleFetcher::new(sample_role_mapping())
}

/// Entry whose `ismemberof` lists the given groups.
pub fn member_of(dn: &str, groups: &[&str]) -> LdapEntry {
    LdapEntry::new(dn).with_attribute("ismemberof", groups.iter().map(|g| membership(g)))
}

pub fn researcher_entry(dn: &str) -> LdapEntry {
    member_of(dn, &[RESEARCHERS_GROUP])
}

pub fn tester_entry(dn: &str) -> LdapEntry {
    member_of(dn, &[TESTERS_GROUP])
}

#[cfg(test)]
mod tests {
    use super::*;
    use security::RoleFetcher;

    #[test]
    fn test_unique_id_increments() {
        assert_ne!(unique_id("p"), unique_id("p"));
    }

    #[test]
    fn test_researcher_entry_resolves() {
        let roles = sample_role_fetcher().fetch_roles(&researcher_entry("uid=alice"));
        assert!(roles.contains("ROLE_CHERCHEUR"));
        assert_eq!(roles.len(), 1);
    }
}
