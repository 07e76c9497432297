//! Directory lookup: who a user is and who they report to.
//!
//! The directory is owned elsewhere; the workflow only reads it. `Directory`
//! is the seam, `InMemoryDirectory` backs the server and the tests.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use spendflow_shared::{CompanyId, UserId};

/// Organizational role of a directory user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Company administrator; designated approver for escalated expenses.
    Admin,
    /// People manager.
    Manager,
    /// Individual contributor.
    Employee,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
        }
    }

    /// Parses a role from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as seen by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// User identifier.
    pub id: UserId,
    /// Company the user belongs to.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Organizational role.
    pub role: Role,
    /// Direct manager, if any.
    pub manager_id: Option<UserId>,
}

/// Read-only view of the user directory.
pub trait Directory: Send + Sync {
    /// Looks up a user.
    fn get_user(&self, id: UserId) -> Option<DirectoryUser>;

    /// Users designated to approve escalated expenses for a company,
    /// in a stable order.
    fn designated_approvers(&self, company_id: CompanyId) -> Vec<UserId>;

    /// The user's reporting line, direct manager first.
    ///
    /// Stops at the top of the chain, at an unknown manager, or at the first
    /// repeated user so a misconfigured cycle cannot loop forever.
    fn manager_chain(&self, id: UserId) -> Vec<UserId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.get_user(id).and_then(|u| u.manager_id);

        while let Some(manager_id) = current {
            if !seen.insert(manager_id) {
                break;
            }
            let Some(manager) = self.get_user(manager_id) else {
                break;
            };
            chain.push(manager_id);
            current = manager.manager_id;
        }

        chain
    }

    /// Display name for a user, if known.
    fn display_name(&self, id: UserId) -> Option<String> {
        self.get_user(id).map(|u| u.name)
    }
}

/// Thread-safe in-memory directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashMap<UserId, DirectoryUser>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub fn upsert(&self, user: DirectoryUser) {
        self.users.insert(user.id, user);
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if the directory has no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Directory for InMemoryDirectory {
    fn get_user(&self, id: UserId) -> Option<DirectoryUser> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    fn designated_approvers(&self, company_id: CompanyId) -> Vec<UserId> {
        let mut admins: Vec<(String, UserId)> = self
            .users
            .iter()
            .filter(|entry| entry.company_id == company_id && entry.role == Role::Admin)
            .map(|entry| (entry.name.clone(), entry.id))
            .collect();
        admins.sort();
        admins.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(company_id: CompanyId, name: &str, role: Role, manager_id: Option<UserId>) -> DirectoryUser {
        DirectoryUser {
            id: UserId::new(),
            company_id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            manager_id,
        }
    }

    #[test]
    fn test_manager_chain_walks_upwards() {
        let company = CompanyId::new();
        let directory = InMemoryDirectory::new();
        let ceo = user(company, "Ceo", Role::Admin, None);
        let manager = user(company, "Manager", Role::Manager, Some(ceo.id));
        let employee = user(company, "Employee", Role::Employee, Some(manager.id));
        for u in [&ceo, &manager, &employee] {
            directory.upsert(u.clone());
        }

        assert_eq!(directory.manager_chain(employee.id), vec![manager.id, ceo.id]);
        assert_eq!(directory.manager_chain(ceo.id), Vec::<UserId>::new());
    }

    #[test]
    fn test_manager_chain_stops_on_cycle() {
        let company = CompanyId::new();
        let directory = InMemoryDirectory::new();
        let mut a = user(company, "A", Role::Manager, None);
        let b = user(company, "B", Role::Manager, Some(a.id));
        a.manager_id = Some(b.id);
        directory.upsert(a.clone());
        directory.upsert(b.clone());

        assert_eq!(directory.manager_chain(a.id), vec![b.id]);
    }

    #[test]
    fn test_manager_chain_stops_at_unknown_manager() {
        let company = CompanyId::new();
        let directory = InMemoryDirectory::new();
        let employee = user(company, "Employee", Role::Employee, Some(UserId::new()));
        directory.upsert(employee.clone());

        assert!(directory.manager_chain(employee.id).is_empty());
    }

    #[test]
    fn test_designated_approvers_are_company_admins_sorted_by_name() {
        let company = CompanyId::new();
        let other_company = CompanyId::new();
        let directory = InMemoryDirectory::new();
        let zoe = user(company, "Zoe", Role::Admin, None);
        let alice = user(company, "Alice", Role::Admin, None);
        let bob = user(company, "Bob", Role::Manager, None);
        let outsider = user(other_company, "Carol", Role::Admin, None);
        for u in [&zoe, &alice, &bob, &outsider] {
            directory.upsert(u.clone());
        }

        assert_eq!(directory.designated_approvers(company), vec![alice.id, zoe.id]);
        assert_eq!(directory.len(), 4);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
        assert_eq!(Role::parse("owner"), None);
    }
}
