//! Domain entities: registry members and the online registry.

use super::error::RegistryError;
use super::value_object::{ConnectionId, Timestamp, Username};

/// One identified connection: the binding of a username to a live channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub username: Username,
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(connection_id: ConnectionId, username: Username, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            username,
            joined_at,
        }
    }
}

/// Outcome of an identity claim against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The claim created a new registry entry
    Registered,
    /// The connection already held an identity; the registry is unchanged
    AlreadyRegistered,
}

const DEFAULT_MEMBER_CAPACITY: usize = 100;

/// The authoritative set of identified connections.
///
/// Connections that have not completed an identity claim never appear here.
/// Entries are removed synchronously when their connection closes, so a
/// presence query issued after disconnect processing cannot observe a stale
/// entry.
#[derive(Debug, Clone)]
pub struct OnlineRegistry {
    created_at: Timestamp,
    member_capacity: usize,
    members: Vec<Member>,
}

impl OnlineRegistry {
    pub fn new(created_at: Timestamp) -> Self {
        Self::with_capacity(created_at, DEFAULT_MEMBER_CAPACITY)
    }

    pub fn with_capacity(created_at: Timestamp, member_capacity: usize) -> Self {
        Self {
            created_at,
            member_capacity,
            members: Vec::new(),
        }
    }

    /// Registers a member.
    ///
    /// A second claim for a connection that already holds an identity is
    /// idempotent: the registry keeps the first identity, whatever username
    /// the new claim carries.
    pub fn register(&mut self, member: Member) -> Result<RegisterOutcome, RegistryError> {
        if self
            .members
            .iter()
            .any(|m| m.connection_id == member.connection_id)
        {
            return Ok(RegisterOutcome::AlreadyRegistered);
        }
        if self.members.len() >= self.member_capacity {
            return Err(RegistryError::CapacityExceeded);
        }
        self.members.push(member);
        Ok(RegisterOutcome::Registered)
    }

    /// Removes the entry for `connection_id`, if any
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let position = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(position))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|m| &m.connection_id == connection_id)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
