//! Stokvel model
//!
//! A savings group: an ordered member list, a pooled balance and the
//! append-only list of contributions that make up that balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ContributionId;
use super::money::Money;

/// A single deposit by a member into a stokvel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(default)]
    pub id: ContributionId,
    /// Username of the contributing member
    pub user: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
}

/// A savings group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stokvel {
    /// Unique, case-sensitive key
    pub name: String,

    /// Usernames in join order; the creator is always first
    pub members: Vec<String>,

    /// Pooled balance, always the sum of `contributions`
    #[serde(default)]
    pub balance: Money,

    #[serde(default)]
    pub contributions: Vec<Contribution>,

    pub created_date: DateTime<Utc>,
    pub created_by: String,
}

impl Stokvel {
    /// Create a stokvel whose only member is its creator
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        let creator = creator.into();
        Self {
            name: name.into(),
            members: vec![creator.clone()],
            balance: Money::zero(),
            contributions: Vec::new(),
            created_date: Utc::now(),
            created_by: creator,
        }
    }

    pub fn has_member(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Sum of all contribution amounts
    pub fn total_contributions(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    /// Append a contribution and grow the balance by the same amount
    pub fn record_contribution(
        &mut self,
        user: impl Into<String>,
        amount: Money,
        date: DateTime<Utc>,
    ) -> &Contribution {
        self.balance += amount;
        self.contributions.push(Contribution {
            id: ContributionId::new(),
            user: user.into(),
            amount,
            date,
        });
        &self.contributions[self.contributions.len() - 1]
    }

    /// Contributions made by a single member, oldest first
    pub fn contributions_by<'a>(
        &'a self,
        username: &'a str,
    ) -> impl Iterator<Item = &'a Contribution> + 'a {
        self.contributions.iter().filter(move |c| c.user == username)
    }
}

impl fmt::Display for Stokvel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} members, {})",
            self.name,
            self.member_count(),
            self.balance
        )
    }
}
