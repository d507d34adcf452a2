//! Family roster and plan economics.
//!
//! The roster owns the member list and is the only place members are added
//! or removed; the capacity check and the append are one operation so the
//! five-member limit holds even under repeated submissions.

pub mod invite;
pub mod share;
pub mod validate;

use chrono::NaiveDate;
use thiserror::Error;

use invite::{ContactMethod, Relationship};

pub const MAX_MEMBERS: usize = 5;

/// Monthly prices in rubles, matching the demo plan card.
pub const INDIVIDUAL_PRICE: i64 = 999;
pub const FAMILY_PRICE: i64 = 2069;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyMember {
    pub id: u64,
    pub name: String,
    pub contact: String,
    pub initials: String,
    pub relationship: Option<Relationship>,
    pub joined: NaiveDate,
    /// Channel the member confirmed through; the owner never verified.
    pub verification: Option<ContactMethod>,
    pub is_owner: bool,
    pub status: MemberStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("member limit reached ({MAX_MEMBERS})")]
    Full,
    #[error("the plan owner cannot be removed")]
    Owner,
    #[error("no such member")]
    Unknown,
}

pub struct Roster {
    members: Vec<FamilyMember>,
    next_id: u64,
}

impl Roster {
    /// A roster with just the paying owner.
    pub fn new(owner_name: &str, owner_contact: &str, today: NaiveDate) -> Self {
        let owner = FamilyMember {
            id: 1,
            name: owner_name.to_string(),
            contact: owner_contact.to_string(),
            initials: initials(owner_name),
            relationship: None,
            joined: today,
            verification: None,
            is_owner: true,
            status: MemberStatus::Active,
        };
        Self {
            members: vec![owner],
            next_id: 2,
        }
    }

    /// The demo household: the owner plus two confirmed relatives.
    pub fn demo(today: NaiveDate) -> Self {
        let mut roster = Self::new("Alexander Petrov", "alex@example.com", today);
        for (name, contact, method, rel, days_ago) in [
            (
                "Maria Petrova",
                "maria@example.com",
                ContactMethod::Email,
                Relationship::Spouse,
                30,
            ),
            (
                "Dmitry Ivanov",
                "dmitry@example.com",
                ContactMethod::Phone,
                Relationship::Sibling,
                21,
            ),
        ] {
            let joined = today - chrono::Duration::days(days_ago);
            // seeding stays within capacity, so this cannot fail
            let _ = roster.add(name, contact, method, Some(rel), joined);
        }
        roster
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_MEMBERS
    }

    pub fn free_slots(&self) -> usize {
        MAX_MEMBERS.saturating_sub(self.members.len())
    }

    /// Capacity check and append in one step.
    pub fn add(
        &mut self,
        name: &str,
        contact: &str,
        method: ContactMethod,
        relationship: Option<Relationship>,
        joined: NaiveDate,
    ) -> Result<&FamilyMember, RosterError> {
        if self.is_full() {
            return Err(RosterError::Full);
        }
        let member = FamilyMember {
            id: self.next_id,
            name: name.to_string(),
            contact: contact.to_string(),
            initials: initials(name),
            relationship,
            joined,
            verification: Some(method),
            is_owner: false,
            status: MemberStatus::Active,
        };
        self.next_id += 1;
        self.members.push(member);
        self.members.last().ok_or(RosterError::Unknown)
    }

    pub fn remove(&mut self, id: u64) -> Result<FamilyMember, RosterError> {
        let idx = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(RosterError::Unknown)?;
        if self.members[idx].is_owner {
            return Err(RosterError::Owner);
        }
        Ok(self.members.remove(idx))
    }
}

/// Two-letter initials: first letters of the first two name tokens,
/// uppercased. Single-token names get one letter.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Plan economics for the current household size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savings {
    /// Family price split across members, rounded.
    pub per_member_price: i64,
    /// What each member keeps vs an individual plan. Negative while the
    /// household is too small for the family plan to pay off.
    pub per_member_saving: i64,
    pub total_saving: i64,
    /// Saving as a share of the individual price, percent.
    pub percent: i64,
}

pub fn savings(member_count: usize) -> Savings {
    let count = member_count.max(1) as i64;
    let per_member_price = div_round(FAMILY_PRICE, count);
    let per_member_saving = INDIVIDUAL_PRICE - per_member_price;
    Savings {
        per_member_price,
        per_member_saving,
        total_saving: per_member_saving * count,
        percent: div_round(per_member_saving * 100, INDIVIDUAL_PRICE),
    }
}

/// Saving of a `count`-member family plan vs `count` individual plans,
/// percent. Used by the size-comparison bars.
pub fn family_saving_percent(count: usize) -> i64 {
    let count = count.max(1) as i64;
    let individual_total = count * INDIVIDUAL_PRICE;
    div_round((individual_total - FAMILY_PRICE) * 100, individual_total)
}

fn div_round(numerator: i64, denominator: i64) -> i64 {
    (numerator as f64 / denominator as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn roster_never_exceeds_the_limit() {
        let mut roster = Roster::new("Owner One", "owner@example.com", today());
        for i in 0..4 {
            roster
                .add(
                    &format!("Member {i}"),
                    &format!("m{i}@example.com"),
                    ContactMethod::Email,
                    Some(Relationship::Other),
                    today(),
                )
                .unwrap();
        }
        assert!(roster.is_full());
        assert_eq!(roster.free_slots(), 0);

        let err = roster
            .add(
                "One Too Many",
                "extra@example.com",
                ContactMethod::Email,
                None,
                today(),
            )
            .unwrap_err();
        assert_eq!(err, RosterError::Full);
        assert_eq!(roster.len(), MAX_MEMBERS);
    }

    #[test]
    fn owner_cannot_be_removed() {
        let mut roster = Roster::demo(today());
        let owner_id = roster.members()[0].id;
        assert_eq!(roster.remove(owner_id), Err(RosterError::Owner));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn removing_a_member_frees_a_slot() {
        let mut roster = Roster::demo(today());
        let member_id = roster.members()[1].id;
        let removed = roster.remove(member_id).unwrap();
        assert_eq!(removed.name, "Maria Petrova");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.remove(member_id), Err(RosterError::Unknown));
    }

    #[test]
    fn added_members_are_never_owners() {
        let mut roster = Roster::new("Owner One", "owner@example.com", today());
        let member = roster
            .add(
                "Anna Lee",
                "anna@example.com",
                ContactMethod::Phone,
                Some(Relationship::Child),
                today(),
            )
            .unwrap();
        assert!(!member.is_owner);
        assert_eq!(member.verification, Some(ContactMethod::Phone));
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.initials, "AL");
    }

    #[test]
    fn initials_take_the_first_two_tokens() {
        assert_eq!(initials("Maria Petrova"), "MP");
        assert_eq!(initials("Мария Петрова"), "МП");
        assert_eq!(initials("Anna Maria Lee"), "AM");
        assert_eq!(initials("Prince"), "P");
        assert_eq!(initials("  spaced   out  "), "SO");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn savings_math_matches_the_plan_card() {
        let s = savings(3);
        assert_eq!(s.per_member_price, 690);
        assert_eq!(s.per_member_saving, 309);
        assert_eq!(s.total_saving, 927);
        assert_eq!(s.percent, 31);

        let full = savings(5);
        assert_eq!(full.per_member_price, 414);
        assert_eq!(full.per_member_saving, 585);

        // a single member pays more than an individual plan
        assert!(savings(1).per_member_saving < 0);
    }

    #[test]
    fn family_percent_grows_with_the_household() {
        assert!(family_saving_percent(1) < 0);
        assert!(family_saving_percent(2) < 0);
        assert!(family_saving_percent(3) > 0);
        assert!(family_saving_percent(5) > family_saving_percent(3));
        assert_eq!(family_saving_percent(5), 59);
    }
}
