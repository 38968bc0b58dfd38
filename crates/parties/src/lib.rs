//! Parties domain module (business partners and their trading terms).
//!
//! A `BaseParty` holds who the partner is; a `TradingParty` holds how we
//! trade with it (price policy, VAT handling, active or not). Pure domain
//! logic, no IO.

pub mod party;
pub mod trading;

pub use party::{BaseParty, NewParty, PartyId, PartySnapshot, PartyType};
pub use trading::{NewTradingParty, PartyStatus, PriceType, TradingParty, TradingPartySnapshot};
