//! Postal address owned by a team.
//!
//! Only some teams need one, so addresses live in their own table and are
//! removed together with the owning team.

use super::state::IndianState;
use super::team::TeamId;
use super::{is_valid_pincode, limit_text, require_id, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AddressId = Uuid;

pub const LINE_MAX_CHARS: usize = 100;
pub const CITY_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub team_id: TeamId,
    pub line1: String,
    /// Optional; empty string when unused.
    pub line2: String,
    /// Optional; empty string when unused.
    pub line3: String,
    pub city: String,
    pub state: IndianState,
    pub pincode: String,
}

impl Address {
    pub fn new(
        team_id: TeamId,
        line1: impl Into<String>,
        city: impl Into<String>,
        state: IndianState,
        pincode: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            line1: line1.into(),
            line2: String::new(),
            line3: String::new(),
            city: city.into(),
            state,
            pincode: pincode.into(),
        }
    }

    /// Like [`Address::new`] but parses the state from free text.
    ///
    /// # Errors
    /// - `ValidationError::UnknownState` when `state` is not an accepted value.
    pub fn parse(
        team_id: TeamId,
        line1: impl Into<String>,
        city: impl Into<String>,
        state: &str,
        pincode: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let state = state.parse::<IndianState>()?;
        Ok(Self::new(team_id, line1, city, state, pincode))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("address.id", self.id)?;
        require_id("address.team_id", self.team_id)?;
        require_text("line1", &self.line1, LINE_MAX_CHARS)?;
        limit_text("line2", &self.line2, LINE_MAX_CHARS)?;
        limit_text("line3", &self.line3, LINE_MAX_CHARS)?;
        require_text("city", &self.city, CITY_MAX_CHARS)?;
        if !is_valid_pincode(&self.pincode) {
            return Err(ValidationError::InvalidPincode(self.pincode.clone()));
        }
        Ok(())
    }
}
