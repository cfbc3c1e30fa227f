//! Closed set of Indian states and union territories accepted for addresses.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// State or union territory of a postal address.
///
/// Persisted and serialized as its display name (for example `"Tamil Nadu"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndianState {
    AndhraPradesh,
    AndamanAndNicobarIslands,
    ArunachalPradesh,
    Assam,
    Bihar,
    Chandigarh,
    Chhattisgarh,
    DadraAndNagarHaveli,
    DamanAndDiu,
    Delhi,
    Goa,
    Gujarat,
    Haryana,
    HimachalPradesh,
    JammuAndKashmir,
    Jharkhand,
    Karnataka,
    Kerala,
    Lakshadweep,
    MadhyaPradesh,
    Maharashtra,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Odisha,
    Puducherry,
    Punjab,
    Rajasthan,
    Sikkim,
    TamilNadu,
    Telangana,
    Tripura,
    UttarPradesh,
    Uttarakhand,
    WestBengal,
}

impl IndianState {
    /// Every accepted value, in display order.
    pub const ALL: [IndianState; 36] = [
        Self::AndhraPradesh,
        Self::AndamanAndNicobarIslands,
        Self::ArunachalPradesh,
        Self::Assam,
        Self::Bihar,
        Self::Chandigarh,
        Self::Chhattisgarh,
        Self::DadraAndNagarHaveli,
        Self::DamanAndDiu,
        Self::Delhi,
        Self::Goa,
        Self::Gujarat,
        Self::Haryana,
        Self::HimachalPradesh,
        Self::JammuAndKashmir,
        Self::Jharkhand,
        Self::Karnataka,
        Self::Kerala,
        Self::Lakshadweep,
        Self::MadhyaPradesh,
        Self::Maharashtra,
        Self::Manipur,
        Self::Meghalaya,
        Self::Mizoram,
        Self::Nagaland,
        Self::Odisha,
        Self::Puducherry,
        Self::Punjab,
        Self::Rajasthan,
        Self::Sikkim,
        Self::TamilNadu,
        Self::Telangana,
        Self::Tripura,
        Self::UttarPradesh,
        Self::Uttarakhand,
        Self::WestBengal,
    ];

    /// Canonical display name, also used as the stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AndhraPradesh => "Andhra Pradesh",
            Self::AndamanAndNicobarIslands => "Andaman and Nicobar Islands",
            Self::ArunachalPradesh => "Arunachal Pradesh",
            Self::Assam => "Assam",
            Self::Bihar => "Bihar",
            Self::Chandigarh => "Chandigarh",
            Self::Chhattisgarh => "Chhattisgarh",
            Self::DadraAndNagarHaveli => "Dadra and Nagar Haveli",
            Self::DamanAndDiu => "Daman and Diu",
            Self::Delhi => "Delhi",
            Self::Goa => "Goa",
            Self::Gujarat => "Gujarat",
            Self::Haryana => "Haryana",
            Self::HimachalPradesh => "Himachal Pradesh",
            Self::JammuAndKashmir => "Jammu and Kashmir",
            Self::Jharkhand => "Jharkhand",
            Self::Karnataka => "Karnataka",
            Self::Kerala => "Kerala",
            Self::Lakshadweep => "Lakshadweep",
            Self::MadhyaPradesh => "Madhya Pradesh",
            Self::Maharashtra => "Maharashtra",
            Self::Manipur => "Manipur",
            Self::Meghalaya => "Meghalaya",
            Self::Mizoram => "Mizoram",
            Self::Nagaland => "Nagaland",
            Self::Odisha => "Odisha",
            Self::Puducherry => "Puducherry",
            Self::Punjab => "Punjab",
            Self::Rajasthan => "Rajasthan",
            Self::Sikkim => "Sikkim",
            Self::TamilNadu => "Tamil Nadu",
            Self::Telangana => "Telangana",
            Self::Tripura => "Tripura",
            Self::UttarPradesh => "Uttar Pradesh",
            Self::Uttarakhand => "Uttarakhand",
            Self::WestBengal => "West Bengal",
        }
    }
}

impl Display for IndianState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndianState {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownState(value.to_string()))
    }
}

impl TryFrom<String> for IndianState {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndianState> for String {
    fn from(value: IndianState) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::IndianState;
    use crate::model::ValidationError;
    use std::collections::HashSet;

    #[test]
    fn display_names_are_unique_and_round_trip() {
        let names: HashSet<_> = IndianState::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names.len(), IndianState::ALL.len());
        for state in IndianState::ALL {
            assert_eq!(state.as_str().parse::<IndianState>().unwrap(), state);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(
            " tamil nadu ".parse::<IndianState>().unwrap(),
            IndianState::TamilNadu
        );
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert_eq!(
            "Atlantis".parse::<IndianState>().unwrap_err(),
            ValidationError::UnknownState("Atlantis".to_string())
        );
    }
}
