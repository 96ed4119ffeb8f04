use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Service {
    Consultation,
    Vaccination,
    #[serde(rename = "Spay & Neuter")]
    SpayNeuter,
    Deworming,
    Grooming,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Consultation,
        Service::Vaccination,
        Service::SpayNeuter,
        Service::Deworming,
        Service::Grooming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Consultation => "Consultation",
            Service::Vaccination => "Vaccination",
            Service::SpayNeuter => "Spay & Neuter",
            Service::Deworming => "Deworming",
            Service::Grooming => "Grooming",
        }
    }

    /// Exact display-name match, used to vet free-text answers from the LLM.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|svc| svc.as_str() == s)
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Hamster,
    Turtle,
    Bird,
    Cow,
    Hen,
    Pig,
    Goat,
    Sheep,
    Horse,
    Duck,
    Buffalo,
    Cattle,
    Donkey,
    Mule,
}

impl Species {
    pub const ALL: [Species; 17] = [
        Species::Dog,
        Species::Cat,
        Species::Rabbit,
        Species::Hamster,
        Species::Turtle,
        Species::Bird,
        Species::Cow,
        Species::Hen,
        Species::Pig,
        Species::Goat,
        Species::Sheep,
        Species::Horse,
        Species::Duck,
        Species::Buffalo,
        Species::Cattle,
        Species::Donkey,
        Species::Mule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "Dog",
            Species::Cat => "Cat",
            Species::Rabbit => "Rabbit",
            Species::Hamster => "Hamster",
            Species::Turtle => "Turtle",
            Species::Bird => "Bird",
            Species::Cow => "Cow",
            Species::Hen => "Hen",
            Species::Pig => "Pig",
            Species::Goat => "Goat",
            Species::Sheep => "Sheep",
            Species::Horse => "Horse",
            Species::Duck => "Duck",
            Species::Buffalo => "Buffalo",
            Species::Cattle => "Cattle",
            Species::Donkey => "Donkey",
            Species::Mule => "Mule",
        }
    }

    /// Case-insensitive name match.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
}

/// The fields that get hashed into the transaction id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingFields {
    pub pet_name: String,
    pub species: String,
    pub service: String,
    pub datetime: String,
    pub status: BookingStatus,
    pub assigned_vet: String,
}

/// Emitted once per successful confirmation. Never written back into a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(flatten)]
    pub fields: BookingFields,
    pub transaction_hash: String,
}
