use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::booking::{Service, Species};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    AskService,
    AskAnimal,
    AskBreed,
    AskPetName,
    AskDatetime,
    Confirm,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::AskService => "ask_service",
            Stage::AskAnimal => "ask_animal",
            Stage::AskBreed => "ask_breed",
            Stage::AskPetName => "ask_pet_name",
            Stage::AskDatetime => "ask_datetime",
            Stage::Confirm => "confirm",
            Stage::Done => "done",
        }
    }

    /// `done` is terminal and behaves like `idle` for the next message.
    pub fn in_booking(&self) -> bool {
        !matches!(self, Stage::Idle | Stage::Done)
    }

    /// Stage index along the slot-filling sequence; idle and done sit outside it.
    fn position(&self) -> u8 {
        match self {
            Stage::Idle | Stage::Done => 0,
            Stage::AskService => 1,
            Stage::AskAnimal => 2,
            Stage::AskBreed => 3,
            Stage::AskPetName => 4,
            Stage::AskDatetime => 5,
            Stage::Confirm => 6,
        }
    }

    /// True when `self` is `other` or a later booking stage.
    pub fn at_or_past(&self, other: Stage) -> bool {
        self.in_booking() && self.position() >= other.position()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    Service,
    Animal,
    Breed,
    PetName,
    Datetime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentTime {
    pub raw: String,
    pub at: NaiveDateTime,
}

impl AppointmentTime {
    pub fn new(raw: &str, at: NaiveDateTime) -> Self {
        Self {
            raw: raw.trim().to_string(),
            at,
        }
    }

    /// Canonical "03/20/2026 10:00 AM" rendering of the validated instant.
    pub fn display(&self) -> String {
        self.at.format("%m/%d/%Y %I:%M %p").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    pub service: Option<Service>,
    pub animal: Option<Species>,
    pub breed: Option<String>,
    pub pet_name: Option<String>,
    pub datetime: Option<AppointmentTime>,
}

impl Slots {
    pub fn is_empty(&self) -> bool {
        self.service.is_none()
            && self.animal.is_none()
            && self.breed.is_none()
            && self.pet_name.is_none()
            && self.datetime.is_none()
    }

    /// Drops `from` and every slot collected after it.
    pub fn clear_from(&mut self, from: Slot) {
        if from <= Slot::Service {
            self.service = None;
        }
        if from <= Slot::Animal {
            self.animal = None;
        }
        if from <= Slot::Breed {
            self.breed = None;
        }
        if from <= Slot::PetName {
            self.pet_name = None;
        }
        self.datetime = None;
    }

    pub fn clear(&mut self) {
        self.clear_from(Slot::Service);
    }

    /// "Dog (Aspin)"
    pub fn species_label(&self) -> Option<String> {
        let animal = self.animal?;
        let breed = self.breed.as_deref().unwrap_or("Unknown");
        Some(format!("{animal} ({breed})"))
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub stage: Stage,
    pub slots: Slots,
    pub last_turn: Option<Instant>,
}

impl Session {
    pub fn new(id: String) -> Self {
        Self {
            id,
            stage: Stage::Idle,
            slots: Slots::default(),
            last_turn: None,
        }
    }

    /// Back to idle with nothing collected.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.slots.clear();
    }
}
